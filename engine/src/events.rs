//! Events exchanged between search sessions and their collaborators.

use std::sync::Arc;

use common::search_result::SearchResult;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Asks for a search on the first page.
    LaunchSearch { search_name: String },
    /// Startup search, on the page found in the address bar.
    LaunchFirstSearch { search_name: String, page: Option<u32> },
    /// Emitted by the pager, asks for a search on `page`.
    ChangePage { search_name: String, page: u32 },
    FacetSelected { search_name: String },
    NewResult { search_name: String, result: Arc<SearchResult> },
}

impl SearchEvent {
    pub fn search_name(&self) -> &str {
        match self {
            Self::LaunchSearch { search_name }
            | Self::LaunchFirstSearch { search_name, .. }
            | Self::ChangePage { search_name, .. }
            | Self::FacetSelected { search_name }
            | Self::NewResult { search_name, .. } => search_name,
        }
    }

    pub fn is_for(&self, search_name: &str) -> bool {
        self.search_name() == search_name
    }
}


/// Page-wide event channel, every subscriber sees every event.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SearchEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns how many subscribers will see the event; nobody listening is fine.
    pub fn publish(&self, event: SearchEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.sender.subscribe()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(SearchEvent::LaunchSearch { search_name: "products".to_string() }), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let event = SearchEvent::ChangePage { search_name: "products".to_string(), page: 3 };
        assert_eq!(bus.publish(event.clone()), 2);
        assert_eq!(first.recv().await.unwrap(), event);
        let received = second.recv().await.unwrap();
        assert!(received.is_for("products"));
        assert!(!received.is_for("recipes"));
    }
}
