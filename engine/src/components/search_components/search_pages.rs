//! Pagination: the window of page numbers to display, and the pager state around it.

use common::search_result::SearchResult;

use crate::{
    data_definitions::session_config::PagerConfig,
    events::{EventBus, SearchEvent},
};

/// First and last page numbers to display, both included.
///
/// The window starts one page before the current one when more than two pages
/// are displayed, and is pulled back so that it stays full near the last page.
/// Returns `None` until both the current page and the page count are known.
pub fn compute_range(current_page: Option<u32>, page_count: Option<u32>, displayed_pages: u32) -> Option<(u32, u32)> {
    let page_count = page_count.filter(|&count| count > 0)?;
    let current_page = current_page.filter(|&page| page > 0)?.min(page_count);
    let displayed_pages = displayed_pages.max(1);

    let mut start = if displayed_pages > 2 {
        current_page.saturating_sub(1).max(1)
    } else {
        current_page
    };
    let end = start.saturating_add(displayed_pages - 1).min(page_count);
    if end - start + 1 < displayed_pages {
        start = (end + 1).saturating_sub(displayed_pages).max(1);
    }
    Some((start, end))
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNavigation {
    First,
    Previous,
    Next,
    Last,
    Page(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerView {
    /// Nothing searched yet, the pager is hidden.
    BeforeSearch,
    NoResults,
    Pages,
}

/// Headless pagination widget of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct Pager {
    config: PagerConfig,
    search_launched: bool,
    page_count: Option<u32>,
    current_page: Option<u32>,
    range: Option<(u32, u32)>,
}

impl Pager {
    pub fn new(config: PagerConfig) -> Self {
        Self {
            config,
            search_launched: false,
            page_count: None,
            current_page: None,
            range: None,
        }
    }

    pub fn search_name(&self) -> &str {
        &self.config.search_name
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Take the pages of a result; results of other searches are ignored.
    pub fn update_pages(&mut self, result: &SearchResult) -> bool {
        if result.search_name != self.config.search_name {
            return false;
        }
        self.search_launched = true;
        self.page_count = Some(result.page_count);
        self.current_page = Some(result.current_page);
        self.range = compute_range(self.current_page, self.page_count, self.config.displayed_pages);
        true
    }

    pub fn on_event(&mut self, event: &SearchEvent) -> bool {
        match event {
            SearchEvent::NewResult { result, .. } => self.update_pages(result),
            _ => false,
        }
    }

    pub fn view(&self) -> PagerView {
        match self.page_count {
            Some(count) if count > 0 => PagerView::Pages,
            _ if self.search_launched => PagerView::NoResults,
            _ => PagerView::BeforeSearch,
        }
    }

    pub fn current_page(&self) -> Option<u32> {
        self.current_page
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn range(&self) -> Option<(u32, u32)> {
        self.range
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == Some(1)
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page.is_some() && self.current_page == self.page_count
    }

    pub fn has_start_ellipsis(&self) -> bool {
        matches!(self.range, Some((start, _)) if start > 1)
    }

    pub fn has_end_ellipsis(&self) -> bool {
        match (self.range, self.page_count) {
            (Some((_, end)), Some(count)) => end < count,
            _ => false,
        }
    }

    pub fn display_first(&self) -> bool {
        self.config.display_first
    }

    pub fn display_last(&self) -> bool {
        self.config.display_last
    }

    pub fn displayed_page_numbers(&self) -> Vec<u32> {
        self.range.map(|(start, end)| (start..=end).collect()).unwrap_or_default()
    }

    /// Page reached by `navigation`, clamped into the known pages.
    pub fn target_page(&self, navigation: PageNavigation) -> Option<u32> {
        let page_count = self.page_count.filter(|&count| count > 0)?;
        let target = match navigation {
            PageNavigation::First => 1,
            PageNavigation::Last => page_count,
            PageNavigation::Previous => self.current_page?.saturating_sub(1),
            PageNavigation::Next => self.current_page?.saturating_add(1),
            PageNavigation::Page(page) => page,
        };
        Some(target.clamp(1, page_count))
    }

    /// Change-page event for `navigation`, `None` when it stays on the current page.
    pub fn ask_page_change(&self, navigation: PageNavigation) -> Option<SearchEvent> {
        let page = self.target_page(navigation)?;
        if Some(page) == self.current_page {
            return None;
        }
        Some(SearchEvent::ChangePage {
            search_name: self.config.search_name.clone(),
            page,
        })
    }

    pub fn request_page_change(&self, navigation: PageNavigation, events: &EventBus) -> bool {
        match self.ask_page_change(navigation) {
            Some(event) => {
                events.publish(event);
                true
            }
            None => false,
        }
    }
}
