//! Search session engine library entry point.

pub mod address_bar;
pub mod api;
pub mod collaborators;
pub mod components;
pub mod data_definitions;
pub mod error;
pub mod events;
pub mod history;
pub mod registry;
pub mod session;
pub mod signals;

pub use address_bar::{AddressBar, MemoryAddressBar};
#[cfg(feature = "web")]
pub use address_bar::BrowserAddressBar;
pub use components::search_components::search_pages::{Pager, compute_range};
pub use data_definitions::session_config::{PagerConfig, SessionConfig};
pub use error::SearchError;
pub use events::{EventBus, SearchEvent};
pub use registry::CollaboratorRegistry;
#[cfg(feature = "http")]
pub use session::HttpSearchSession;
pub use session::{SearchOutcome, SearchSession};
pub use signals::{SearchPhase, SessionSignals};
