//! Constants shared by every crate of the workspace.

/// Name of the unscoped search: its address-bar keys carry no prefix.
pub const DEFAULT_SEARCH_NAME: &str = "searchalicious";

/// Divider used in configuration strings holding several values (eg. `langs`).
pub const PROPERTY_LIST_DIVIDER: &str = ";";

/// Divider used to join list values in API query strings.
pub const API_LIST_DIVIDER: &str = ",";

/// Separator between the session name and the key in prefixed address-bar params.
pub const PARAM_PREFIX_SEPARATOR: &str = ".";

pub const AND_OPERATOR: &str = " AND ";
pub const OR_OPERATOR: &str = " OR ";

pub const DEFAULT_LANGS: &str = "en";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DISPLAYED_PAGES: u32 = 5;
