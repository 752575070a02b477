//! Plain data definitions used across the engine.

pub mod session_config;
pub mod url_param;
