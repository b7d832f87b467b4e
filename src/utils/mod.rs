//! Utility modules.

pub mod url;
