//! Core domain types for the webring.
//!
//! This module contains all the fundamental types used throughout the application,
//! designed to encode invariants via the type system.

pub mod ids;
pub mod site;

// Re-export commonly used types at the module level
pub use ids::{SiteId, StatusId};
pub use site::{Site, StatusRecord};
