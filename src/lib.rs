//! Webring service - a circular linked list of member websites.
//!
//! This library provides the core domain types and logic for the webring:
//! the ring topology engine, membership registry, status feed, and the HTTP
//! surface over them.

pub mod config;
pub mod registry;
pub mod ring;
pub mod server;
pub mod status;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod test_utils;
