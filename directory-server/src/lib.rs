//! Station directory server.
//!
//! Aggregates the Wiener Linien stop registry into a directory of named
//! stations, serves live departures for them, and remembers each user's
//! favorite stations.

pub mod config;
pub mod directory;
pub mod domain;
pub mod favorites;
pub mod monitor;
pub mod query;
pub mod stops;
pub mod web;

#[cfg(test)]
mod test_support;
