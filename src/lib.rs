//! HTTP API for coordinating volunteers and events.
//!
//! Volunteers keep a profile of skills and available days; administrators
//! create events and get volunteer suggestions from [`matching`].

pub mod auth;
pub mod config;
pub mod handlers;
pub mod matching;
pub mod models;
pub mod notifications;
pub mod reports;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
