//! Voice Todo: tool-call webhook backend for a phone-based to-do assistant.

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod todos;
pub mod users;
pub mod vapi;
