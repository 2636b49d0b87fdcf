//! Callers, identified by phone number.

pub mod model;
pub mod service;

pub use model::{NewUser, User};
