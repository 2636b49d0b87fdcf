//! Per-user to-do items managed through voice tool calls.

pub mod model;
pub mod service;

pub use model::{NewTodo, TodoItem, TodoSummary};
