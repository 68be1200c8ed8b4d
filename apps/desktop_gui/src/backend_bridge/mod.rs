//! Bridge between the UI thread and the async meal planner client.

pub mod commands;
pub mod runtime;
