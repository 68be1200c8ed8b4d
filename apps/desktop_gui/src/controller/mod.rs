//! Controller layer: UI events, view-model transitions, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
