//! HTTP request handlers, one module per resource.

pub mod actions;
pub mod attendance;
pub mod certificates;
pub mod departments;
pub mod events;
pub mod forms;
pub mod members;
pub mod points;
