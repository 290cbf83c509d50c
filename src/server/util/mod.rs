//! Small helpers shared across layers.

pub mod net;
pub mod password;
pub mod task;
