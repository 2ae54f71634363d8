//! Read-only queries over synchronized state

pub mod view_gate;

pub use view_gate::{resolve, RenderState};
