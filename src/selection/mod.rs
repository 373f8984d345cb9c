//! Selection module
//!
//! Canvas/source coordinate mapping and the pointer gesture state machine.

pub mod gesture;
pub mod transform;

pub use gesture::{SelectionGesture, SelectionMachine};
pub use transform::{crop, fit_scale, scaled_size, CanvasPoint, DisplayTransform, SourceBox};
