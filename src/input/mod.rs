//! Input handling: platform-agnostic events, double-click synthesis,
//! and the event-to-orbit-state processor.

pub mod event;
pub mod mouse;
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::InputProcessor;
