//! Mode state machine
//!
//! Decides what the display shows. Transitions are a pure function of the
//! current mode and an event; the controller applies them to a
//! `DisplaySurface`.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::ModeController;
