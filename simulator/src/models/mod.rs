//! Domain models
//!
//! - **Call**: one simulated customer contact
//! - **Event**: instantaneous occurrence on the engine's time-ordered queue

pub mod call;
pub mod event;

pub use call::Call;
pub use event::{Event, EventKind};
