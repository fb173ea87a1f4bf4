//! # dashgrid-gestures
//!
//! The touch-driven reorder/remove gesture engine for the dashboard grid.
//! [`engine::DragEngine`] is a pure pointer state machine: feed it
//! [`input::PointerEvent`]s plus the grid's slot rectangles and it emits
//! [`engine::GestureEvent`]s. [`adapter::GridGestures`] wraps it with a
//! [`haptics::Haptics`] sink and the commit callbacks that apply a drop to
//! the draft layout.
//!
//! ```rust
//! use dashgrid_gestures::prelude::*;
//!
//! let engine = DragEngine::new(DragConfig::default());
//! let mut grid = GridGestures::new(engine)
//!     .on_reorder(|from, to| println!("move {from} -> {to}"))
//!     .on_remove(|id| println!("remove {id}"));
//! grid.set_viewport_height(800.0);
//! ```

pub mod adapter;
pub mod clock;
pub mod engine;
pub mod haptics;
pub mod input;

pub use adapter::*;
pub use clock::*;
pub use engine::*;
pub use haptics::*;
pub use input::*;

pub mod prelude {
    pub use crate::adapter::GridGestures;
    pub use crate::clock::{Clock, SystemClock, TestClock};
    pub use crate::engine::{DragConfig, DragEngine, DropOutcome, GestureEvent, GridSlot};
    pub use crate::haptics::{Haptics, NoopHaptics};
    pub use crate::input::{PointerEvent, PointerEventKind, PointerId, PointerKind};
}
