//! Pointer event vocabulary consumed by the drag engine. The platform
//! layer translates its native events into these; the engine never sees a
//! rendering surface.

use dashgrid_core::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
    /// The surface lost the gesture (capture loss, system interruption).
    Cancel,
}

#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub event: PointerEventKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(id: PointerId, kind: PointerKind, event: PointerEventKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            event,
            position,
        }
    }
}
