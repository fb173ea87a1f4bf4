//! # Drag state machine
//!
//! `Idle → Pending → Dragging → Idle`. `Pending` is the window between
//! pointer-down on a grid item and activation; activation is distance-based
//! for mouse/pen and hold-based for touch, separating an intentional
//! long-press-drag from a tap or a scroll.
//!
//! The engine is pure state: it consumes [`PointerEvent`]s plus the current
//! slot rectangles and viewport height, and returns [`GestureEvent`]s. It
//! never touches the layout, haptics, or any rendering surface — that is
//! the adapter's job.
//!
//! A release resolves, from the last known pointer position, to exactly one
//! of three outcomes: `Remove` when inside the trash zone (trash wins over
//! any item under the pointer), `Reorder` when over a different item's
//! slot, `Cancelled` otherwise. Every outcome starts a cooldown during
//! which grid-item taps are suppressed, so the physical release (or the
//! synthetic click that follows it) cannot be misread as "open this
//! widget".

use dashgrid_core::{InstanceId, Rect, Vec2};
use web_time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::input::{PointerEvent, PointerEventKind, PointerId, PointerKind};

/// Timing and distance thresholds. Defaults match the shipped product.
#[derive(Clone, Copy, Debug)]
pub struct DragConfig {
    /// Mouse/pen activation: movement beyond this many logical px.
    pub pointer_activation_distance: f32,
    /// Touch activation: hold at least this long...
    pub touch_hold: Duration,
    /// ...while moving no further than this (otherwise it is a scroll).
    pub touch_jitter: f32,
    /// Trash zone spans this many px up from the bottom viewport edge.
    pub trash_zone_height: f32,
    /// Tap suppression window after any drag resolution.
    pub cooldown: Duration,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            pointer_activation_distance: 8.0,
            touch_hold: Duration::from_millis(500),
            touch_jitter: 5.0,
            trash_zone_height: 100.0,
            cooldown: Duration::from_millis(200),
        }
    }
}

/// One grid item's hit-test rectangle, in the enabled-sequence order the
/// grid renders.
#[derive(Clone, Debug)]
pub struct GridSlot {
    pub id: InstanceId,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    DragStarted { id: InstanceId },
    /// Visual-feedback flag only; crossing emits in both directions and
    /// never changes control flow.
    TrashHoverChanged { hovering: bool },
    /// Dragging ended; drag state is already cleared and the cooldown has
    /// started when this is emitted.
    DragEnded(DropOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DropOutcome {
    /// Single-element move: remove at `from`, insert at `to`, both indices
    /// into the enabled sequence.
    Reorder {
        id: InstanceId,
        from: usize,
        to: usize,
    },
    Remove { id: InstanceId },
    /// Interrupted input or a release over nothing. No side effects; the
    /// draft layout is untouched.
    Cancelled,
}

enum Phase {
    Idle,
    Pending {
        pointer: PointerId,
        kind: PointerKind,
        id: InstanceId,
        start: Vec2,
        pressed_at: Instant,
    },
    Dragging {
        pointer: PointerId,
        id: InstanceId,
        last: Vec2,
        over_trash: bool,
    },
}

pub struct DragEngine {
    config: DragConfig,
    clock: Box<dyn Clock>,
    slots: Vec<GridSlot>,
    viewport_height: f32,
    phase: Phase,
    cooldown_until: Option<Instant>,
}

impl DragEngine {
    pub fn new(config: DragConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: DragConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            slots: Vec::new(),
            viewport_height: 0.0,
            phase: Phase::Idle,
            cooldown_until: None,
        }
    }

    /// Slot rectangles in enabled-sequence order; the host updates these
    /// whenever the grid re-layouts.
    pub fn set_slots(&mut self, slots: Vec<GridSlot>) {
        self.slots = slots;
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Id currently being dragged, if any.
    pub fn dragging(&self) -> Option<&InstanceId> {
        match &self.phase {
            Phase::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn over_trash(&self) -> bool {
        matches!(self.phase, Phase::Dragging { over_trash: true, .. })
    }

    /// False inside the post-drag cooldown window; grid item tap handlers
    /// must check this before opening a widget.
    pub fn tap_allowed(&self) -> bool {
        match self.cooldown_until {
            Some(until) => self.clock.now() >= until,
            None => true,
        }
    }

    /// Frame hook: promotes a motionless touch hold once the hold duration
    /// elapses. Event-only hosts still promote on the next move.
    pub fn tick(&mut self) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        if let Phase::Pending {
            pointer,
            kind: PointerKind::Touch,
            id,
            start,
            pressed_at,
        } = &self.phase
        {
            if self.clock.now().duration_since(*pressed_at) >= self.config.touch_hold {
                let (pointer, id, start) = (*pointer, id.clone(), *start);
                self.begin_drag(pointer, id, start, &mut out);
            }
        }
        out
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        match event.event {
            PointerEventKind::Down => self.on_down(event),
            PointerEventKind::Move => self.on_move(event, &mut out),
            PointerEventKind::Up => self.on_up(event, &mut out),
            PointerEventKind::Cancel => self.on_cancel(event, &mut out),
        }
        out
    }

    fn on_down(&mut self, event: &PointerEvent) {
        // Gesture ownership is serialized: while a pointer owns the
        // interaction, other pointers are ignored entirely.
        if !matches!(self.phase, Phase::Idle) {
            return;
        }
        let Some(slot) = self.slots.iter().find(|s| s.rect.contains(event.position)) else {
            return;
        };
        self.phase = Phase::Pending {
            pointer: event.id,
            kind: event.kind,
            id: slot.id.clone(),
            start: event.position,
            pressed_at: self.clock.now(),
        };
    }

    fn on_move(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        match &self.phase {
            Phase::Pending {
                pointer,
                kind,
                id,
                start,
                pressed_at,
            } if *pointer == event.id => {
                let moved = start.distance_to(event.position);
                let activate = match kind {
                    PointerKind::Touch => {
                        let held = self.clock.now().duration_since(*pressed_at);
                        if held >= self.config.touch_hold {
                            true
                        } else if moved > self.config.touch_jitter {
                            // Moving early means scrolling, not dragging.
                            self.phase = Phase::Idle;
                            return;
                        } else {
                            false
                        }
                    }
                    PointerKind::Mouse | PointerKind::Pen => {
                        moved > self.config.pointer_activation_distance
                    }
                };
                if activate {
                    let (pointer, id) = (*pointer, id.clone());
                    self.begin_drag(pointer, id, event.position, &mut *out);
                }
            }
            Phase::Dragging { pointer, .. } if *pointer == event.id => {
                self.track(event.position, out);
            }
            _ => {}
        }
    }

    fn begin_drag(&mut self, pointer: PointerId, id: InstanceId, pos: Vec2, out: &mut Vec<GestureEvent>) {
        log::debug!("drag started on {id}");
        self.phase = Phase::Dragging {
            pointer,
            id: id.clone(),
            last: pos,
            over_trash: false,
        };
        out.push(GestureEvent::DragStarted { id });
        self.track(pos, out);
    }

    fn in_trash_zone(&self, pos: Vec2) -> bool {
        pos.y > self.viewport_height - self.config.trash_zone_height
    }

    fn track(&mut self, pos: Vec2, out: &mut Vec<GestureEvent>) {
        let over = self.in_trash_zone(pos);
        if let Phase::Dragging { last, over_trash, .. } = &mut self.phase {
            *last = pos;
            if over != *over_trash {
                *over_trash = over;
                out.push(GestureEvent::TrashHoverChanged { hovering: over });
            }
        }
    }

    fn on_up(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        match &self.phase {
            Phase::Pending { pointer, .. } if *pointer == event.id => {
                // Never activated: a plain tap, no cooldown.
                self.phase = Phase::Idle;
            }
            Phase::Dragging { pointer, .. } if *pointer == event.id => {
                // Resolve from the release position, never a stale one.
                self.track(event.position, out);
                if let Phase::Dragging { id, last, over_trash, .. } =
                    std::mem::replace(&mut self.phase, Phase::Idle)
                {
                    let outcome = self.resolve(&id, last, over_trash);
                    self.finish(outcome, out);
                }
            }
            _ => {}
        }
    }

    fn on_cancel(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        match &self.phase {
            Phase::Pending { pointer, .. } if *pointer == event.id => {
                self.phase = Phase::Idle;
            }
            Phase::Dragging { pointer, .. } if *pointer == event.id => {
                // Cancellation wins over any pending resolve.
                self.phase = Phase::Idle;
                self.finish(DropOutcome::Cancelled, out);
            }
            _ => {}
        }
    }

    fn resolve(&self, id: &InstanceId, release: Vec2, over_trash: bool) -> DropOutcome {
        // Trash has priority even when the release also lands on an item.
        if over_trash {
            return DropOutcome::Remove { id: id.clone() };
        }
        let Some(from) = self.slots.iter().position(|s| &s.id == id) else {
            log::warn!("dragged id {id} no longer present in slots");
            return DropOutcome::Cancelled;
        };
        let target = self
            .slots
            .iter()
            .position(|s| &s.id != id && s.rect.contains(release));
        match target {
            Some(to) => DropOutcome::Reorder {
                id: id.clone(),
                from,
                to,
            },
            None => DropOutcome::Cancelled,
        }
    }

    fn finish(&mut self, outcome: DropOutcome, out: &mut Vec<GestureEvent>) {
        log::debug!("drag ended: {outcome:?}");
        self.cooldown_until = Some(self.clock.now() + self.config.cooldown);
        out.push(GestureEvent::DragEnded(outcome));
    }
}
