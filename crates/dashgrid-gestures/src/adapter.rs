//! Thin adapter between the pure drag engine and the world: routes
//! [`GestureEvent`]s to haptic pulses and to the reorder/remove callbacks
//! that commit against the draft layout. The only place where vibration and
//! business mutations meet.

use std::rc::Rc;

use dashgrid_core::InstanceId;

use crate::engine::{DragEngine, DropOutcome, GestureEvent, GridSlot};
use crate::haptics::{
    Haptics, NoopHaptics, PATTERN_DRAG_START, PATTERN_REMOVE, PATTERN_REORDER, PATTERN_TRASH_CROSS,
};
use crate::input::PointerEvent;

pub struct GridGestures {
    engine: DragEngine,
    haptics: Rc<dyn Haptics>,
    on_reorder: Option<Rc<dyn Fn(usize, usize)>>,
    on_remove: Option<Rc<dyn Fn(&InstanceId)>>,
}

impl GridGestures {
    pub fn new(engine: DragEngine) -> Self {
        Self {
            engine,
            haptics: Rc::new(NoopHaptics),
            on_reorder: None,
            on_remove: None,
        }
    }

    pub fn haptics(mut self, haptics: Rc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Commit callback for a resolved reorder: single-element move within
    /// the enabled sequence.
    pub fn on_reorder(mut self, f: impl Fn(usize, usize) + 'static) -> Self {
        self.on_reorder = Some(Rc::new(f));
        self
    }

    /// Commit callback for a drop on the trash zone.
    pub fn on_remove(mut self, f: impl Fn(&InstanceId) + 'static) -> Self {
        self.on_remove = Some(Rc::new(f));
        self
    }

    pub fn set_slots(&mut self, slots: Vec<GridSlot>) {
        self.engine.set_slots(slots);
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.engine.set_viewport_height(height);
    }

    pub fn dragging(&self) -> Option<&InstanceId> {
        self.engine.dragging()
    }

    pub fn over_trash(&self) -> bool {
        self.engine.over_trash()
    }

    /// Grid item tap handlers check this before opening a widget; false
    /// during the post-drag cooldown.
    pub fn tap_allowed(&self) -> bool {
        self.engine.tap_allowed()
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        for ev in self.engine.handle_pointer(event) {
            self.route(ev);
        }
    }

    pub fn tick(&mut self) {
        for ev in self.engine.tick() {
            self.route(ev);
        }
    }

    fn route(&self, event: GestureEvent) {
        match event {
            GestureEvent::DragStarted { .. } => self.haptics.vibrate(PATTERN_DRAG_START),
            GestureEvent::TrashHoverChanged { .. } => self.haptics.vibrate(PATTERN_TRASH_CROSS),
            GestureEvent::DragEnded(DropOutcome::Remove { id }) => {
                self.haptics.vibrate(PATTERN_REMOVE);
                if let Some(f) = &self.on_remove {
                    f(&id);
                }
            }
            GestureEvent::DragEnded(DropOutcome::Reorder { from, to, .. }) => {
                self.haptics.vibrate(PATTERN_REORDER);
                if let Some(f) = &self.on_reorder {
                    f(from, to);
                }
            }
            GestureEvent::DragEnded(DropOutcome::Cancelled) => {}
        }
    }
}
