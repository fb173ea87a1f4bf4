//! Haptic feedback seam. Patterns are millisecond on/off sequences in the
//! style of `navigator.vibrate`; `vibrate` is fire-and-forget and platforms
//! without a motor plug in [`NoopHaptics`].

/// Entering the dragging state.
pub const PATTERN_DRAG_START: &[u64] = &[50];
/// Crossing the trash-zone boundary, either direction.
pub const PATTERN_TRASH_CROSS: &[u64] = &[20];
/// Drop resolved to a removal.
pub const PATTERN_REMOVE: &[u64] = &[60, 40, 60];
/// Drop resolved to a reorder.
pub const PATTERN_REORDER: &[u64] = &[30];

pub trait Haptics {
    /// Fire-and-forget; implementations must tolerate being called on
    /// platforms without vibration support.
    fn vibrate(&self, pattern: &[u64]);
}

pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&self, _pattern: &[u64]) {}
}
