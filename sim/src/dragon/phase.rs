//! Dragon phase ids.

pub const HOLDING_PATTERN: i32 = 0;
pub const LANDING: i32 = 3;
pub const SITTING_FLAMING: i32 = 5;
pub const SITTING_SCANNING: i32 = 6;
pub const SITTING_ATTACKING: i32 = 7;
pub const DYING: i32 = 9;
pub const HOVERING: i32 = 10;

/// Phases in which the dragon perches on the portal.
#[must_use]
pub const fn is_sitting(phase: i32) -> bool {
    matches!(phase, SITTING_FLAMING | SITTING_SCANNING | SITTING_ATTACKING)
}

#[must_use]
pub const fn is_hovering(phase: i32) -> bool {
    phase == HOVERING
}
