//! Piston actions and arm progress.

/// An action reported for a piston.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PistonAction {
    Pushing,
    Pulling,
    CancelledMidPush,
}

impl PistonAction {
    #[must_use]
    pub const fn is_pushing(self) -> bool {
        matches!(self, Self::Pushing)
    }
}

/// Discrete arm state shown by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArmState {
    Retracted = 0,
    Extending = 1,
    Extended = 2,
    Retracting = 3,
}

impl ArmState {
    #[must_use]
    pub const fn as_byte(self) -> i8 {
        self as i8
    }
}

/// Arm progress of one piston between retracted (0) and extended (1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmProgress {
    action: PistonAction,
    progress: f32,
    last_progress: f32,
}

impl ArmProgress {
    /// Progress change per tick; a full stroke takes two ticks.
    pub const STEP: f32 = 0.5;

    /// A fully retracted arm at rest.
    #[must_use]
    pub const fn retracted() -> Self {
        Self {
            action: PistonAction::Pulling,
            progress: 0.0,
            last_progress: 0.0,
        }
    }

    /// A fully extended arm at rest.
    #[must_use]
    pub const fn extended() -> Self {
        Self {
            action: PistonAction::Pushing,
            progress: 1.0,
            last_progress: 1.0,
        }
    }

    #[must_use]
    pub const fn action(&self) -> PistonAction {
        self.action
    }

    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub const fn last_progress(&self) -> f32 {
        self.last_progress
    }

    /// Switches to `action`. A cancelled push snaps the arm fully out.
    pub fn set_action(&mut self, action: PistonAction) {
        self.action = action;
        if action == PistonAction::CancelledMidPush {
            self.progress = 1.0;
            self.last_progress = 1.0;
        }
    }

    /// Advances the arm by one tick.
    pub fn step(&mut self) {
        self.last_progress = self.progress;
        self.progress = match self.action {
            PistonAction::Pushing => (self.progress + Self::STEP).min(1.0),
            PistonAction::Pulling | PistonAction::CancelledMidPush => {
                (self.progress - Self::STEP).max(0.0)
            }
        };
    }

    /// Returns `true` once the arm has rested at its endpoint for a tick.
    #[must_use]
    pub fn is_done(&self) -> bool {
        let end = match self.action {
            PistonAction::Pushing => 1.0,
            PistonAction::Pulling | PistonAction::CancelledMidPush => 0.0,
        };
        self.progress == end && self.last_progress == end
    }

    #[must_use]
    pub fn state(&self) -> ArmState {
        let done = self.is_done();
        match self.action {
            PistonAction::Pushing if done => ArmState::Extended,
            PistonAction::Pushing => ArmState::Extending,
            PistonAction::Pulling if done => ArmState::Retracted,
            PistonAction::Pulling => ArmState::Retracting,
            PistonAction::CancelledMidPush if self.progress == 1.0 => ArmState::Extended,
            PistonAction::CancelledMidPush if done => ArmState::Retracted,
            PistonAction::CancelledMidPush => ArmState::Extended,
        }
    }
}

impl Default for ArmProgress {
    fn default() -> Self {
        Self::retracted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_takes_two_steps_and_one_rest() {
        let mut arm = ArmProgress::retracted();
        arm.set_action(PistonAction::Pushing);
        assert_eq!(arm.state(), ArmState::Extending);
        arm.step();
        assert_eq!(arm.progress(), 0.5);
        assert!(!arm.is_done());
        arm.step();
        assert_eq!(arm.progress(), 1.0);
        assert!(!arm.is_done());
        arm.step();
        assert!(arm.is_done());
        assert_eq!(arm.state(), ArmState::Extended);
    }

    #[test]
    fn pull_retracts() {
        let mut arm = ArmProgress::extended();
        arm.set_action(PistonAction::Pulling);
        assert_eq!(arm.state(), ArmState::Retracting);
        arm.step();
        arm.step();
        arm.step();
        assert!(arm.is_done());
        assert_eq!(arm.state(), ArmState::Retracted);
    }

    #[test]
    fn cancel_snaps_out_then_retracts() {
        let mut arm = ArmProgress::retracted();
        arm.set_action(PistonAction::Pushing);
        arm.step();
        arm.set_action(PistonAction::CancelledMidPush);
        assert_eq!(arm.progress(), 1.0);
        assert_eq!(arm.last_progress(), 1.0);
        assert_eq!(arm.state(), ArmState::Extended);

        arm.step();
        assert_eq!(arm.progress(), 0.5);
        assert_eq!(arm.state(), ArmState::Extended);
        arm.step();
        arm.step();
        assert!(arm.is_done());
        assert_eq!(arm.state(), ArmState::Retracted);
    }

    #[test]
    fn state_bytes() {
        assert_eq!(ArmState::Retracted.as_byte(), 0);
        assert_eq!(ArmState::Extending.as_byte(), 1);
        assert_eq!(ArmState::Extended.as_byte(), 2);
        assert_eq!(ArmState::Retracting.as_byte(), 3);
    }
}
