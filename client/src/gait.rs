/// Phase change per tick while walking
pub const GAIT_STEP: f32 = 0.1;
/// Limb swing amplitude; the phase reverses at ±this
pub const GAIT_LIMIT: f32 = 0.5;
/// Actors above this height are flying and do not walk
pub const GROUNDED_HEIGHT: f32 = 0.1;

/// Walk-cycle oscillator shared by the local actor and enemies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gait {
    phase: f32,
    step: f32,
}

impl Default for Gait {
    fn default() -> Self {
        Self::new()
    }
}

impl Gait {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            step: GAIT_STEP,
        }
    }

    /// Advances one tick when `walking`, otherwise settles back to rest.
    pub fn advance(&mut self, walking: bool) {
        if !walking {
            self.reset();
            return;
        }

        self.phase += self.step;
        if self.phase >= GAIT_LIMIT - f32::EPSILON {
            self.phase = GAIT_LIMIT;
            self.step = -GAIT_STEP;
        } else if self.phase <= -GAIT_LIMIT + f32::EPSILON {
            self.phase = -GAIT_LIMIT;
            self.step = GAIT_STEP;
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.step = GAIT_STEP;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Left and right limb angles; the right side mirrors the left.
    pub fn limb_angles(&self) -> (f32, f32) {
        (self.phase, -self.phase)
    }
}

/// Whether an actor at `height` that is trying to move should animate a walk.
pub fn is_walking(moving: bool, height: f32) -> bool {
    moving && height < GROUNDED_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oscillates_within_bounds() {
        let mut gait = Gait::new();
        let mut reversals = 0;
        let mut previous_step = GAIT_STEP;

        for _ in 0..100 {
            gait.advance(true);
            assert!(gait.phase().abs() <= GAIT_LIMIT);
            if gait.step != previous_step {
                reversals += 1;
                previous_step = gait.step;
            }
        }

        assert!(reversals >= 9);
    }

    #[test]
    fn test_reverses_at_limit() {
        let mut gait = Gait::new();
        for _ in 0..5 {
            gait.advance(true);
        }
        assert_eq!(gait.phase(), GAIT_LIMIT);
        gait.advance(true);
        assert!(gait.phase() < GAIT_LIMIT);
    }

    #[test]
    fn test_idle_resets() {
        let mut gait = Gait::new();
        gait.advance(true);
        gait.advance(true);
        gait.advance(false);
        assert_eq!(gait.phase(), 0.0);
        assert_eq!(gait.limb_angles(), (0.0, 0.0));
    }

    #[test]
    fn test_flying_does_not_walk() {
        assert!(is_walking(true, 0.0));
        assert!(!is_walking(true, 3.0));
        assert!(!is_walking(false, 0.0));
    }
}
