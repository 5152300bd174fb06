/// Linear ramp toward a target value.
///
/// Rising values climb at a fixed rate from the `initial` value held when
/// the ramp segment started; decreases snap immediately. `current` never
/// exceeds `target`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ramp {
    pub target: f64,
    pub current: f64,
    pub initial: f64,
}

impl Ramp {
    /// Start a new ramp segment toward `target`, continuing from the
    /// present command value.
    pub fn retarget_from_current(&mut self, target: f64) {
        self.initial = self.current;
        self.target = target;
    }

    /// Start a new ramp segment toward `target`, restarting from zero.
    pub fn retarget_from_zero(&mut self, target: f64) {
        self.initial = 0.0;
        self.target = target;
    }

    /// Advance the ramp given seconds elapsed since the segment started.
    ///
    /// `rate` is in value units per second. Deceleration is deliberately
    /// instantaneous; only acceleration is ramped.
    pub fn advance(&mut self, elapsed: f64, rate: f64) {
        if self.current < self.target {
            self.current = (self.initial + elapsed * rate).min(self.target);
        } else {
            self.current = self.target;
        }
    }

    pub fn at_target(&self) -> bool {
        self.current == self.target
    }

    pub fn reset(&mut self) {
        self.target = 0.0;
        self.current = 0.0;
        self.initial = 0.0;
    }
}
