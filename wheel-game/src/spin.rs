use crate::{GameError, Result};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;
use wheel_core::{SpinSettings, WheelError};

/// Cubic ease-out over `d`: `b + c·(p³ − 3p² + 3p)` with `p = t/d`.
pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    let ts = p * p;
    let tc = ts * p;
    b + c * (tc + -3.0 * ts + 3.0 * p)
}

/// Degrees the wheel turns on the tick at `elapsed`, i.e. `v0·(1 − p)³`.
///
/// Starts at `start_velocity` and is exactly zero once `elapsed >= total`.
/// A non-positive or non-finite `total` yields zero.
pub fn tick_velocity(start_velocity: f64, elapsed: f64, total: f64) -> f64 {
    if !(total.is_finite() && total > 0.0) {
        return 0.0;
    }
    let elapsed = elapsed.clamp(0.0, total);
    start_velocity - ease_out(elapsed, 0.0, start_velocity, total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpinPhase {
    Idle,
    Spinning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinStep {
    /// The wheel moved; `angle` is the new rotation.
    Frame { angle: f64 },
    /// Terminal tick. Returned once per spin.
    Stopped { angle: f64 },
    Idle,
}

/// One spin, from the random draws to the frozen final angle.
///
/// Time advances in fixed `tick_ms` steps of elapsed spin time, not wall
/// clock, so the final angle is a function of the start angle and the two
/// draws only.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinState {
    angle: f64,
    arc: f64,
    start_velocity: f64,
    elapsed: f64,
    total: f64,
    tick_ms: f64,
    phase: SpinPhase,
}

impl SpinState {
    /// Draws duration and velocity and enters `Spinning`.
    pub fn start<R: Rng + ?Sized>(
        start_angle: f64,
        item_count: usize,
        settings: &SpinSettings,
        rng: &mut R,
    ) -> Result<Self> {
        if item_count == 0 {
            return Err(GameError::EmptyWheel);
        }

        let total = rng.gen_range(settings.min_duration_ms..settings.max_duration_ms);
        let start_velocity = rng.gen_range(settings.min_velocity..settings.max_velocity);

        Self::with_draws(
            start_angle,
            item_count,
            start_velocity,
            total,
            settings.tick_ms as f64,
        )
    }

    /// Builds a spin from explicit draws. `total` and `tick_ms` must be
    /// positive and finite so the spin terminates.
    pub fn with_draws(
        start_angle: f64,
        item_count: usize,
        start_velocity: f64,
        total: f64,
        tick_ms: f64,
    ) -> Result<Self> {
        if item_count == 0 {
            return Err(GameError::EmptyWheel);
        }

        for (name, value) in [("duration", total), ("tick", tick_ms)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WheelError::config(format!(
                    "Spin {} must be positive and finite, got {}",
                    name, value
                ))
                .into());
            }
        }

        if !start_velocity.is_finite() || !start_angle.is_finite() {
            return Err(WheelError::config("Spin velocity and start angle must be finite").into());
        }

        Ok(Self {
            angle: start_angle,
            arc: crate::resolver::slice_arc(item_count),
            start_velocity,
            elapsed: 0.0,
            total,
            tick_ms,
            phase: SpinPhase::Spinning,
        })
    }

    pub fn advance(&mut self) -> SpinStep {
        if self.phase == SpinPhase::Idle {
            return SpinStep::Idle;
        }

        self.elapsed += self.tick_ms;
        if self.elapsed >= self.total {
            self.phase = SpinPhase::Idle;
            return SpinStep::Stopped { angle: self.angle };
        }

        let degrees = tick_velocity(self.start_velocity, self.elapsed, self.total);
        self.angle += degrees * PI / 180.0;

        SpinStep::Frame { angle: self.angle }
    }

    /// Where this spin will stop, computed on a copy.
    pub fn final_angle(&self) -> f64 {
        let mut projection = self.clone();
        loop {
            match projection.advance() {
                SpinStep::Frame { .. } => {}
                SpinStep::Stopped { angle } => return angle,
                SpinStep::Idle => return projection.angle,
            }
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Slice width captured when the spin started.
    pub fn arc(&self) -> f64 {
        self.arc
    }

    pub fn start_velocity(&self) -> f64 {
        self.start_velocity
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    pub fn progress(&self) -> f64 {
        (self.elapsed / self.total).min(1.0)
    }
}
