//! Basic tracer variants.
//!
//! These are zero-allocation, per-sample components designed for realtime
//! use. Everything here is small and cheap to move; no locks, no heap.
//!
//! Contents:
//! - `Sine` : smooth bipolar sweep, phase in radians
//! - `Saw`  : rising ramp in [-1, 1), wrap period 2
//!
//! Notes:
//! - Period is **cycles per unit time**; the shared clock supplies samples
//!   per unit time, so each advance moves phase by `period / rate`.
//! - Both variants re-check the period/rate cache at the top of every
//!   advance; host edits between calls apply on the very next sample.

use core::f32::consts::FRAC_PI_2;

use modulor_core::dsp::{fast_sin, wrap_tau, TAU};

use crate::tracer::{SampleClock, Tracer, TracerBase};

/// Smooth bipolar sweep over a sine wave.
///
/// Phase starts at -π/2 so the run begins at the waveform's lower turning
/// point and rises through zero.
#[derive(Clone, Debug)]
pub struct Sine {
    base: TracerBase,
    theta: f32,
}

impl Sine {
    #[inline]
    pub fn new(period: f32, clock: SampleClock) -> Self {
        Self {
            base: TracerBase::new(period, clock),
            theta: -FRAC_PI_2,
        }
    }

    #[inline] pub fn period(&self) -> f32 { self.base.period() }
    #[inline] pub fn set_period(&mut self, period: f32) { self.base.set_period(period); }
    #[inline] pub fn volume(&self) -> f32 { self.base.volume() }
    #[inline] pub fn set_volume(&mut self, volume: f32) { self.base.set_volume(volume); }
}

impl Tracer for Sine {
    #[inline]
    fn next(&mut self) -> f32 {
        self.base.refresh();
        // Wrap by subtraction, not modulo, so slow period edits keep the
        // phase continuous across the boundary.
        self.theta = wrap_tau(self.theta + self.base.phase_inc() * TAU);
        self.base.scale(fast_sin(self.theta))
    }

    #[inline]
    fn reset(&mut self) {
        self.theta = -FRAC_PI_2;
    }
}

/// Rising ramp from -1 to 1, repeating every period.
#[derive(Clone, Debug)]
pub struct Saw {
    base: TracerBase,
    level: f32,
}

impl Saw {
    #[inline]
    pub fn new(period: f32, clock: SampleClock) -> Self {
        Self {
            base: TracerBase::new(period, clock),
            level: -1.0,
        }
    }

    #[inline] pub fn period(&self) -> f32 { self.base.period() }
    #[inline] pub fn set_period(&mut self, period: f32) { self.base.set_period(period); }
    #[inline] pub fn volume(&self) -> f32 { self.base.volume() }
    #[inline] pub fn set_volume(&mut self, volume: f32) { self.base.set_volume(volume); }
}

impl Tracer for Saw {
    #[inline]
    fn next(&mut self) -> f32 {
        self.base.refresh();
        self.level += self.base.phase_inc();
        while self.level >= 1.0 {
            self.level -= 2.0;
        }
        self.base.scale(self.level)
    }

    #[inline]
    fn reset(&mut self) {
        self.level = -1.0;
    }
}
