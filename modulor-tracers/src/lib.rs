//! Modulor Tracers — periodic control-signal generators and parameter
//! bindings.
//!
//! Crate layout:
//! - [`tracer`]     : `Tracer` trait, shared `SampleClock`, `TracerBase` state
//! - [`nodes`]      : sine and sawtooth tracers
//! - [`freq_noise`] : averaged bank of detuned, jittered sub-oscillators
//! - [`modulate`]   : `ParamMod` — bind a tracer to a parameter slot
//!
//! The crate deliberately avoids heap work on the per-sample path. Tracers
//! are plain structs; period and volume are simple floats the host may tweak
//! between any two advances, with effect on the very next one.

pub mod freq_noise;
pub mod modulate;
pub mod nodes;
pub mod tracer;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use freq_noise::FreqNoise;
pub use modulate::ParamMod;
pub use nodes::{Saw, Sine};
pub use tracer::{SampleClock, Tracer, TracerBase};
