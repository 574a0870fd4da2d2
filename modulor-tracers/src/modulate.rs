//! Parameter modulation bindings.
//!
//! A [`ParamMod`] couples one tracer to one caller-owned `f32` slot and a
//! target range. Each `affect()` samples the tracer once and writes the
//! rescaled value straight into the slot; the host calls it once per sample
//! to keep the bound parameter current.
//!
//! Both the source and the target are held by exclusive borrow, so the
//! binding cannot outlive either of them, and nothing else can advance the
//! source behind the binding's back.

use modulor_core::dsp::{bipolar_to_unipolar, lerp};

use crate::tracer::Tracer;

/// Binding of a tracer to a destination parameter slot.
///
/// The tracer's bipolar output is remapped onto `[lo, hi]`:
/// -1 lands on `lo`, 0 on the midpoint, +1 on `hi`.
#[derive(Debug)]
pub struct ParamMod<'a, T: Tracer> {
    source: &'a mut T,
    target: &'a mut f32,
    lo: f32,
    hi: f32,
}

impl<'a, T: Tracer> ParamMod<'a, T> {
    #[inline]
    pub fn new(source: &'a mut T, target: &'a mut f32, lo: f32, hi: f32) -> Self {
        Self {
            source,
            target,
            lo,
            hi,
        }
    }

    /// Sample the source once and write the rescaled value into the target.
    #[inline]
    pub fn affect(&mut self) {
        let raw = self.source.next();
        *self.target = lerp(self.lo, self.hi, bipolar_to_unipolar(raw));
    }

    /// Last value written to the target.
    #[inline]
    pub fn value(&self) -> f32 {
        *self.target
    }

    #[inline]
    pub fn range(&self) -> (f32, f32) {
        (self.lo, self.hi)
    }

    #[inline]
    pub fn set_range(&mut self, lo: f32, hi: f32) {
        self.lo = lo;
        self.hi = hi;
    }
}
