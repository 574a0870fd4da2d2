//! Math helpers shared by every tracer.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` approximations for hot paths
//! - Clean, side-effect free helpers that are easy to test
//!
//! Features used by this file:
//! - `fast-math` : enables a polynomial sine approximation (faster, approx.)
//!
//! Conventions:
//! - All functions are `#[inline]` where useful to help the optimizer.
//! - Argument and return domains are documented per function.

#![allow(clippy::excessive_precision)]

use core::f32::consts::PI;

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] fn m_sin(x: f32) -> f32 { x.sin() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] fn m_sin(x: f32) -> f32 { libm::sinf(x) }
    // std backend
    } else {
        #[inline] fn m_sin(x: f32) -> f32 { x.sin() }
    }
}

// --------------------------------- Constants -------------------------------------

/// 2π (commonly useful)
pub const TAU: f32 = 2.0 * PI;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Bring an angle back below 2π by repeated subtraction.
///
/// Deliberately not `rem_euclid`: angles only ever creep past the bound by a
/// per-sample increment, so one or two subtractions suffice, and values below
/// zero pass through untouched (a phase may legitimately start negative).
#[inline]
pub fn wrap_tau(mut theta: f32) -> f32 {
    while theta >= TAU {
        theta -= TAU;
    }
    theta
}

// --------------------------------- Polarity --------------------------------------

/// Remap a bipolar signal in [-1, 1] to unipolar [0, 1].
#[inline]
pub fn bipolar_to_unipolar(x: f32) -> f32 {
    x * 0.5 + 0.5
}

/// Remap a unipolar signal in [0, 1] to bipolar [-1, 1].
#[inline]
pub fn unipolar_to_bipolar(x: f32) -> f32 {
    x * 2.0 - 1.0
}

// --------------------------------- Fast trig -------------------------------------

/// Sine with range reduction into [-π, π] and 5th-order minimax-style poly.
/// Max abs error ~1e-3 for control-rate uses when `fast-math` is enabled;
/// falls back to exact otherwise.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            // Range reduce to [-π, π] without making the parameter mutable in the signature.
            let mut xr = x;
            let k = (xr / TAU).round();
            xr -= k * TAU;

            // 5th-order odd polynomial: sin(x) ≈ x * (a + b x^2 + c x^4)
            let x2 = xr * xr;
            xr * (0.999_979_313_3 + x2 * (-0.166_624_432_0 + x2 * 0.008_308_978_98))
        } else {
            m_sin(x)
        }
    }
}

// --------------------------------- Tests (std only) ------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pins_both_ends() {
        assert_eq!(clamp(-2.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn wrap_tau_stays_below_bound() {
        for theta in [0.0, 1.0, TAU, TAU + 0.5, 3.0 * TAU + 0.1] {
            let w = wrap_tau(theta);
            assert!(w < TAU, "theta={theta} wrapped to {w}");
            assert!((fast_sin(w) - fast_sin(theta)).abs() < 1e-3);
        }
    }

    #[test]
    fn wrap_tau_passes_negatives_through() {
        let theta = -PI / 2.0;
        assert_eq!(wrap_tau(theta), theta);
    }

    #[test]
    fn polarity_roundtrip() {
        for x in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let rt = unipolar_to_bipolar(bipolar_to_unipolar(x));
            assert!((rt - x).abs() < 1e-6, "x={x} rt={rt}");
        }
    }

    #[test]
    fn fast_sin_matches_reference_points() {
        assert!(fast_sin(0.0).abs() < 1e-3);
        assert!((fast_sin(PI / 2.0) - 1.0).abs() < 1e-3);
        assert!((fast_sin(-PI / 2.0) + 1.0).abs() < 1e-3);
        assert!(fast_sin(PI).abs() < 1e-3);
    }
}
