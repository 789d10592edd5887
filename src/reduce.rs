use std::f64::consts::PI;

use num_complex::Complex64;

use crate::cables::CableType;
use crate::error::{BuildError, Result};

/// System frequency (Hz), used only to convert capacitance to susceptance.
pub const SYSTEM_FREQUENCY_HZ: f64 = 50.0;

/// π-model parameters of a segment or of a partially reduced branch, in
/// absolute units: series resistance/reactance in ohm, total shunt
/// capacitance in uF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiParams {
    pub r: f64,
    pub x: f64,
    pub c: f64,
}

impl PiParams {
    fn z(&self) -> Complex64 {
        Complex64::new(self.r, self.x)
    }

    /// Total shunt susceptance (S).
    fn b(&self) -> f64 {
        2.0 * PI * SYSTEM_FREQUENCY_HZ * self.c * 1e-6
    }
}

/// Scales a cable's per-kilometre parameters to one segment.
///
/// Fails fast on non-positive length and on zero series impedance: both would
/// make the star reduction divide by zero later, with no physical reading.
pub fn scale_segment(cable: &CableType, line: usize, length: f64) -> Result<PiParams> {
    if length <= 0.0 {
        return Err(BuildError::NonPositiveLength { line, length });
    }
    let params = PiParams {
        r: cable.r1 * length,
        x: cable.x1 * length,
        c: cable.c1 * length,
    };
    if params.r == 0.0 && params.x == 0.0 {
        return Err(BuildError::ZeroImpedance { line });
    }
    Ok(params)
}

/// Maximum apparent power (VA) a segment can carry.
pub fn segment_capacity(cable: &CableType, voltage: f64) -> f64 {
    voltage * cable.i_max
}

/// Folds a new segment into the branch accumulated so far, star-delta style.
///
/// Both sides are π models with half their shunt susceptance at each end. The
/// junction node carries the two inner half-susceptances; eliminating it is a
/// star-delta transformation with star impedances Za, Zb and Zg = 1/Ym:
///
///     Zab = (Za*Zb + Za*Zg + Zb*Zg) / Zg
///
/// The delta's two ground legs plus the outer half-susceptances form the new
/// shunt; only its susceptance is retained (the resistive part of the ground
/// legs is negligible leakage for distribution cables). When the junction
/// admittance is numerically zero the reduction degenerates to plain series
/// addition with zero shunt.
pub fn fold_segment(line: usize, acc: &PiParams, seg: &PiParams) -> Result<PiParams> {
    let omega = 2.0 * PI * SYSTEM_FREQUENCY_HZ;

    let za = acc.z();
    let zb = seg.z();
    let (ba, bb) = (acc.b(), seg.b());

    let ym = Complex64::new(0.0, (ba + bb) / 2.0);
    if ym.norm() == 0.0 {
        return Ok(PiParams {
            r: acc.r + seg.r,
            x: acc.x + seg.x,
            c: 0.0,
        });
    }

    let zg = ym.inv();
    let d = za * zb + za * zg + zb * zg;
    if d.norm() == 0.0 {
        return Err(BuildError::ZeroImpedance { line });
    }

    let zab = d / zg;
    // Ground legs of the delta, as admittances seen from each end.
    let ya = zb / d + Complex64::new(0.0, ba / 2.0);
    let yb = za / d + Complex64::new(0.0, bb / 2.0);
    let b_total = (ya + yb).im;

    Ok(PiParams {
        r: zab.re,
        x: zab.im,
        c: b_total / omega * 1e6,
    })
}
