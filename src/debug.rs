use num_complex::Complex64;
use pretty_dtoa::{dtoa, FmtFloatConfig};

use crate::network::{Branch, Network};

const FLOAT_CONFIG: FmtFloatConfig = FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(9);

pub fn format_f64(v: f64) -> String {
    dtoa(v, FLOAT_CONFIG)
}

/// Series impedance as "R+jX".
pub fn format_impedance(r: f64, x: f64) -> String {
    let z = Complex64::new(r, x);
    format!(
        "{}{}j{}",
        dtoa(z.re, FLOAT_CONFIG),
        if z.im.signum() < 0.0 { "-" } else { "+" },
        dtoa(z.im.abs(), FLOAT_CONFIG)
    )
}

/// One branch as an operator-readable line.
pub fn format_branch(network: &Network, br: &Branch) -> String {
    format!(
        "line {} [{} - {}]: {} ohm, {} uF, {} VA{}{}",
        br.line_i,
        network.bus[br.f_bus].bus_i,
        network.bus[br.t_bus].bus_i,
        format_impedance(br.br_r, br.br_x),
        format_f64(br.br_c),
        format_f64(br.p_max),
        if br.closed { "" } else { ", open" },
        if br.segments > 1 {
            format!(" ({} segments)", br.segments)
        } else {
            String::new()
        },
    )
}
