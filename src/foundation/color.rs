use std::sync::OnceLock;

/// Channel weights used to combine linearized RGB into relative luminance.
///
/// These exact values are part of the output contract: stored metrics must stay
/// reproducible across releases, so they are never tuned.
pub const LUMINANCE_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Normalized channel values at or below this knee use the linear segment of the curve.
const GAMMA_KNEE: f64 = 0.03928;

/// Minimum red channel value for a pixel to be classified as saturated red.
pub const RED_MIN: u8 = 150;
/// Maximum green and blue channel values for a pixel to be classified as saturated red.
pub const RED_OTHER_MAX: u8 = 100;

fn linearize(c8: u8) -> f64 {
    let c = f64::from(c8) / 255.0;
    if c <= GAMMA_KNEE {
        c / 12.92
    } else {
        // `libm` keeps the curve bit-identical across platforms.
        libm::pow((c + 0.055) / 1.055, 2.4)
    }
}

fn linear_table() -> &'static [f64; 256] {
    static TABLE: OnceLock<[f64; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = [0.0f64; 256];
        for (i, v) in t.iter_mut().enumerate() {
            *v = linearize(i as u8);
        }
        t
    })
}

/// Relative luminance in `[0, 1]` of an sRGB8 color.
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let t = linear_table();
    LUMINANCE_WEIGHTS[0] * t[usize::from(r)]
        + LUMINANCE_WEIGHTS[1] * t[usize::from(g)]
        + LUMINANCE_WEIGHTS[2] * t[usize::from(b)]
}

/// HSL saturation in `[0, 1]`; defined as `0` when lightness is exactly `0` or `1`.
pub fn hsl_saturation(r: u8, g: u8, b: u8) -> f64 {
    let max = f64::from(r.max(g).max(b)) / 255.0;
    let min = f64::from(r.min(g).min(b)) / 255.0;
    let lightness = (max + min) / 2.0;
    if lightness == 0.0 || lightness == 1.0 {
        return 0.0;
    }
    (max - min) / (1.0 - (2.0 * lightness - 1.0).abs())
}

/// Return `true` for a strongly saturated red: high red, low green/blue, and HSL saturation
/// strictly above `saturation_threshold`.
pub fn is_saturated_red(r: u8, g: u8, b: u8, saturation_threshold: f64) -> bool {
    if r < RED_MIN || g > RED_OTHER_MAX || b > RED_OTHER_MAX {
        return false;
    }
    hsl_saturation(r, g, b) > saturation_threshold
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
