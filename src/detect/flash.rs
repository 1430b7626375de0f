use crate::config::thresholds::ThresholdConfig;
use crate::foundation::color::{is_saturated_red, relative_luminance};
use crate::foundation::error::{FlashguardError, FlashguardResult};
use crate::frame::buffer::PixelBuffer;

/// A single detected flash between two consecutive frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlashEvent {
    /// Timestamp of the current frame of the pair.
    pub timestamp_ms: i64,
    /// Largest per-pixel luminance change, in 0..255 proxy units.
    pub luminance_delta: f64,
    /// Estimated flashing area in pixels (flagged samples times the sample stride).
    pub flash_area_px: u64,
    /// `true` when any flagged sample turned saturated red.
    ///
    /// One red sample marks the whole event, so mostly non-red flashes can be counted as red.
    pub is_red_flash: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct FlashScan {
    flagged_samples: u64,
    max_delta: f64,
    red: bool,
}

/// Frame-pair comparator that turns two samples into zero or one [`FlashEvent`].
pub struct FlashDetector;

impl FlashDetector {
    /// Compare `prev` against `curr`.
    ///
    /// A missing `prev` (first frame) is a normal outcome and yields `Ok(None)`.
    #[tracing::instrument(skip(prev, curr, config))]
    pub fn detect(
        prev: Option<&PixelBuffer>,
        curr: &PixelBuffer,
        config: &ThresholdConfig,
        timestamp_ms: i64,
    ) -> FlashguardResult<Option<FlashEvent>> {
        check_analysis_size(curr, config)?;
        let Some(prev) = prev else {
            return Ok(None);
        };
        if !prev.same_shape(curr) {
            return Err(FlashguardError::ShapeMismatch {
                prev_width: prev.width(),
                prev_height: prev.height(),
                curr_width: curr.width(),
                curr_height: curr.height(),
            });
        }

        let scan = scan_pair(prev, curr, config);
        let area = scan
            .flagged_samples
            .saturating_mul(u64::from(config.sample_stride));
        if scan.flagged_samples == 0 || area <= config.flash_pixel_trigger {
            return Ok(None);
        }

        Ok(Some(FlashEvent {
            timestamp_ms,
            luminance_delta: scan.max_delta * 255.0,
            flash_area_px: area,
            is_red_flash: scan.red,
        }))
    }
}

fn check_analysis_size(curr: &PixelBuffer, config: &ThresholdConfig) -> FlashguardResult<()> {
    match config.analysis_size {
        Some([w, h]) if curr.width() != w || curr.height() != h => {
            Err(FlashguardError::invalid_buffer(format!(
                "expected {w}x{h} analysis buffer, got {}x{}",
                curr.width(),
                curr.height()
            )))
        }
        _ => Ok(()),
    }
}

fn scan_pair(prev: &PixelBuffer, curr: &PixelBuffer, config: &ThresholdConfig) -> FlashScan {
    let threshold = config.min_luminance_delta / 255.0;
    let stride = config.sample_stride as usize;
    let total = curr.pixel_count() as usize;

    let mut scan = FlashScan::default();
    for i in (0..total).step_by(stride) {
        let [r0, g0, b0] = prev.rgb_at(i);
        let [r1, g1, b1] = curr.rgb_at(i);
        let delta = (relative_luminance(r1, g1, b1) - relative_luminance(r0, g0, b0)).abs();
        if delta <= threshold {
            continue;
        }

        scan.flagged_samples += 1;
        if delta > scan.max_delta {
            scan.max_delta = delta;
        }
        if !scan.red && is_saturated_red(r1, g1, b1, config.red_saturation_threshold) {
            scan.red = true;
        }
    }
    scan
}

#[cfg(test)]
#[path = "../../tests/unit/detect/flash.rs"]
mod tests;
