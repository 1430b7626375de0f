use crate::foundation::error::{FlashguardError, FlashguardResult};

/// Standard downsampled analysis width used for viewport-normalized verdicts.
pub const ANALYSIS_WIDTH: u32 = 480;
/// Standard downsampled analysis height used for viewport-normalized verdicts.
pub const ANALYSIS_HEIGHT: u32 = 270;

/// 341 x 256 px: a quarter of a 10 degree visual field at typical viewing distance.
pub const DEFAULT_MAX_FLASH_AREA_PX: u64 = 87_296;

// Fractions of the analysis area, as integer ratios so the derivation is exact.
const NORMALIZED_AREA_RATIO: (u64, u64) = (5, 100);
const NORMALIZED_TRIGGER_RATIO: (u64, u64) = (25, 10_000);
const NORMALIZED_TRIGGER_FLOOR: u64 = 200;
const WINDOW_CAPACITY_FACTOR: usize = 3;

/// Numeric thresholds for flash detection and evaluation.
///
/// Deserializes from partial JSON: omitted fields keep their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// General flashes allowed inside one window.
    pub max_flashes_per_window: u32,
    /// Trailing window length in milliseconds.
    pub window_ms: i64,
    /// Maximum summed flashing area (pixels) inside one window.
    pub max_flash_area_px: u64,
    /// Saturated-red flashes allowed inside one window.
    pub max_red_flashes_per_window: u32,
    /// Luminance change threshold, in 0..255 proxy units (cd/m^2 proxy).
    pub min_luminance_delta: f64,
    /// HSL saturation a red pixel must exceed to count as saturated red.
    pub red_saturation_threshold: f64,
    /// Analyze every `sample_stride`-th pixel.
    pub sample_stride: u32,
    /// A frame pair only yields a flash event when its extrapolated flashing area exceeds this.
    pub flash_pixel_trigger: u64,
    /// When set, every analyzed buffer must be exactly `[width, height]`.
    pub analysis_size: Option<[u32; 2]>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_flashes_per_window: 3,
            window_ms: 1000,
            max_flash_area_px: DEFAULT_MAX_FLASH_AREA_PX,
            max_red_flashes_per_window: 3,
            min_luminance_delta: 20.0,
            red_saturation_threshold: 0.8,
            sample_stride: 4,
            flash_pixel_trigger: 0,
            analysis_size: None,
        }
    }
}

/// `floor(total_px * num / den)`, widened so full `u32 x u32` sizes cannot overflow.
fn scale_px(total_px: u64, (num, den): (u64, u64)) -> u64 {
    let scaled = u128::from(total_px) * u128::from(num) / u128::from(den);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

impl ThresholdConfig {
    /// Defaults with thresholds derived from a fixed analysis size instead of native resolution.
    pub fn viewport_normalized(width: u32, height: u32) -> Self {
        Self::default().with_viewport_normalization(width, height)
    }

    /// Replace the area threshold and flash-pixel trigger with values derived from
    /// `width * height`, and pin the analysis size.
    pub fn with_viewport_normalization(mut self, width: u32, height: u32) -> Self {
        let total_px = u64::from(width) * u64::from(height);
        let area = scale_px(total_px, NORMALIZED_AREA_RATIO);
        let trigger = scale_px(total_px, NORMALIZED_TRIGGER_RATIO);
        self.max_flash_area_px = area.min(DEFAULT_MAX_FLASH_AREA_PX);
        self.flash_pixel_trigger = trigger.max(NORMALIZED_TRIGGER_FLOOR);
        self.analysis_size = Some([width, height]);
        self
    }

    /// Hard cap on events retained by each rolling window.
    ///
    /// Always larger than both rate limits, so a full window still trips them.
    pub fn window_capacity(&self) -> usize {
        let limit = self
            .max_flashes_per_window
            .max(self.max_red_flashes_per_window) as usize;
        limit
            .saturating_add(1)
            .saturating_mul(WINDOW_CAPACITY_FACTOR)
    }

    /// Check field ranges.
    pub fn validate(&self) -> FlashguardResult<()> {
        if self.window_ms <= 0 {
            return Err(FlashguardError::validation("window_ms must be > 0"));
        }
        if self.sample_stride == 0 {
            return Err(FlashguardError::validation("sample_stride must be > 0"));
        }
        if self.max_flashes_per_window == 0 {
            return Err(FlashguardError::validation(
                "max_flashes_per_window must be > 0",
            ));
        }
        if self.max_red_flashes_per_window == 0 {
            return Err(FlashguardError::validation(
                "max_red_flashes_per_window must be > 0",
            ));
        }
        if self.max_flash_area_px == 0 {
            return Err(FlashguardError::validation("max_flash_area_px must be > 0"));
        }
        if !self.min_luminance_delta.is_finite() || self.min_luminance_delta < 0.0 {
            return Err(FlashguardError::validation(
                "min_luminance_delta must be finite and >= 0",
            ));
        }
        if !self.red_saturation_threshold.is_finite() || self.red_saturation_threshold < 0.0 {
            return Err(FlashguardError::validation(
                "red_saturation_threshold must be finite and >= 0",
            ));
        }
        if let Some([w, h]) = self.analysis_size
            && (w == 0 || h == 0)
        {
            return Err(FlashguardError::validation(
                "analysis_size dimensions must be > 0",
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json_str(s: &str) -> FlashguardResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| FlashguardError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> FlashguardResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FlashguardError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/thresholds.rs"]
mod tests;
