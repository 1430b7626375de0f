use std::fmt;

use crate::config::thresholds::ThresholdConfig;
use crate::window::rolling::RollingWindow;

/// Which threshold a finding refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Too many flashes inside the window.
    FlashRate,
    /// Too many saturated-red flashes inside the window.
    RedFlashRate,
    /// Summed flashing area inside the window is too large.
    FlashArea,
    /// A luminance change inside the window is too large.
    LuminanceChange,
}

impl ViolationKind {
    /// Stable identifier, also used in serialized reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlashRate => "FLASH_RATE",
            Self::RedFlashRate => "RED_FLASH_RATE",
            Self::FlashArea => "FLASH_AREA",
            Self::LuminanceChange => "LUMINANCE_CHANGE",
        }
    }

    /// Remediation advice attached to assessments that contain this kind.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::FlashRate => "Reduce animation speed or add delays between frame updates",
            Self::RedFlashRate => "Avoid rapid changes between bright red and black/dark colors",
            Self::FlashArea => {
                "Reduce the area of the screen that flashes, or increase animation duration"
            }
            Self::LuminanceChange => "Use less extreme color contrasts or add transitional frames",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding severity. Only [`Severity::Critical`] makes an animation unsafe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Approaching a limit.
    Warning,
    /// Limit exceeded.
    Critical,
}

/// A threshold finding produced by one [`ThresholdEvaluator::evaluate`] call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    /// Threshold the finding refers to.
    pub kind: ViolationKind,
    /// Critical findings block safety; warnings do not.
    pub severity: Severity,
    /// Measured value compared against the threshold.
    pub metric: f64,
    /// Human-readable description.
    pub message: String,
}

/// Warnings share the shape of violations and differ only in severity.
pub type Warning = Violation;

/// Output of one evaluation pass.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Evaluation {
    /// Critical findings.
    pub violations: Vec<Violation>,
    /// Non-blocking findings.
    pub warnings: Vec<Warning>,
}

impl Evaluation {
    /// `true` when no critical finding was produced.
    pub fn is_safe(&self) -> bool {
        self.violations.is_empty()
    }

    /// Return `true` when a violation of `kind` is present.
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

/// Applies the four flash rules to the current rolling-window contents.
///
/// Rules are independent and any subset may fire in a single pass. Windows must already be
/// evicted to the query time.
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    /// Evaluate `all` (every flash) and `red` (saturated-red flashes only) against `config`.
    ///
    /// A `FlashRate` warning is raised one flash below the limit (`count >= max - 1`), but never
    /// for an empty window, so `max_flashes_per_window == 1` does not warn with zero flashes.
    pub fn evaluate(
        all: &RollingWindow,
        red: &RollingWindow,
        config: &ThresholdConfig,
    ) -> Evaluation {
        let mut out = Evaluation::default();
        check_flash_rate(all, config, &mut out);
        check_red_flash_rate(red, config, &mut out);
        check_flash_area(all, config, &mut out);
        check_luminance(all, config, &mut out);
        out
    }
}

fn check_flash_rate(all: &RollingWindow, config: &ThresholdConfig, out: &mut Evaluation) {
    let count = all.count() as u64;
    let max = u64::from(config.max_flashes_per_window);
    if count > max {
        out.violations.push(Violation {
            kind: ViolationKind::FlashRate,
            severity: Severity::Critical,
            metric: count as f64,
            message: format!(
                "Flash rate exceeds safe threshold: {count} flashes in {} ms (max: {max})",
                config.window_ms
            ),
        });
    } else if count > 0 && count >= max.saturating_sub(1) {
        out.warnings.push(Violation {
            kind: ViolationKind::FlashRate,
            severity: Severity::Warning,
            metric: count as f64,
            message: format!("Flash rate approaching threshold: {count}/{max} flashes in window"),
        });
    }
}

fn check_red_flash_rate(red: &RollingWindow, config: &ThresholdConfig, out: &mut Evaluation) {
    let count = red.count() as u64;
    let max = u64::from(config.max_red_flashes_per_window);
    if count > max {
        out.violations.push(Violation {
            kind: ViolationKind::RedFlashRate,
            severity: Severity::Critical,
            metric: count as f64,
            message: format!(
                "Red flash rate exceeds safe threshold: {count} red flashes in {} ms (max: {max})",
                config.window_ms
            ),
        });
    }
}

fn check_flash_area(all: &RollingWindow, config: &ThresholdConfig, out: &mut Evaluation) {
    let total = all.sum_area();
    let max = config.max_flash_area_px;
    if total > max {
        let pct = total as f64 / max as f64 * 100.0;
        out.violations.push(Violation {
            kind: ViolationKind::FlashArea,
            severity: Severity::Critical,
            metric: total as f64,
            message: format!(
                "Flashing area exceeds safe threshold: {total} pixels (max: {max}, {pct:.1}% of threshold)"
            ),
        });
    }
}

fn check_luminance(all: &RollingWindow, config: &ThresholdConfig, out: &mut Evaluation) {
    let max_change = all.max_delta();
    if max_change > config.min_luminance_delta {
        out.violations.push(Violation {
            kind: ViolationKind::LuminanceChange,
            severity: Severity::Critical,
            metric: max_change,
            message: format!(
                "Luminance change exceeds safe threshold: {max_change:.1} cd/m² (max: {})",
                config.min_luminance_delta
            ),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/evaluate/thresholds.rs"]
mod tests;
