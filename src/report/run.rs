use std::fmt;

use crate::report::assessment::SafetyAssessment;
use crate::session::safety_session::RunState;

/// Frame numbers of violating frames kept per run; the total is always counted.
pub const MAX_RECORDED_VIOLATION_FRAMES: usize = 256;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Counters accumulated across `analyze()` calls of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunStats {
    /// Accepted `analyze()` calls.
    pub frames_analyzed: u64,
    /// Frame pairs that produced a flash event.
    pub flash_events: u64,
    /// Peak number of flashes inside the window.
    pub max_flash_count: usize,
    /// Peak number of red flashes inside the window.
    pub max_red_flash_count: usize,
    /// Calls (1-based) whose evaluation produced a critical violation, up to
    /// [`MAX_RECORDED_VIOLATION_FRAMES`] entries.
    pub violation_frames: Vec<u64>,
    /// Total violating calls, including those not recorded in `violation_frames`.
    pub violation_frame_count: u64,
    /// Timestamp of the first accepted call.
    pub started_at_ms: Option<i64>,
    /// Timestamp of the latest accepted call.
    pub last_timestamp_ms: Option<i64>,
}

impl RunStats {
    pub(crate) fn record_frame(
        &mut self,
        timestamp_ms: i64,
        flashed: bool,
        flash_count: usize,
        red_flash_count: usize,
        violated: bool,
    ) {
        self.frames_analyzed += 1;
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(timestamp_ms);
        }
        self.last_timestamp_ms = Some(timestamp_ms);
        if flashed {
            self.flash_events += 1;
        }
        self.max_flash_count = self.max_flash_count.max(flash_count);
        self.max_red_flash_count = self.max_red_flash_count.max(red_flash_count);
        if violated {
            self.violation_frame_count += 1;
            if self.violation_frames.len() < MAX_RECORDED_VIOLATION_FRAMES {
                self.violation_frames.push(self.frames_analyzed);
            }
        }
    }

    /// Milliseconds between the first and latest accepted call (never negative).
    pub fn elapsed_ms(&self) -> i64 {
        match (self.started_at_ms, self.last_timestamp_ms) {
            (Some(start), Some(last)) => last.saturating_sub(start).max(0),
            _ => 0,
        }
    }
}

/// Final summary of a monitoring or bounded test run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Session state when the report was taken.
    pub state: RunState,
    /// Run counters.
    pub stats: RunStats,
    /// Assessment of the current window contents.
    pub assessment: SafetyAssessment,
    /// Configured general flash limit per window.
    pub flash_limit: u32,
    /// Configured red flash limit per window.
    pub red_flash_limit: u32,
    /// Configured window length.
    pub window_ms: i64,
}

impl RunReport {
    /// A run passes when no analyzed frame ever produced a critical violation.
    pub fn passed(&self) -> bool {
        self.stats.violation_frame_count == 0 && !matches!(self.state, RunState::Violated { .. })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "PHOTOSENSITIVITY TEST REPORT")?;
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "Test Result: {}",
            if self.passed() { "PASS" } else { "FAIL" }
        )?;
        writeln!(f, "State: {}", self.state)?;
        writeln!(f, "{THIN_RULE}")?;
        writeln!(f, "Frames Analyzed: {}", self.stats.frames_analyzed)?;
        writeln!(
            f,
            "Test Duration: {:.2}s",
            self.stats.elapsed_ms() as f64 / 1000.0
        )?;
        writeln!(
            f,
            "Max Flash Count: {} per {} ms (limit: {})",
            self.stats.max_flash_count, self.window_ms, self.flash_limit
        )?;
        writeln!(
            f,
            "Max Red Flash Count: {} per {} ms (limit: {})",
            self.stats.max_red_flash_count, self.window_ms, self.red_flash_limit
        )?;
        writeln!(f, "Flash Events: {}", self.stats.flash_events)?;
        writeln!(f, "Violating Frames: {}", self.stats.violation_frame_count)?;
        if !self.stats.violation_frames.is_empty() {
            let frames: Vec<String> = self
                .stats
                .violation_frames
                .iter()
                .map(u64::to_string)
                .collect();
            writeln!(f, "  first violating frames: {}", frames.join(", "))?;
        }
        writeln!(f, "{THIN_RULE}")?;
        write!(f, "{}", self.assessment)?;
        writeln!(f, "{RULE}")
    }
}
