use std::fmt;

use crate::config::thresholds::ThresholdConfig;
use crate::detect::flash::{FlashDetector, FlashEvent};
use crate::evaluate::thresholds::{Evaluation, ThresholdEvaluator, Violation, ViolationKind, Warning};
use crate::foundation::error::{FlashguardError, FlashguardResult};
use crate::frame::buffer::PixelBuffer;
use crate::report::assessment::SafetyAssessment;
use crate::report::run::{RunReport, RunStats};
use crate::window::rolling::RollingWindow;

/// Options selecting continuous monitoring or a bounded test run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOpts {
    /// End the run (state `Violated`) on the first critical violation.
    pub stop_on_first_violation: bool,
    /// End the run (state `Completed`) once this much time has elapsed since the first frame.
    pub max_duration_ms: Option<i64>,
}

impl SessionOpts {
    /// Open-ended monitoring: never stops on its own.
    pub fn continuous() -> Self {
        Self::default()
    }

    /// Batch verification: stop on the first violation or after `max_duration_ms`.
    pub fn bounded_test(max_duration_ms: i64) -> Self {
        Self {
            stop_on_first_violation: true,
            max_duration_ms: Some(max_duration_ms),
        }
    }

    /// Check field ranges.
    pub fn validate(&self) -> FlashguardResult<()> {
        if let Some(ms) = self.max_duration_ms
            && ms <= 0
        {
            return Err(FlashguardError::validation("max_duration_ms must be > 0"));
        }
        Ok(())
    }
}

/// Lifecycle of a session: `Idle -> Sampling -> {Violated | Completed}`.
///
/// Both end states are terminal until [`SafetySession::reset`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// No frame analyzed yet.
    Idle,
    /// Accepting frames.
    Sampling,
    /// Stopped on a critical violation.
    Violated {
        /// First critical rule of the stopping evaluation.
        kind: ViolationKind,
        /// Time since the first frame.
        elapsed_ms: i64,
    },
    /// Stopped because the run duration elapsed or the caller finished it.
    Completed {
        /// Time since the first frame.
        elapsed_ms: i64,
    },
}

impl RunState {
    /// `true` for `Violated` and `Completed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Violated { .. } | Self::Completed { .. })
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Sampling => f.write_str("sampling"),
            Self::Violated { kind, elapsed_ms } => {
                write!(f, "violated ({kind} after {elapsed_ms} ms)")
            }
            Self::Completed { elapsed_ms } => write!(f, "completed after {elapsed_ms} ms"),
        }
    }
}

/// Result of one [`SafetySession::analyze`] call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnalysisResult {
    /// `true` when the call produced no critical violation.
    pub safe: bool,
    /// Critical findings for the current window.
    pub violations: Vec<Violation>,
    /// Non-blocking findings for the current window.
    pub warnings: Vec<Warning>,
    /// Flashes inside the current window.
    pub flash_count: usize,
    /// Red flashes inside the current window.
    pub red_flash_count: usize,
    /// Event detected for this frame pair, if any.
    pub event: Option<FlashEvent>,
    /// Session state after the call.
    pub state: RunState,
}

/// Stateful analyzer fed with consecutive frame samples.
///
/// Owns the two rolling windows (all flashes, red flashes). Calls are synchronous and the
/// verdicts depend only on the buffers, the timestamps passed in, and the configuration.
#[derive(Clone, Debug)]
pub struct SafetySession {
    config: ThresholdConfig,
    opts: SessionOpts,
    all: RollingWindow,
    red: RollingWindow,
    state: RunState,
    stats: RunStats,
}

impl SafetySession {
    /// Continuous-monitoring session.
    pub fn new(config: ThresholdConfig) -> FlashguardResult<Self> {
        Self::with_opts(config, SessionOpts::default())
    }

    /// Session with explicit run options.
    pub fn with_opts(config: ThresholdConfig, opts: SessionOpts) -> FlashguardResult<Self> {
        config.validate()?;
        opts.validate()?;
        let capacity = config.window_capacity();
        Ok(Self {
            all: RollingWindow::new(config.window_ms, capacity),
            red: RollingWindow::new(config.window_ms, capacity),
            config,
            opts,
            state: RunState::Idle,
            stats: RunStats::default(),
        })
    }

    /// Active thresholds.
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Active run options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Counters accumulated since creation or the last reset.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Window of all flashes.
    pub fn flash_window(&self) -> &RollingWindow {
        &self.all
    }

    /// Window of red flashes.
    pub fn red_flash_window(&self) -> &RollingWindow {
        &self.red
    }

    /// Analyze the transition `prev -> curr` captured at `timestamp_ms`.
    ///
    /// Structural input problems are errors and leave the session untouched. A missing
    /// `prev` is reported as safe. Terminal sessions refuse every call.
    #[tracing::instrument(skip(self, prev, curr), fields(has_prev = prev.is_some()))]
    pub fn analyze(
        &mut self,
        prev: Option<&PixelBuffer>,
        curr: &PixelBuffer,
        timestamp_ms: i64,
    ) -> FlashguardResult<AnalysisResult> {
        if self.state.is_terminal() {
            return Err(FlashguardError::session(format!(
                "session is {}; reset it before analyzing more frames",
                self.state
            )));
        }

        let event = FlashDetector::detect(prev, curr, &self.config, timestamp_ms)?;

        if self.state == RunState::Idle {
            self.state = RunState::Sampling;
        }
        self.all.evict(timestamp_ms);
        self.red.evict(timestamp_ms);

        if let Some(ev) = event {
            tracing::debug!(
                area = ev.flash_area_px,
                delta = ev.luminance_delta,
                red = ev.is_red_flash,
                "flash detected"
            );
            self.all.insert(ev);
            if ev.is_red_flash {
                self.red.insert(ev);
            }
        }

        let eval = if prev.is_some() {
            ThresholdEvaluator::evaluate(&self.all, &self.red, &self.config)
        } else {
            Evaluation::default()
        };
        for v in &eval.violations {
            tracing::warn!(kind = %v.kind, metric = v.metric, "{}", v.message);
        }

        self.stats.record_frame(
            timestamp_ms,
            event.is_some(),
            self.all.count(),
            self.red.count(),
            !eval.is_safe(),
        );
        self.advance_state(&eval);

        Ok(AnalysisResult {
            safe: eval.is_safe(),
            flash_count: self.all.count(),
            red_flash_count: self.red.count(),
            violations: eval.violations,
            warnings: eval.warnings,
            event,
            state: self.state,
        })
    }

    fn advance_state(&mut self, eval: &Evaluation) {
        let elapsed_ms = self.stats.elapsed_ms();
        if self.opts.stop_on_first_violation
            && let Some(first) = eval.violations.first()
        {
            self.state = RunState::Violated {
                kind: first.kind,
                elapsed_ms,
            };
            tracing::info!(state = %self.state, "test run stopped on violation");
        } else if let Some(max) = self.opts.max_duration_ms
            && elapsed_ms >= max
        {
            self.state = RunState::Completed { elapsed_ms };
            tracing::info!(state = %self.state, "test run duration elapsed");
        }
    }

    /// Assessment of the current window contents.
    pub fn get_safety_assessment(&self) -> SafetyAssessment {
        SafetyAssessment::from_evaluation(ThresholdEvaluator::evaluate(
            &self.all,
            &self.red,
            &self.config,
        ))
    }

    /// End a run early (for example when the caller runs out of frames).
    ///
    /// Terminal sessions are left unchanged.
    pub fn finish(&mut self) -> RunState {
        if !self.state.is_terminal() {
            self.state = RunState::Completed {
                elapsed_ms: self.stats.elapsed_ms(),
            };
            tracing::info!(state = %self.state, "run finished by caller");
        }
        self.state
    }

    /// Snapshot of state, counters, and the current assessment.
    pub fn run_report(&self) -> RunReport {
        RunReport {
            state: self.state,
            stats: self.stats.clone(),
            assessment: self.get_safety_assessment(),
            flash_limit: self.config.max_flashes_per_window,
            red_flash_limit: self.config.max_red_flashes_per_window,
            window_ms: self.config.window_ms,
        }
    }

    /// Clear both windows, counters, and run state.
    pub fn reset(&mut self) {
        self.all.clear();
        self.red.clear();
        self.stats = RunStats::default();
        self.state = RunState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/safety_session.rs"]
mod tests;
