//! Flashguard checks rendered animation frames for photosensitive-flash hazards.
//!
//! Consecutive frame samples are compared against WCAG 2.1 flash thresholds (three flashes
//! per second, saturated-red flashes, flashing area, luminance change).
//!
//! # Pipeline overview
//!
//! 1. **Detect**: `(prev, curr) PixelBuffer pair -> Option<FlashEvent>` ([`FlashDetector`])
//! 2. **Window**: events are kept in two trailing, capacity-capped [`RollingWindow`]s
//!    (all flashes, red flashes only)
//! 3. **Evaluate**: window contents -> violations and warnings ([`ThresholdEvaluator`])
//! 4. **Assess**: [`SafetySession`] drives the steps above per `analyze()` call and exposes a
//!    [`SafetyAssessment`], plus an optional bounded test mode that stops on the first violation
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: verdicts depend only on the buffers, the timestamps passed in, and the
//!   [`ThresholdConfig`]. There is no wall-clock access, no timers, and no background work.
//! - **Bounded memory**: window size is capped independently of call volume.
//! - **No capture**: producing frames (and downsampling them) is the caller's job.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod detect;
mod evaluate;
mod foundation;
mod frame;
mod report;
mod session;
mod window;

pub use config::thresholds::{
    ANALYSIS_HEIGHT, ANALYSIS_WIDTH, DEFAULT_MAX_FLASH_AREA_PX, ThresholdConfig,
};
pub use detect::flash::{FlashDetector, FlashEvent};
pub use evaluate::thresholds::{
    Evaluation, Severity, ThresholdEvaluator, Violation, ViolationKind, Warning,
};
pub use foundation::color::{
    LUMINANCE_WEIGHTS, hsl_saturation, is_saturated_red, relative_luminance,
};
pub use foundation::error::{FlashguardError, FlashguardResult};
pub use frame::buffer::{BYTES_PER_PIXEL, PixelBuffer};
pub use report::assessment::{ComplianceLevel, SafetyAssessment};
pub use report::run::{MAX_RECORDED_VIOLATION_FRAMES, RunReport, RunStats};
pub use session::safety_session::{AnalysisResult, RunState, SafetySession, SessionOpts};
pub use window::rolling::RollingWindow;
