use std::fmt;

use crate::evaluate::thresholds::{Evaluation, Violation, ViolationKind, Warning};

const MONITOR_RECOMMENDATION: &str = "Continue monitoring animation speeds and color transitions";

const RULE_ORDER: [ViolationKind; 4] = [
    ViolationKind::FlashRate,
    ViolationKind::RedFlashRate,
    ViolationKind::FlashArea,
    ViolationKind::LuminanceChange,
];

/// Overall compliance verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ComplianceLevel {
    /// No critical finding.
    #[serde(rename = "WCAG 2.1 Level A")]
    WcagLevelA,
    /// At least one critical finding.
    #[serde(rename = "NON-COMPLIANT")]
    NonCompliant,
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WcagLevelA => "WCAG 2.1 Level A",
            Self::NonCompliant => "NON-COMPLIANT",
        })
    }
}

/// Aggregate safety verdict derived from one evaluation. Recomputed on demand, never mutated.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SafetyAssessment {
    /// `true` when there are no critical violations.
    pub is_safe: bool,
    /// Compliance verdict matching `is_safe`.
    pub compliance_level: ComplianceLevel,
    /// Critical findings.
    pub violations: Vec<Violation>,
    /// Non-blocking findings.
    pub warnings: Vec<Warning>,
    /// Remediation advice, one entry per violated rule.
    pub recommendations: Vec<String>,
}

impl SafetyAssessment {
    /// Build the assessment for an evaluation.
    pub fn from_evaluation(eval: Evaluation) -> Self {
        let is_safe = eval.is_safe();
        let recommendations = recommendations_for(&eval);
        Self {
            is_safe,
            compliance_level: if is_safe {
                ComplianceLevel::WcagLevelA
            } else {
                ComplianceLevel::NonCompliant
            },
            violations: eval.violations,
            warnings: eval.warnings,
            recommendations,
        }
    }
}

fn recommendations_for(eval: &Evaluation) -> Vec<String> {
    let mut out: Vec<String> = RULE_ORDER
        .iter()
        .filter(|&&kind| eval.has_violation(kind))
        .map(|kind| kind.recommendation().to_string())
        .collect();
    if out.is_empty() && !eval.warnings.is_empty() {
        out.push(MONITOR_RECOMMENDATION.to_string());
    }
    out
}

impl fmt::Display for SafetyAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Verdict: {} ({})",
            if self.is_safe { "SAFE" } else { "UNSAFE" },
            self.compliance_level
        )?;
        if !self.violations.is_empty() {
            writeln!(f, "Violations:")?;
            for (i, v) in self.violations.iter().enumerate() {
                writeln!(f, "  {}. {}: {}", i + 1, v.kind, v.message)?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for (i, w) in self.warnings.iter().enumerate() {
                writeln!(f, "  {}. {}: {}", i + 1, w.kind, w.message)?;
            }
        }
        if !self.recommendations.is_empty() {
            writeln!(f, "Recommendations:")?;
            for (i, r) in self.recommendations.iter().enumerate() {
                writeln!(f, "  {}. {r}", i + 1)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/assessment.rs"]
mod tests;
