use super::*;
use crate::evaluate::thresholds::Severity;

fn finding(kind: ViolationKind, severity: Severity) -> Violation {
    Violation {
        kind,
        severity,
        metric: 1.0,
        message: format!("{kind} finding"),
    }
}

#[test]
fn empty_evaluation_is_compliant_without_advice() {
    let a = SafetyAssessment::from_evaluation(Evaluation::default());
    assert!(a.is_safe);
    assert_eq!(a.compliance_level, ComplianceLevel::WcagLevelA);
    assert!(a.recommendations.is_empty());
}

#[test]
fn warnings_only_suggest_monitoring() {
    let eval = Evaluation {
        violations: vec![],
        warnings: vec![finding(ViolationKind::FlashRate, Severity::Warning)],
    };
    let a = SafetyAssessment::from_evaluation(eval);
    assert!(a.is_safe);
    assert_eq!(a.recommendations, vec![MONITOR_RECOMMENDATION.to_string()]);
}

#[test]
fn one_recommendation_per_violated_rule_in_rule_order() {
    let eval = Evaluation {
        violations: vec![
            finding(ViolationKind::LuminanceChange, Severity::Critical),
            finding(ViolationKind::FlashRate, Severity::Critical),
        ],
        warnings: vec![finding(ViolationKind::FlashRate, Severity::Warning)],
    };
    let a = SafetyAssessment::from_evaluation(eval);
    assert!(!a.is_safe);
    assert_eq!(a.compliance_level, ComplianceLevel::NonCompliant);
    assert_eq!(
        a.recommendations,
        vec![
            ViolationKind::FlashRate.recommendation().to_string(),
            ViolationKind::LuminanceChange.recommendation().to_string(),
        ]
    );
}

#[test]
fn display_lists_findings() {
    let eval = Evaluation {
        violations: vec![finding(ViolationKind::FlashArea, Severity::Critical)],
        warnings: vec![],
    };
    let text = SafetyAssessment::from_evaluation(eval).to_string();
    assert!(text.contains("UNSAFE (NON-COMPLIANT)"));
    assert!(text.contains("1. FLASH_AREA: FLASH_AREA finding"));
    assert!(text.contains("Recommendations:"));
}

#[test]
fn compliance_level_serializes_as_label() {
    let a = SafetyAssessment::from_evaluation(Evaluation::default());
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v["compliance_level"], "WCAG 2.1 Level A");
    assert_eq!(v["is_safe"], true);
}
