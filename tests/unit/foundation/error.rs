use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlashguardError::invalid_buffer("x")
            .to_string()
            .contains("invalid buffer:")
    );
    assert!(
        FlashguardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FlashguardError::session("x")
            .to_string()
            .contains("session error:")
    );
    assert!(
        FlashguardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn shape_mismatch_names_both_sizes() {
    let err = FlashguardError::ShapeMismatch {
        prev_width: 2,
        prev_height: 2,
        curr_width: 4,
        curr_height: 3,
    };
    let msg = err.to_string();
    assert!(msg.contains("2x2"));
    assert!(msg.contains("4x3"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlashguardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
