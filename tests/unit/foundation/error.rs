use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoothError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        BoothError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(
        BoothError::no_active_stream("x")
            .to_string()
            .contains("no active stream:")
    );
    assert!(
        BoothError::InvalidTemplate(TemplateId(42))
            .to_string()
            .contains("42")
    );
    assert!(
        BoothError::config("x")
            .to_string()
            .contains("configuration error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_slot_and_frame_errors_are_recoverable() {
    assert!(BoothError::decode("bad png").is_recoverable());
    assert!(BoothError::capture("device busy").is_recoverable());
    assert!(!BoothError::no_active_stream("stopped").is_recoverable());
    assert!(!BoothError::InvalidTemplate(TemplateId(99)).is_recoverable());
    assert!(!BoothError::validation("x").is_recoverable());
}
