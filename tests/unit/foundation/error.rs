use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SharecardError::input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        SharecardError::metadata("x")
            .to_string()
            .contains("metadata error:")
    );
    assert!(SharecardError::load("x").to_string().contains("load error:"));
    assert!(
        SharecardError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        SharecardError::packaging("x")
            .to_string()
            .contains("packaging error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SharecardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn input_and_metadata_count_as_input_errors() {
    assert!(SharecardError::input("bad url").is_input_error());
    assert!(SharecardError::metadata("no title").is_input_error());
    assert!(!SharecardError::load("404").is_input_error());
    assert!(!SharecardError::packaging("zip").is_input_error());
}
