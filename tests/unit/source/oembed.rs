use super::*;

#[test]
fn complete_body_is_accepted() {
    let body = br#"{
        "title": "Hello World",
        "author_name": "Test Channel",
        "url": "https://www.youtube.com/watch?v=xyz",
        "provider_name": "YouTube",
        "thumbnail_width": 480
    }"#;
    let meta = VideoMetadata::from_json(body).unwrap();
    assert_eq!(meta.title, "Hello World");
    assert_eq!(meta.author_name, "Test Channel");
    assert_eq!(meta.canonical_url, "https://www.youtube.com/watch?v=xyz");
}

#[test]
fn missing_or_empty_fields_are_metadata_errors() {
    for body in [
        r#"{"author_name": "a", "url": "u"}"#,
        r#"{"title": "t", "url": "u"}"#,
        r#"{"title": "t", "author_name": "a"}"#,
        r#"{"title": "", "author_name": "a", "url": "u"}"#,
        r#"{"title": "t", "author_name": "   ", "url": "u"}"#,
        r#"{}"#,
    ] {
        let err = VideoMetadata::from_json(body.as_bytes()).unwrap_err();
        assert!(matches!(err, SharecardError::Metadata(_)), "{body}");
        assert!(err.to_string().contains("invalid video or missing data"), "{body}");
    }
}

#[test]
fn new_rejects_blank_fields() {
    let meta = VideoMetadata::new("Hello World", "Test Channel", "https://youtu.be/xyz").unwrap();
    assert_eq!(meta.title, "Hello World");

    for (title, author, url) in [
        ("", "Test Channel", "https://youtu.be/xyz"),
        ("Hello", " ", "https://youtu.be/xyz"),
        ("Hello", "Test Channel", "\t"),
    ] {
        let err = VideoMetadata::new(title, author, url).unwrap_err();
        assert!(matches!(err, SharecardError::Metadata(_)), "{title:?} {author:?} {url:?}");
        assert!(err.is_input_error());
    }
}

#[test]
fn provider_error_is_reported_verbatim() {
    let err = VideoMetadata::from_json(br#"{"error": "401 Unauthorized", "url": "x"}"#).unwrap_err();
    assert!(matches!(err, SharecardError::Metadata(ref m) if m == "401 Unauthorized"));
}

#[test]
fn non_json_body_is_metadata_error() {
    let err = VideoMetadata::from_json(b"<html>").unwrap_err();
    assert!(err.to_string().contains("error fetching video info"));
}

#[test]
fn request_url_percent_encodes_source() {
    let source = HttpVideoSource::with_defaults().unwrap();
    let url = source
        .metadata_request_url("https://www.youtube.com/watch?v=abc&t=1")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://noembed.com/embed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc%26t%3D1"
    );
}

#[test]
fn bad_endpoint_is_input_error() {
    let source = HttpVideoSource::new("not a url", DEFAULT_THUMBNAIL_BASE).unwrap();
    assert!(source.metadata_request_url("x").unwrap_err().is_input_error());
}
