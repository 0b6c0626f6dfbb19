use std::io;

use sitepatch::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::DuplicateSlug { slug: "hello".to_string() };
    assert_eq!(err.to_string(), "Duplicate post slug 'hello'.");

    let err = Error::InvalidDate { slug: "hello".to_string(), date: "soon".to_string() };
    assert_eq!(err.to_string(), "Post 'hello' has an unparseable date 'soon'.");
}

#[test]
fn test_data_error_names_the_file() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = Error::DataError { path: "_src/_data/posts.json".to_string(), source };
    assert!(err.to_string().starts_with("Data error in '_src/_data/posts.json'"));
}
