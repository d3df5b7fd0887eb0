//! Tests for layered configuration loading.

use std::path::PathBuf;
use storyforge::{AspectRatio, StoryforgeConfig, VisualStyle};

#[test]
fn test_bundled_defaults() {
    let config = StoryforgeConfig::from_toml_str("").unwrap();

    assert_eq!(config.gemini().image_model(), "gemini-2.5-flash-image");
    assert_eq!(config.gemini().text_model(), "gemini-2.5-flash");
    assert_eq!(*config.gemini().timeout_secs(), 120);
    assert_eq!(config.production().language(), "Spanish");
    assert_eq!(config.production().style(), &VisualStyle::Animated3d);
    assert_eq!(config.production().aspect_ratio(), &AspectRatio::Landscape);
    assert!(config.storage().path().is_empty());
}

#[test]
fn test_partial_override_keeps_other_defaults() {
    let config = StoryforgeConfig::from_toml_str(
        r#"
[gemini]
image_model = "gemini-3-pro-image"

[production]
style = "photoreal"
aspect_ratio = "portrait"
"#,
    )
    .unwrap();

    assert_eq!(config.gemini().image_model(), "gemini-3-pro-image");
    assert_eq!(config.gemini().text_model(), "gemini-2.5-flash");
    assert_eq!(config.production().style(), &VisualStyle::Photoreal);
    assert_eq!(config.production().aspect_ratio(), &AspectRatio::Portrait);
    assert_eq!(config.production().language(), "Spanish");
}

#[test]
fn test_explicit_file_is_applied_last() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        r#"
[storage]
path = "/srv/storyforge"

[production]
language = "English"
"#,
    )
    .unwrap();

    let config = StoryforgeConfig::load_with(Some(&path)).unwrap();

    assert_eq!(config.production().language(), "English");
    assert_eq!(
        config.storage().resolve_path().unwrap(),
        PathBuf::from("/srv/storyforge")
    );
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(StoryforgeConfig::load_with(Some(&missing)).is_err());
}

#[test]
fn test_invalid_style_is_an_error() {
    let result = StoryforgeConfig::from_toml_str(
        r#"
[production]
style = "watercolor"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_production_defaults_seed_parameters() {
    let config = StoryforgeConfig::from_toml_str(
        r#"
[production]
default_audience = "Teenagers"
"#,
    )
    .unwrap();
    let params = config.production().default_parameters();

    assert_eq!(params.audience(), "Teenagers");
    assert_eq!(params.effective_goal(), "Viral entertainment");
}
