use std::str::FromStr;
use storyforge_core::{
    AspectRatio, MediaPayload, PlatformTips, StoryParametersBuilder, StrategyRecord,
    StrategySource, VisualStyle,
};

#[test]
fn aspect_ratio_directives() {
    assert_eq!(AspectRatio::Portrait.directive(), "9:16 (Vertical)");
    assert_eq!(AspectRatio::Landscape.directive(), "16:9 (Cinematic)");
    assert_eq!(AspectRatio::from_str("9:16").unwrap(), AspectRatio::Portrait);
    assert_eq!(AspectRatio::from_str("Landscape").unwrap(), AspectRatio::Landscape);
    assert_eq!(AspectRatio::Portrait.to_string(), "portrait");
}

#[test]
fn style_aliases_parse() {
    assert_eq!(VisualStyle::from_str("flat").unwrap(), VisualStyle::FlatIllustration);
    assert_eq!(VisualStyle::from_str("realistic").unwrap(), VisualStyle::Photoreal);
    assert_eq!(VisualStyle::Photoreal.to_string(), "photoreal");
    assert!(VisualStyle::from_str("watercolor").is_err());
}

#[test]
fn style_serializes_as_its_display_name() {
    let json = serde_json::to_value(VisualStyle::Animated3d).unwrap();
    assert_eq!(json, "animated-3d");
    assert_eq!(json, VisualStyle::Animated3d.to_string());

    let flat: VisualStyle = serde_json::from_value("flat-illustration".into()).unwrap();
    assert_eq!(flat, VisualStyle::FlatIllustration);
}

#[test]
fn guidance_carries_profile_context() {
    let params = StoryParametersBuilder::default()
        .guidance("Keep it short")
        .profile_context("Cooking channel for kids")
        .build()
        .unwrap();

    let guidance = params.effective_guidance();
    assert!(guidance.starts_with("[PROFILE CONTEXT]: Cooking channel for kids"));
    assert!(guidance.ends_with("[SPECIFIC INSTRUCTIONS]: Keep it short"));
}

#[test]
fn blank_optional_fields_are_ignored() {
    let params = StoryParametersBuilder::default()
        .audience("  ")
        .goal("Sell cookbooks")
        .closing_line("   ")
        .build()
        .unwrap();

    assert_eq!(params.effective_audience(), "General audience");
    assert_eq!(params.effective_goal(), "Sell cookbooks");
    assert_eq!(params.effective_closing_line(), None);
    assert_eq!(params.effective_guidance(), "");
}

#[test]
fn media_payload_serializes_as_base64() {
    let payload = MediaPayload::new("image/jpeg", vec![0xff, 0xd8, 0xff]);
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["data"], "/9j/");

    let back: MediaPayload = serde_json::from_value(json).unwrap();
    assert_eq!(back, payload);
    assert_eq!(back.extension(), "jpg");
}

#[test]
fn strategy_constructor_normalizes_hashtags() {
    let record = StrategyRecord::new(
        vec!["Look!".into()],
        "A story.",
        vec!["cooking".into(), "#Cooking".into(), "#kids".into()],
        PlatformTips::default(),
        "18:00",
        StrategySource::Generated,
    );

    assert_eq!(record.hashtags(), &vec!["#cooking".to_string(), "#kids".to_string()]);
    assert_eq!(
        record.platform_tips().photo_reel(),
        PlatformTips::fallback_photo_reel()
    );
}
