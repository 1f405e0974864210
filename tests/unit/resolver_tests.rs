// Parameter resolution tests: device and network adaptive optimization

use rstest::rstest;
use std::collections::HashMap;

use shirasagi::assets::parse_query_string;
use shirasagi::image_optimizer::TargetFormat;
use shirasagi::resolver::{apply_auto_optimization, resolve, ConnectionClass, DeviceClass};

const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0";
const MODERN_ACCEPT: &str = "image/avif,image/webp,*/*";

fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_resolution_is_deterministic() {
    let query = parse_query_string("autoOptimize=true&width=1200");
    let hdrs = headers(&[("User-Agent", IPHONE), ("ECT", "3g")]);

    assert_eq!(
        resolve("u1/img1", &query, &hdrs),
        resolve("u1/img1", &query, &hdrs)
    );
}

#[test]
fn test_explicit_parameters_without_auto_optimize() {
    let query = parse_query_string("format=webp&quality=60&width=500");
    let resolution = resolve("u1/img1", &query, &headers(&[("User-Agent", IPHONE)]));

    assert_eq!(resolution.effective.format, TargetFormat::WebP);
    assert_eq!(resolution.effective.quality, 60);
    assert_eq!(resolution.effective.width, Some(500));
    assert_eq!(resolution.effective.height, None);
    assert!(!resolution.varies_by_client());
}

#[test]
fn test_original_overrides_auto_optimize() {
    let query = parse_query_string("original=true&autoOptimize=true&format=jpeg&width=10");
    let resolution = resolve(
        "u1/img1",
        &query,
        &headers(&[("User-Agent", IPHONE), ("Save-Data", "on")]),
    );

    assert!(resolution.effective.is_passthrough());
    assert!(!resolution.varies_by_client());
}

#[rstest]
#[case::mobile_slow(IPHONE, "slow-2g", TargetFormat::Jpeg, 50, Some(600))]
#[case::mobile_moderate(IPHONE, "3g", TargetFormat::WebP, 50, Some(800))]
#[case::mobile_fast(IPHONE, "4g", TargetFormat::WebP, 50, Some(800))]
#[case::desktop_slow(DESKTOP, "2g", TargetFormat::Jpeg, 50, None)]
#[case::desktop_moderate(DESKTOP, "3g", TargetFormat::WebP, 70, None)]
#[case::desktop_fast(DESKTOP, "4g", TargetFormat::WebP, 90, None)]
fn test_auto_optimize_matrix(
    #[case] user_agent: &str,
    #[case] ect: &str,
    #[case] format: TargetFormat,
    #[case] quality: i32,
    #[case] width: Option<u32>,
) {
    let query = parse_query_string("autoOptimize=true");
    let hdrs = headers(&[
        ("User-Agent", user_agent),
        ("Accept", MODERN_ACCEPT),
        ("ECT", ect),
    ]);

    let resolution = resolve("u1/img1", &query, &hdrs);

    assert_eq!(resolution.effective.format, format);
    assert_eq!(resolution.effective.quality, quality);
    assert_eq!(resolution.effective.width, width);
    assert!(resolution.varies_by_client());
}

#[test]
fn test_explicit_width_is_clamped_on_slow_connection() {
    let query = parse_query_string("autoOptimize=true&width=1500&height=900");
    let hdrs = headers(&[("User-Agent", DESKTOP), ("Save-Data", "on")]);

    let resolution = resolve("u1/img1", &query, &hdrs);

    assert_eq!(resolution.connection, ConnectionClass::Slow);
    assert_eq!(resolution.effective.width, Some(600));
    assert_eq!(resolution.effective.height, Some(600));
}

#[test]
fn test_ipad_and_android_classify_as_mobile() {
    let ipad = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)";
    let android_tablet = "Mozilla/5.0 (Linux; Android 14; SM-X910)";

    assert_eq!(DeviceClass::from_user_agent(Some(ipad)), DeviceClass::Mobile);
    assert_eq!(
        DeviceClass::from_user_agent(Some(android_tablet)),
        DeviceClass::Mobile
    );
    assert_eq!(DeviceClass::from_user_agent(None), DeviceClass::Desktop);
}

#[test]
fn test_tablet_defaults() {
    let base = resolve("u1/img1", &HashMap::new(), &HashMap::new()).effective;
    let tablet = apply_auto_optimization(base, DeviceClass::Tablet, ConnectionClass::Fast);

    assert_eq!(tablet.format, TargetFormat::WebP);
    assert_eq!(tablet.quality, 75);
    assert_eq!(tablet.width, Some(1200));
}

#[test]
fn test_missing_accept_header_counts_as_moderate() {
    let query = parse_query_string("autoOptimize=true");
    let resolution = resolve("u1/img1", &query, &headers(&[("User-Agent", DESKTOP)]));

    assert_eq!(resolution.connection, ConnectionClass::Moderate);
    assert_eq!(resolution.effective.quality, 70);
}
