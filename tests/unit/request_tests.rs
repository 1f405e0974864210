// Request parsing tests: storage keys and query parameters via the public API

use rstest::rstest;
use shirasagi::assets::{storage_key, AssetRequest};
use shirasagi::image_optimizer::{TargetFormat, TransformRequest};

#[rstest]
#[case::simple("/assets/u1/img1", Some("u1/img1"))]
#[case::nested("/assets/u1/albums/2024/img1.png", Some("u1/albums/2024/img1.png"))]
#[case::encoded_space("/assets/u1/my%20photo.jpg", Some("u1/my photo.jpg"))]
#[case::trailing_slash("/assets/u1/img1/", Some("u1/img1"))]
#[case::prefix_only("/assets", None)]
#[case::prefix_slash("/assets/", None)]
#[case::parent_segment("/assets/u1/../secret", None)]
#[case::encoded_parent("/assets/u1/%2E%2E/secret", None)]
#[case::encoded_slash("/assets/u1%2Fimg1", None)]
#[case::other_prefix("/images/u1/img1", None)]
#[case::prefix_lookalike("/assetsx/u1/img1", None)]
fn test_storage_key(#[case] path: &str, #[case] expected: Option<&str>) {
    assert_eq!(storage_key(path, "/assets"), expected.map(str::to_string));
}

#[rstest]
#[case::webp("format=webp", TargetFormat::WebP)]
#[case::jpg_alias("format=jpg", TargetFormat::Jpeg)]
#[case::uppercase("format=PNG", TargetFormat::Png)]
#[case::explicit_original("format=original", TargetFormat::Original)]
#[case::unknown("format=heic", TargetFormat::Reencode)]
#[case::absent("width=10", TargetFormat::Original)]
fn test_format_parameter(#[case] query: &str, #[case] expected: TargetFormat) {
    let request = AssetRequest::get(&format!("/assets/u1/img1?{}", query));
    let transform = TransformRequest::from_query("u1/img1", &request.query);
    assert_eq!(transform.format, expected);
}

#[test]
fn test_flags_require_literal_true() {
    let request = AssetRequest::get("/assets/u1/img1?original=1&autoOptimize=TRUE");
    let transform = TransformRequest::from_query("u1/img1", &request.query);
    assert!(!transform.return_original);
    assert!(!transform.auto_optimize);

    let request = AssetRequest::get("/assets/u1/img1?original=true&autoOptimize=true");
    let transform = TransformRequest::from_query("u1/img1", &request.query);
    assert!(transform.return_original);
    assert!(transform.auto_optimize);
}

#[test]
fn test_zero_dimensions_are_absent() {
    let request = AssetRequest::get("/assets/u1/img1?width=0&height=0");
    let transform = TransformRequest::from_query("u1/img1", &request.query);
    assert_eq!(transform.width, None);
    assert_eq!(transform.height, None);
}

#[test]
fn test_headers_are_kept_as_received() {
    let request = AssetRequest::get("/assets/u1/img1").with_header("Save-Data", "on");
    assert_eq!(
        request.headers.get("Save-Data").map(String::as_str),
        Some("on")
    );
}
