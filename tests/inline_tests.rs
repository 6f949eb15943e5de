mod common;
use std::fs;

use common::{
    assert_converted_doc_matches_expected_dast, assert_converted_doc_matches_expected_dast_from_str,
};
use rstest::rstest;

#[rstest]
#[case::strong("strong", "strong")]
#[case::bold("b", "strong")]
#[case::italic("i", "emphasis")]
#[case::em("em", "emphasis")]
#[case::small("small", "emphasis")]
#[case::underline("u", "underline")]
#[tokio::test]
async fn test_marks(#[case] tag: &str, #[case] mark: &str) {
    let html = fs::read_to_string("tests/data/inlines/mark.html")
        .expect("Unable to read html test template")
        .replace("TAG", tag);
    let dast_json = fs::read_to_string("tests/data/inlines/mark.json")
        .expect("Unable to read dast json test template")
        .replace("MARK", mark);
    assert_converted_doc_matches_expected_dast_from_str(&html, &dast_json).await
}

#[rstest]
#[case::marks_in_order("inlines/marks-in-order")]
#[case::plain_carriers("inlines/plain-carriers")]
#[case::line_breaks("inlines/line-breaks")]
#[case::link_in_paragraph("inlines/link-in-paragraph")]
#[tokio::test]
async fn test_inlines(#[case] fn_pattern: &str) {
    let html_fn = format!("{}.html", fn_pattern);
    let dast_json_fn = format!("{}.json", fn_pattern);
    assert_converted_doc_matches_expected_dast(&html_fn, &dast_json_fn).await
}

#[rstest]
#[case::link("inlines/link")]
#[case::spans("inlines/root-spans")]
#[case::bold("inlines/root-bold")]
#[case::empty_paragraph_links("inlines/empty-paragraph-links")]
#[tokio::test]
/// Spans and links never sit directly under the root
async fn test_root_inlines_are_promoted(#[case] fn_pattern: &str) {
    let html_fn = format!("{}.html", fn_pattern);
    let dast_json_fn = format!("{}.json", fn_pattern);
    assert_converted_doc_matches_expected_dast(&html_fn, &dast_json_fn).await
}

#[tokio::test]
/// Nested emphasis is not composed: the outer tag's mark covers all of its text
async fn test_nested_emphasis_keeps_single_mark() {
    assert_converted_doc_matches_expected_dast(
        "inlines/nested-emphasis.html",
        "inlines/nested-emphasis.json",
    )
    .await
}
