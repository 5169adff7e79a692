//! Integration tests for remote service request rendering.

use richdoc::render::service::{
    BulletPreset, NamedStyleType, Range, ServiceRequest, ServiceTextStyle,
};
use richdoc::render::{ServiceOptions, ServiceRenderer};
use richdoc::{
    build_word_bank_blocks, parse_markup, to_service_requests, JsonFormat, Rgb, WordBankEntry,
};

#[test]
fn test_end_to_end_from_index_one() {
    let blocks = parse_markup(
        r#"<h1>Title</h1><p>Hello <span style="background-color:#FFF176">world</span></p>"#,
    );
    let batch = to_service_requests(&blocks, 1);

    assert_eq!(batch.text, "Title\nHello world\n");
    assert_eq!(batch.requests.len(), 3);

    assert!(matches!(
        &batch.requests[0],
        ServiceRequest::InsertText { location, text } if location.index == 1 && text == &batch.text
    ));

    match &batch.requests[1] {
        ServiceRequest::UpdateParagraphStyle {
            range,
            paragraph_style,
            fields,
        } => {
            assert_eq!(*range, Range::new(1, 7));
            assert_eq!(paragraph_style.named_style_type, Some(NamedStyleType::Heading1));
            assert_eq!(fields, "namedStyleType");
        }
        other => panic!("expected paragraph style, got {:?}", other),
    }

    match &batch.requests[2] {
        ServiceRequest::UpdateTextStyle {
            range,
            text_style,
            fields,
        } => {
            assert_eq!(*range, Range::new(13, 18));
            assert_eq!(fields, "backgroundColor");
            assert_eq!(
                *text_style,
                ServiceTextStyle {
                    background_color: Some(Rgb::from_u8(0xff, 0xf1, 0x76).into()),
                    ..Default::default()
                }
            );
        }
        other => panic!("expected text style, got {:?}", other),
    }
}

#[test]
fn test_ranges_ordered_and_disjoint_per_kind() {
    let markup = concat!(
        "<h2>Unit <em>3</em></h2>",
        "<p>Read <b>carefully</b> and <u>underline</u> key <span style=\"color:red\">words</span>.</p>",
        "<ol><li>first</li><li>second<ul><li>nested <b>bold</b></li></ul></li></ol>",
        "<hr>",
        "<p>End</p>"
    );
    let batch = to_service_requests(&parse_markup(markup), 25);
    let end = 25 + batch.text.encode_utf16().count();

    assert_eq!(batch.count("insertText"), 1);
    assert_eq!(batch.requests[0].kind(), "insertText");

    for kind in ["createParagraphBullets", "updateTextStyle"] {
        let ranges: Vec<Range> = batch
            .requests
            .iter()
            .filter(|r| r.kind() == kind)
            .filter_map(ServiceRequest::range)
            .collect();
        assert!(!ranges.is_empty());
        for range in &ranges {
            assert!(range.start_index >= 25);
            assert!(range.start_index < range.end_index);
            assert!(range.end_index <= end);
        }
        for pair in ranges.windows(2) {
            assert!(pair[0].start_index <= pair[1].start_index);
            assert!(!pair[0].overlaps(&pair[1]));
        }
    }

    // Structural requests come before any text style request.
    let first_text_style = batch
        .requests
        .iter()
        .position(|r| r.kind() == "updateTextStyle")
        .unwrap();
    assert!(batch.requests[first_text_style..]
        .iter()
        .all(|r| r.kind() == "updateTextStyle"));
}

#[test]
fn test_nested_list_indent_request() {
    let batch = to_service_requests(&parse_markup("<ul><li>a<ul><li>b</li></ul></li></ul>"), 1);
    let indents: Vec<f32> = batch
        .requests
        .iter()
        .filter_map(|r| match r {
            ServiceRequest::UpdateParagraphStyle {
                paragraph_style, ..
            } => paragraph_style.indent_start.map(|d| d.magnitude),
            _ => None,
        })
        .collect();
    assert_eq!(indents, vec![36.0]);

    let presets: Vec<BulletPreset> = batch
        .requests
        .iter()
        .filter_map(|r| match r {
            ServiceRequest::CreateParagraphBullets { bullet_preset, .. } => Some(*bullet_preset),
            _ => None,
        })
        .collect();
    assert_eq!(presets, vec![BulletPreset::BulletDiscCircleSquare; 2]);
}

#[test]
fn test_word_bank_requests() {
    let blocks = build_word_bank_blocks(&[WordBankEntry::new("verb", "an action word")]);
    let batch = to_service_requests(&blocks, 1);

    let rule = "\u{2500}".repeat(40);
    assert_eq!(
        batch.text,
        format!("{}\nWord Bank\nverb \u{2014} an action word\n", rule)
    );
    // Divider style, heading, bold brand-colored term.
    assert_eq!(batch.count("updateParagraphStyle"), 1);
    assert_eq!(batch.count("updateTextStyle"), 2);

    let fields: Vec<&str> = batch
        .requests
        .iter()
        .filter_map(|r| match r {
            ServiceRequest::UpdateTextStyle { fields, .. } => Some(fields.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(fields, vec!["fontSize,foregroundColor", "bold,foregroundColor"]);
}

#[test]
fn test_custom_indent_and_divider() {
    let options = ServiceOptions::new().with_indent_unit(18.0).with_divider('=', 3);
    let blocks = parse_markup("<hr><ol><li>x<ol><li>y</li></ol></li></ol>");
    let batch = ServiceRenderer::new(options).render(&blocks, 1);

    assert_eq!(batch.text, "===\nx\ny\n");
    let json = batch.to_request_body(JsonFormat::Compact).unwrap();
    assert!(json.contains(r#""indentStart":{"magnitude":18.0,"unit":"PT"}"#));
    assert!(json.contains(r#""bulletPreset":"NUMBERED_DECIMAL_ALPHA_ROMAN""#));
}

#[test]
fn test_request_body_round_trips_through_serde() {
    let batch = to_service_requests(&parse_markup("<p><i>x</i></p>"), 1);
    let json = batch.to_request_body(JsonFormat::Pretty).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["requests"][1]["updateTextStyle"]["textStyle"]["italic"], true);
    assert_eq!(value["requests"][1]["updateTextStyle"]["fields"], "italic");
}
