//! Integration tests for the conversion front door.

use std::fs;

use richdoc::convert::convert_file;
use richdoc::{
    convert, convert_batch, parse_file, ConvertOptions, Error, JsonFormat, OutputFormat, Richdoc,
    WordBankEntry,
};

const LESSON: &str = r#"
<h2>Water Cycle</h2>
<p>Water moves through <b>evaporation</b>, <i>condensation</i> and precipitation.</p>
<ol><li>Heat</li><li>Rise</li><li>Fall</li></ol>
"#;

#[test]
fn test_convert_all_formats() {
    for format in OutputFormat::ALL {
        let options = ConvertOptions::new().with_format(format);
        let result = convert(LESSON, &options).unwrap();
        assert!(!result.content.is_empty(), "{} output empty", format.name());
        assert_eq!(result.block_count, 5);
        assert_eq!(result.mime_type(), format.mime_type());
    }
}

#[test]
fn test_json_formats_parse() {
    for format in [OutputFormat::Requests, OutputFormat::Pages, OutputFormat::Blocks] {
        let options = ConvertOptions::new()
            .with_format(format)
            .with_json_format(JsonFormat::Compact);
        let result = convert(LESSON, &options).unwrap();
        assert!(!result.content.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&result.content).unwrap();
        assert!(value.is_object());
    }
}

#[test]
fn test_markdown_preview() {
    let options = ConvertOptions::new().with_format(OutputFormat::Markdown);
    let result = convert(LESSON, &options).unwrap();
    assert_eq!(
        result.content,
        "## Water Cycle\n\nWater moves through **evaporation**, *condensation* and precipitation.\n\n1. Heat\n2. Rise\n3. Fall"
    );
}

#[test]
fn test_start_index_shifts_requests() {
    let options = ConvertOptions::new()
        .with_start_index(100)
        .with_json_format(JsonFormat::Compact);
    let result = convert("<p>x</p>", &options).unwrap();
    assert!(result.content.contains(r#""location":{"index":100}"#));
}

#[test]
fn test_convert_file_and_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lesson.html");
    fs::write(&path, LESSON).unwrap();

    let blocks = parse_file(&path).unwrap();
    assert_eq!(blocks.len(), 5);

    let options = ConvertOptions::new()
        .with_format(OutputFormat::Text)
        .with_word_bank(vec![WordBankEntry::new("evaporation", "liquid to gas")]);
    let result = convert_file(&path, &options).unwrap();
    assert!(result.content.ends_with("evaporation \u{2014} liquid to gas"));

    let built = Richdoc::new().parse_file(&path).unwrap();
    assert_eq!(built.blocks().len(), 5);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = convert_file(dir.path().join("absent.html"), &ConvertOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_batch_matches_sequential() {
    let inputs: Vec<String> = (0..16)
        .map(|i| format!("<h3>Item {}</h3><p>Body <u>{}</u></p>", i, i))
        .collect();
    let options = ConvertOptions::new().with_json_format(JsonFormat::Compact);

    let batch = convert_batch(&inputs, &options);
    assert_eq!(batch.len(), inputs.len());
    for (input, result) in inputs.iter().zip(batch) {
        let sequential = convert(input, &options).unwrap();
        assert_eq!(result.unwrap().content, sequential.content);
    }
}
