//! Turns a finished result into a tabbed display payload.
//!
//! Rendering is pure: the same input always yields the same payload.

mod types;

pub use types::{
    BlockView, ConfidenceBand, DisplayPayload, FieldView, ProcessingResult, SummaryItem, Tab,
    TabContent,
};

use serde::Serialize;
use serde_json::Value;

use crate::languages::display_name;
use crate::services::{EtlResult, OcrResult};

/// Render a pipeline result.
pub fn render(result: &ProcessingResult) -> DisplayPayload {
    match result {
        ProcessingResult::Ocr(ocr) => render_ocr(ocr),
        ProcessingResult::Etl(etl) => render_etl(etl),
    }
}

fn render_ocr(result: &OcrResult) -> DisplayPayload {
    let band = ConfidenceBand::from_confidence(result.overall_confidence);

    let summary = vec![
        SummaryItem::colored(
            "Overall confidence",
            format!("{:.0}%", result.overall_confidence),
            band.color(),
        ),
        SummaryItem::new("Pages", result.total_pages.to_string()),
        SummaryItem::new("Text blocks", result.text_blocks.len().to_string()),
        SummaryItem::new(
            "Processing time",
            format!("{:.2}s", result.processing_time_seconds),
        ),
        SummaryItem::new("Language", display_name(&result.language)),
        SummaryItem::new("File size", format_bytes(result.metadata.file_size_bytes)),
    ];

    let blocks = result
        .text_blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let band = ConfidenceBand::from_confidence(block.confidence);
            BlockView {
                index: i + 1,
                text: block.text.clone(),
                confidence: block.confidence,
                page: block.page,
                band,
                color: band.color().to_string(),
            }
        })
        .collect();

    DisplayPayload {
        title: "OCR Results".to_string(),
        tabs: vec![
            Tab::new("summary", "Summary", TabContent::Summary { items: summary }),
            Tab::new(
                "text",
                "Full Text",
                TabContent::Text {
                    text: result.full_text.clone(),
                },
            ),
            Tab::new("blocks", "Text Blocks", TabContent::Blocks { blocks }),
            Tab::new("raw", "Raw JSON", raw(result)),
        ],
    }
}

fn render_etl(result: &EtlResult) -> DisplayPayload {
    let payload = result.payload();

    let fields: Vec<FieldView> = match payload {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| FieldView {
                key: key.clone(),
                value: field_value(value),
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut summary = vec![SummaryItem::new("Fields", fields.len().to_string())];
    for key in ["job_id", "status", "language"] {
        if let Some(Value::String(value)) = payload.get(key) {
            summary.push(SummaryItem::new(key, value.clone()));
        }
    }

    DisplayPayload {
        title: "ETL Results".to_string(),
        tabs: vec![
            Tab::new("summary", "Summary", TabContent::Summary { items: summary }),
            Tab::new(
                "result",
                "Result",
                TabContent::Text {
                    text: pretty(payload),
                },
            ),
            Tab::new("fields", "Fields", TabContent::Fields { fields }),
            Tab::new("raw", "Raw JSON", raw(payload)),
        ],
    }
}

/// Strings are shown without quotes, everything else as compact JSON.
fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

fn raw<T: Serialize + ?Sized>(value: &T) -> TabContent {
    TabContent::Raw { json: pretty(value) }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn summary_value<'a>(payload: &'a DisplayPayload, label: &str) -> &'a SummaryItem {
        match &payload.tab("summary").unwrap().content {
            TabContent::Summary { items } => items.iter().find(|i| i.label == label).unwrap(),
            other => panic!("unexpected summary content: {:?}", other),
        }
    }

    #[test]
    fn test_ocr_summary_shows_percentage_and_band() {
        let payload = render(&ProcessingResult::Ocr(fixtures::ocr_result(92.0)));
        let confidence = summary_value(&payload, "Overall confidence");
        assert_eq!(confidence.value, "92%");
        assert_eq!(
            confidence.color.as_deref(),
            Some(ConfidenceBand::Strong.color())
        );
    }

    #[test]
    fn test_ocr_tabs() {
        let payload = render(&ProcessingResult::Ocr(fixtures::ocr_result(55.0)));
        let ids: Vec<&str> = payload.tabs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["summary", "text", "blocks", "raw"]);

        match &payload.tab("blocks").unwrap().content {
            TabContent::Blocks { blocks } => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0].index, 1);
                assert_eq!(blocks[0].color, blocks[0].band.color());
            }
            other => panic!("unexpected blocks content: {:?}", other),
        }
        assert_eq!(summary_value(&payload, "Language").value, "English");
    }

    #[test]
    fn test_render_is_idempotent() {
        let result = ProcessingResult::Ocr(fixtures::ocr_result(71.3));
        assert_eq!(render(&result), render(&result));

        let result = ProcessingResult::Etl(EtlResult(serde_json::json!({"a": 1, "b": "x"})));
        assert_eq!(render(&result), render(&result));
    }

    #[test]
    fn test_etl_fields() {
        let payload = render(&ProcessingResult::Etl(EtlResult(serde_json::json!({
            "job_id": "j9",
            "status": "completed",
            "pages": 3
        }))));

        match &payload.tab("fields").unwrap().content {
            TabContent::Fields { fields } => {
                let pages = fields.iter().find(|f| f.key == "pages").unwrap();
                assert_eq!(pages.value, "3");
                let status = fields.iter().find(|f| f.key == "status").unwrap();
                assert_eq!(status.value, "completed");
            }
            other => panic!("unexpected fields content: {:?}", other),
        }
        assert_eq!(summary_value(&payload, "job_id").value, "j9");
        assert_eq!(summary_value(&payload, "Fields").value, "3");
    }

    #[test]
    fn test_etl_non_object_payload() {
        let payload = render(&ProcessingResult::Etl(EtlResult(serde_json::json!("done"))));
        match &payload.tab("result").unwrap().content {
            TabContent::Text { text } => assert_eq!(text, "\"done\""),
            other => panic!("unexpected result content: {:?}", other),
        }
        match &payload.tab("fields").unwrap().content {
            TabContent::Fields { fields } => assert!(fields.is_empty()),
            other => panic!("unexpected fields content: {:?}", other),
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
