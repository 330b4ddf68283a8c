//! Display payload types.

use serde::{Deserialize, Serialize};

use crate::services::{EtlResult, OcrResult};

/// A finished pipeline result, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingResult {
    Ocr(OcrResult),
    Etl(EtlResult),
}

/// Tab-structured view of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub title: String,
    pub tabs: Vec<Tab>,
}

impl DisplayPayload {
    /// Look up a tab by id.
    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub content: TabContent,
}

impl Tab {
    pub(crate) fn new(id: &str, label: &str, content: TabContent) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TabContent {
    /// Key figures.
    Summary { items: Vec<SummaryItem> },
    /// Free text (extracted text, or a pretty-printed payload).
    Text { text: String },
    /// OCR text blocks in page order.
    Blocks { blocks: Vec<BlockView> },
    /// Top-level fields of an ETL payload.
    Fields { fields: Vec<FieldView> },
    /// The raw result serialized as JSON.
    Raw { json: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
    /// Colour hint, e.g. for the confidence figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SummaryItem {
    pub(crate) fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            color: None,
        }
    }

    pub(crate) fn colored(label: &str, value: impl Into<String>, color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::new(label, value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    /// 1-based position in the result.
    pub index: usize,
    pub text: String,
    pub confidence: f64,
    pub page: u32,
    pub band: ConfidenceBand,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    pub key: String,
    pub value: String,
}

/// Confidence classification of a recognised fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// 80 and above.
    Strong,
    /// 60 to 80.
    Moderate,
    /// 40 to 60.
    Weak,
    Poor,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 80.0 {
            ConfidenceBand::Strong
        } else if confidence >= 60.0 {
            ConfidenceBand::Moderate
        } else if confidence >= 40.0 {
            ConfidenceBand::Weak
        } else {
            ConfidenceBand::Poor
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ConfidenceBand::Strong => "#22c55e",
            ConfidenceBand::Moderate => "#f59e0b",
            ConfidenceBand::Weak => "#f97316",
            ConfidenceBand::Poor => "#ef4444",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(ConfidenceBand::from_confidence(100.0), ConfidenceBand::Strong);
        assert_eq!(ConfidenceBand::from_confidence(80.0), ConfidenceBand::Strong);
        assert_eq!(ConfidenceBand::from_confidence(79.9), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(60.0), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(40.0), ConfidenceBand::Weak);
        assert_eq!(ConfidenceBand::from_confidence(39.99), ConfidenceBand::Poor);
        assert_eq!(ConfidenceBand::from_confidence(0.0), ConfidenceBand::Poor);
    }

    #[test]
    fn test_tab_content_serialization() {
        let content = TabContent::Text {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["text"], "hello");
    }
}
