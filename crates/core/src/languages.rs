//! OCR language catalog.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::services::{LanguageList, OcrService};

const FALLBACK_LANGUAGE: &str = "eng";

/// Display name for an OCR language code.
///
/// Unknown codes render upper-cased.
pub fn display_name(code: &str) -> String {
    let name = match code {
        "eng" => "English",
        "fra" => "French",
        "deu" => "German",
        "spa" => "Spanish",
        "ita" => "Italian",
        "por" => "Portuguese",
        "hau" => "Hausa",
        "ibo" => "Igbo",
        "yor" => "Yoruba",
        other => return other.to_uppercase(),
    };
    name.to_string()
}

/// One entry of the language selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
    pub selected: bool,
}

impl LanguageOption {
    fn new(code: &str, selected: bool) -> Self {
        Self {
            code: code.to_string(),
            name: display_name(code),
            selected,
        }
    }
}

/// Build options from the service's list; the default code is selected.
pub fn options_from_list(list: &LanguageList) -> Vec<LanguageOption> {
    list.supported
        .iter()
        .map(|code| LanguageOption::new(code, *code == list.default))
        .collect()
}

/// Fetch the catalog, falling back to English only if the service is
/// unavailable or returns an empty list.
pub async fn load_language_options(ocr: &dyn OcrService) -> Vec<LanguageOption> {
    match ocr.languages().await {
        Ok(list) if !list.supported.is_empty() => {
            info!(
                count = list.supported.len(),
                default = %list.default,
                "Loaded OCR language catalog"
            );
            options_from_list(&list)
        }
        Ok(_) => {
            warn!("OCR service returned no languages, using fallback");
            fallback_options()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load OCR languages, using fallback");
            fallback_options()
        }
    }
}

fn fallback_options() -> Vec<LanguageOption> {
    vec![LanguageOption::new(FALLBACK_LANGUAGE, true)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockOcrService;

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("eng"), "English");
        assert_eq!(display_name("yor"), "Yoruba");
        assert_eq!(display_name("jpn"), "JPN");
    }

    #[test]
    fn test_default_is_selected() {
        let list = LanguageList {
            supported: vec!["eng".into(), "fra".into(), "hau".into()],
            default: "fra".into(),
        };
        let options = options_from_list(&list);
        assert_eq!(options.len(), 3);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].name, "French");
        assert_eq!(options[2].name, "Hausa");
    }

    #[tokio::test]
    async fn test_load_from_service() {
        let ocr = MockOcrService::new();
        ocr.set_languages(LanguageList {
            supported: vec!["eng".into(), "ibo".into()],
            default: "eng".into(),
        });
        let options = load_language_options(&ocr).await;
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].name, "Igbo");
    }

    #[tokio::test]
    async fn test_fallback_on_failure() {
        let ocr = MockOcrService::new();
        ocr.fail_languages();
        let options = load_language_options(&ocr).await;
        assert_eq!(
            options,
            vec![LanguageOption {
                code: "eng".into(),
                name: "English".into(),
                selected: true
            }]
        );
    }
}
