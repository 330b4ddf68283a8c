//! Submission form input and the validated request built from it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::OcrDefaults;
use super::error::ValidationError;
use crate::services::UploadFile;

/// Which pipeline handles a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingType {
    /// Optical text extraction (OCR pipeline).
    Ocr,
    /// Translation (ETL pipeline, requires source and target languages).
    Translate,
    /// Any other extraction (ETL pipeline).
    ExtractOther,
}

impl ProcessingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingType::Ocr => "ocr",
            ProcessingType::Translate => "translate",
            ProcessingType::ExtractOther => "extract-other",
        }
    }

    /// Pipeline label used for logs and metrics.
    pub fn pipeline(&self) -> &'static str {
        match self {
            ProcessingType::Ocr => "ocr",
            ProcessingType::Translate | ProcessingType::ExtractOther => "etl",
        }
    }
}

impl FromStr for ProcessingType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ValidationError::MissingProcessingType),
            "ocr" => Ok(ProcessingType::Ocr),
            "translate" => Ok(ProcessingType::Translate),
            "extract" | "extract-other" | "extract_other" => Ok(ProcessingType::ExtractOther),
            other => Err(ValidationError::UnknownProcessingType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProcessingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form state at submit time. Nothing here is validated yet.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub file: Option<UploadFile>,
    pub processing_type: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub ocr_language: Option<String>,
    pub confidence_threshold: Option<String>,
}

impl SubmissionForm {
    pub fn new(file: UploadFile, processing_type: impl Into<String>) -> Self {
        Self {
            file: Some(file),
            processing_type: Some(processing_type.into()),
            ..Default::default()
        }
    }

    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_language = Some(source.into());
        self.target_language = Some(target.into());
        self
    }

    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = Some(language.into());
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.confidence_threshold = Some(threshold.into());
        self
    }
}

/// A validated submission. Immutable once built.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    file: UploadFile,
    processing_type: ProcessingType,
    source_language: Option<String>,
    target_language: Option<String>,
    ocr_language: Option<String>,
    confidence_threshold: Option<f64>,
}

impl SubmissionRequest {
    /// Validate the form and apply OCR defaults.
    ///
    /// - a non-empty file and a processing type are required
    /// - `translate` requires both languages
    /// - `ocr` fills in the default language and confidence threshold
    pub fn from_form(form: SubmissionForm, defaults: &OcrDefaults) -> Result<Self, ValidationError> {
        let file = form
            .file
            .filter(|f| !f.is_empty())
            .ok_or(ValidationError::MissingFile)?;

        let processing_type: ProcessingType = form
            .processing_type
            .as_deref()
            .unwrap_or("")
            .parse()?;

        let source_language = non_empty(form.source_language);
        let target_language = non_empty(form.target_language);

        if processing_type == ProcessingType::Translate
            && (source_language.is_none() || target_language.is_none())
        {
            return Err(ValidationError::MissingTranslationLanguages);
        }

        let (ocr_language, confidence_threshold) = if processing_type == ProcessingType::Ocr {
            let language = non_empty(form.ocr_language)
                .unwrap_or_else(|| defaults.default_language.clone());
            let threshold = match non_empty(form.confidence_threshold) {
                Some(raw) => parse_threshold(&raw)?,
                None => defaults.default_confidence_threshold,
            };
            (Some(language), Some(threshold))
        } else {
            (None, None)
        };

        Ok(Self {
            file,
            processing_type,
            source_language,
            target_language,
            ocr_language,
            confidence_threshold,
        })
    }

    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    pub fn processing_type(&self) -> ProcessingType {
        self.processing_type
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    pub fn target_language(&self) -> Option<&str> {
        self.target_language.as_deref()
    }

    pub fn ocr_language(&self) -> Option<&str> {
        self.ocr_language.as_deref()
    }

    pub fn confidence_threshold(&self) -> Option<f64> {
        self.confidence_threshold
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_threshold(raw: &str) -> Result<f64, ValidationError> {
    match raw.parse::<f64>() {
        Ok(value) if (0.0..=100.0).contains(&value) => Ok(value),
        _ => Err(ValidationError::InvalidConfidenceThreshold(raw.to_string())),
    }
}
