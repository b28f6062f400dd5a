//! Boundary with the document extraction and advice services.
//!
//! Neither service is implemented here. The core only fixes the shape of
//! what goes in and out, and makes sure their failures never stop a
//! comparison from being returned.

use super::compare::{compare_regimes, ComparisonResult};
use super::profile::{FinancialProfile, ProfileInput};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Uploaded payslip, Form 16 or similar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// What an uploaded document may be
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_mime_types: Vec<String>,
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        UploadPolicy {
            allowed_mime_types: ["application/pdf", "image/png", "image/jpeg", "image/webp"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UploadPolicy {
    pub fn check(&self, document: &Document) -> Result<(), ExtractionError> {
        if document.bytes.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        if !self
            .allowed_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(&document.mime_type))
        {
            return Err(ExtractionError::UnsupportedType(document.mime_type.clone()));
        }
        if document.bytes.len() > self.max_bytes {
            return Err(ExtractionError::TooLarge {
                size: document.bytes.len(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("document is empty")]
    EmptyDocument,
    #[error("unsupported document type: {0}")]
    UnsupportedType(String),
    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("extraction service failed: {0}")]
    Service(String),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AdviceError {
    #[error("advice service unavailable: {0}")]
    Unavailable(String),
    #[error("advice service returned no text")]
    Empty,
}

/// One extracted value with the text it was read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Extracted<T> {
    pub value: T,
    #[serde(default)]
    pub evidence: String,
}

/// Best effort profile read from a document. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedProfile {
    #[schemars(with = "Option<Extracted<f64>>")]
    pub gross_salary: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub basic_salary: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub hra_received: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub rent_paid: Option<Extracted<Decimal>>,
    pub is_metro: Option<Extracted<bool>>,
    pub age_bracket: Option<Extracted<String>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub section_80c: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub health_insurance: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub nps_contribution: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub home_loan_interest: Option<Extracted<Decimal>>,
    #[schemars(with = "Option<Extracted<f64>>")]
    pub savings_interest: Option<Extracted<Decimal>>,
}

impl ExtractedProfile {
    /// Prefill for the form. The evidence is dropped; a missing age bracket
    /// stays empty and must be supplied by the user.
    pub fn to_input(&self) -> ProfileInput {
        fn value<T: Clone>(field: &Option<Extracted<T>>) -> Option<T> {
            field.as_ref().map(|f| f.value.clone())
        }

        ProfileInput {
            gross_salary: value(&self.gross_salary),
            basic_salary: value(&self.basic_salary),
            hra_received: value(&self.hra_received),
            rent_paid: value(&self.rent_paid),
            is_metro: value(&self.is_metro),
            age_bracket: value(&self.age_bracket).unwrap_or_default(),
            section_80c: value(&self.section_80c),
            health_insurance: value(&self.health_insurance),
            nps_contribution: value(&self.nps_contribution),
            home_loan_interest: value(&self.home_loan_interest),
            savings_interest: value(&self.savings_interest),
        }
    }

    /// Fill the fields the user left blank from the document
    pub fn merge_into(&self, input: &ProfileInput) -> ProfileInput {
        let extracted = self.to_input();
        ProfileInput {
            gross_salary: input.gross_salary.or(extracted.gross_salary),
            basic_salary: input.basic_salary.or(extracted.basic_salary),
            hra_received: input.hra_received.or(extracted.hra_received),
            rent_paid: input.rent_paid.or(extracted.rent_paid),
            is_metro: input.is_metro.or(extracted.is_metro),
            age_bracket: if input.age_bracket.trim().is_empty() {
                extracted.age_bracket
            } else {
                input.age_bracket.clone()
            },
            section_80c: input.section_80c.or(extracted.section_80c),
            health_insurance: input.health_insurance.or(extracted.health_insurance),
            nps_contribution: input.nps_contribution.or(extracted.nps_contribution),
            home_loan_interest: input.home_loan_interest.or(extracted.home_loan_interest),
            savings_interest: input.savings_interest.or(extracted.savings_interest),
        }
    }
}

/// Reads a financial profile out of an uploaded document
pub trait DocumentExtractor {
    fn extract(
        &self,
        document: &Document,
        policy: &UploadPolicy,
    ) -> Result<ExtractedProfile, ExtractionError>;
}

/// Explains a finished comparison in free text. It only ever sees the
/// numbers by shared reference and cannot change them.
pub trait AdviceGenerator {
    fn advise(
        &self,
        profile: &FinancialProfile,
        comparison: &ComparisonResult,
    ) -> Result<String, AdviceError>;
}

/// Check the upload policy, then hand the document to the extractor
pub fn extract_profile<E: DocumentExtractor + ?Sized>(
    extractor: &E,
    document: &Document,
    policy: &UploadPolicy,
) -> Result<ExtractedProfile, ExtractionError> {
    policy.check(document)?;
    extractor.extract(document, policy)
}

/// A comparison plus optional advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub comparison: ComparisonResult,
    pub advice: Option<String>,
}

/// Compare both regimes, then ask for advice. Advice failures are logged
/// and leave `advice` empty; the comparison is always returned.
pub fn assess<A: AdviceGenerator + ?Sized>(profile: &FinancialProfile, advisor: &A) -> Assessment {
    let comparison = compare_regimes(profile);
    let advice = match advisor.advise(profile, &comparison) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            log::warn!("advice unavailable: {}", AdviceError::Empty);
            None
        }
        Err(e) => {
            log::warn!("advice unavailable: {e}");
            None
        }
    };
    Assessment { comparison, advice }
}
