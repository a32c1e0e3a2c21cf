//! Request and response bodies exchanged with the question-bank service.
//!
//! All bodies are JSON. Response types are lenient: the service reports
//! failures as `{"error": "..."}` bodies, often without an `ok` field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{BankQuestion, Difficulty, QuestionId, QuizQuestion};

/// Fallback shown when a submission fails without a usable message.
pub const SUBMIT_FAILED: &str = "Could not submit the quiz. Please contact the administrator.";

/// Fallback shown when a mutation fails without a usable message.
pub const REQUEST_FAILED: &str = "Request failed. Please try again.";

/// Number of per-row import errors shown in the import summary.
pub const IMPORT_ERROR_PREVIEW: usize = 3;

/// `GET /api/quiz/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

/// `POST /submit`
///
/// Only answered questions appear in `answers`, keyed by the text form of
/// the question id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitRequest {
    pub quiz_id: String,
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SubmitResponse {
    /// The redirect target of a successful submission, or the message to
    /// show the user.
    pub fn redirect_target(self) -> Result<String, String> {
        match (self.ok, self.redirect) {
            (true, Some(target)) if !target.trim().is_empty() => Ok(target),
            _ => Err(non_empty(self.error).unwrap_or_else(|| SUBMIT_FAILED.to_string())),
        }
    }
}

/// `GET /api/admin/questions?subject=...`
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<BankQuestion>,
}

/// Body of `POST /admin/add_question`, and the editable part of an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionPayload {
    pub subject: String,
    pub question: String,
    pub options: [String; 4],
    pub answer: String,
    pub difficulty: Difficulty,
    pub explanation: String,
}

/// `POST /admin/update_question`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionUpdate {
    pub id: QuestionId,
    #[serde(flatten)]
    pub payload: QuestionPayload,
}

/// `POST /admin/delete_question`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteRequest {
    pub id: QuestionId,
}

/// Response to add, update and delete.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn accepted() -> Self {
        Self { ok: true, error: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }

    /// `None` when the service accepted the change, otherwise the message
    /// to show.
    pub fn rejection(self) -> Option<String> {
        if self.ok {
            None
        } else {
            Some(non_empty(self.error).unwrap_or_else(|| REQUEST_FAILED.to_string()))
        }
    }
}

/// `POST /admin/upload_csv`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub added: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn into_report(self) -> Result<ImportReport, String> {
        if !self.ok {
            return Err(non_empty(self.error).unwrap_or_else(|| REQUEST_FAILED.to_string()));
        }
        Ok(ImportReport {
            added: self.added,
            skipped: self.skipped,
            errors: self.errors,
        })
    }
}

/// Outcome of a bulk CSV import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    /// One-line summary with at most the first few row errors.
    pub fn summary(&self) -> String {
        let mut text = format!("Added {}, skipped {}", self.added, self.skipped);
        if !self.errors.is_empty() {
            let preview: Vec<&str> = self
                .errors
                .iter()
                .take(IMPORT_ERROR_PREVIEW)
                .map(String::as_str)
                .collect();
            text.push_str(". Errors: ");
            text.push_str(&preview.join("; "));
            if self.errors.len() > IMPORT_ERROR_PREVIEW {
                text.push_str(&format!(" (+{} more)", self.errors.len() - IMPORT_ERROR_PREVIEW));
            }
        }
        text
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
