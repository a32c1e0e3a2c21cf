//! The remote question-bank service, seen from the client.

mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::BankError;
use crate::models::{BankQuestion, QuestionId, QuizQuestion, SubjectFilter};
use crate::protocol::{
    MutationResponse, QuestionPayload, QuestionUpdate, SubmitRequest, SubmitResponse,
    UploadResponse,
};

pub use http::HttpQuestionBank;

/// One method per service endpoint.
///
/// Mutations return the parsed body even when the service rejects them;
/// `Err` is reserved for transport failures and unreadable bodies.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, BankError>;

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BankError>;

    async fn list_questions(&self, filter: &SubjectFilter) -> Result<Vec<BankQuestion>, BankError>;

    async fn add_question(&self, question: &QuestionPayload) -> Result<MutationResponse, BankError>;

    async fn update_question(&self, update: &QuestionUpdate) -> Result<MutationResponse, BankError>;

    async fn delete_question(&self, id: &QuestionId) -> Result<MutationResponse, BankError>;

    async fn upload_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadResponse, BankError>;

    /// The CSV header and sample rows the importer accepts.
    async fn csv_template(&self) -> Result<Vec<u8>, BankError>;

    /// Absolute location of a service path, for display after a redirect.
    fn location(&self, path: &str) -> String {
        path.to_string()
    }
}
