//! HTTP implementation of [`QuestionBank`] over reqwest.

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{BankError, ClientError};
use crate::models::{BankQuestion, QuestionId, QuizQuestion, SubjectFilter};
use crate::protocol::{
    DeleteRequest, MutationResponse, QuestionListResponse, QuestionPayload, QuestionUpdate,
    QuizResponse, SubmitRequest, SubmitResponse, UploadResponse,
};

use super::QuestionBank;

pub struct HttpQuestionBank {
    http: Client,
    base_url: Url,
}

impl HttpQuestionBank {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ClientError::Config(format!("session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(BankError::from)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Body of a response that must carry a success status.
async fn read_success<T: DeserializeOwned>(response: Response) -> Result<T, BankError> {
    let status = response.status();
    if !status.is_success() {
        warn!(%status, url = %response.url(), "question bank returned an error status");
        return Err(BankError::Status(status));
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Body of a response whose error statuses still carry a JSON verdict.
async fn read_verdict<T: DeserializeOwned>(response: Response) -> Result<T, BankError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    match serde_json::from_slice(&bytes) {
        Ok(body) => Ok(body),
        Err(_) if !status.is_success() => Err(BankError::Status(status)),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl QuestionBank for HttpQuestionBank {
    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, BankError> {
        let response = self.http.get(self.url(&["api", "quiz", quiz_id])).send().await?;
        let body: QuizResponse = read_success(response).await?;
        debug!(quiz_id, count = body.questions.len(), "fetched quiz questions");
        Ok(body.questions)
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BankError> {
        let response = self.http.post(self.url(&["submit"])).json(request).send().await?;
        read_verdict(response).await
    }

    async fn list_questions(&self, filter: &SubjectFilter) -> Result<Vec<BankQuestion>, BankError> {
        let response = self
            .http
            .get(self.url(&["api", "admin", "questions"]))
            .query(&[("subject", filter.query_value())])
            .send()
            .await?;
        let body: QuestionListResponse = read_success(response).await?;
        debug!(subject = filter.query_value(), count = body.questions.len(), "listed questions");
        Ok(body.questions)
    }

    async fn add_question(&self, question: &QuestionPayload) -> Result<MutationResponse, BankError> {
        let response = self
            .http
            .post(self.url(&["admin", "add_question"]))
            .json(question)
            .send()
            .await?;
        read_verdict(response).await
    }

    async fn update_question(&self, update: &QuestionUpdate) -> Result<MutationResponse, BankError> {
        let response = self
            .http
            .post(self.url(&["admin", "update_question"]))
            .json(update)
            .send()
            .await?;
        read_verdict(response).await
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<MutationResponse, BankError> {
        let response = self
            .http
            .post(self.url(&["admin", "delete_question"]))
            .json(&DeleteRequest { id: id.clone() })
            .send()
            .await?;
        read_verdict(response).await
    }

    async fn upload_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadResponse, BankError> {
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.url(&["admin", "upload_csv"]))
            .multipart(form)
            .send()
            .await?;
        read_verdict(response).await
    }

    async fn csv_template(&self) -> Result<Vec<u8>, BankError> {
        let response = self.http.get(self.url(&["admin", "csv_template"])).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BankError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    fn location(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| path.to_string())
    }
}
