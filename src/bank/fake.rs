//! In-memory question bank for controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BankError;
use crate::models::{BankQuestion, Difficulty, QuestionId, QuizQuestion, SubjectFilter};
use crate::protocol::{
    MutationResponse, QuestionPayload, QuestionUpdate, SubmitRequest, SubmitResponse,
    UploadResponse,
};

use super::QuestionBank;

/// Every request the fake has seen, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchQuiz(String),
    Submit(SubmitRequest),
    List(SubjectFilter),
    Add(QuestionPayload),
    Update(QuestionUpdate),
    Delete(QuestionId),
    Upload(String, Vec<u8>),
    Template,
}

/// Scripted replies; `None` means the request fails in transport.
#[derive(Default)]
pub struct FakeBank {
    pub quiz: Mutex<Option<Vec<QuizQuestion>>>,
    pub rows: Mutex<Vec<BankQuestion>>,
    pub submit_replies: Mutex<VecDeque<Option<SubmitResponse>>>,
    pub mutation_replies: Mutex<VecDeque<Option<MutationResponse>>>,
    pub upload_reply: Mutex<Option<UploadResponse>>,
    pub list_fails: Mutex<bool>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeBank {
    pub fn with_quiz(questions: Vec<QuizQuestion>) -> Self {
        let bank = Self::default();
        *bank.quiz.lock().unwrap() = Some(questions);
        bank
    }

    pub fn with_rows(rows: Vec<BankQuestion>) -> Self {
        let bank = Self::default();
        *bank.rows.lock().unwrap() = rows;
        bank
    }

    pub fn reply_submit(&self, reply: Option<SubmitResponse>) {
        self.submit_replies.lock().unwrap().push_back(reply);
    }

    pub fn reply_mutation(&self, reply: Option<MutationResponse>) {
        self.mutation_replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<SubmitRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Submit(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_mutation(&self) -> Result<MutationResponse, BankError> {
        match self.mutation_replies.lock().unwrap().pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) => Err(transport_failure()),
            None => Ok(MutationResponse::accepted()),
        }
    }
}

fn transport_failure() -> BankError {
    BankError::Status(reqwest::StatusCode::BAD_GATEWAY)
}

pub fn quiz_question(id: i64, options: [&str; 4]) -> QuizQuestion {
    QuizQuestion {
        id: QuestionId::Number(id),
        subject: Some("Physics".to_string()),
        question: format!("Question {}?", id),
        options: options.map(String::from),
    }
}

pub fn bank_question(id: i64, subject: &str, options: [&str; 4], answer: &str) -> BankQuestion {
    BankQuestion {
        id: QuestionId::Number(id),
        subject: subject.to_string(),
        question: format!("Question {}?", id),
        options: options.map(String::from),
        answer: answer.to_string(),
        difficulty: Difficulty::Medium,
        explanation: None,
    }
}

#[async_trait]
impl QuestionBank for FakeBank {
    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, BankError> {
        self.record(Call::FetchQuiz(quiz_id.to_string()));
        self.quiz.lock().unwrap().clone().ok_or_else(transport_failure)
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BankError> {
        self.record(Call::Submit(request.clone()));
        match self.submit_replies.lock().unwrap().pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) => Err(transport_failure()),
            None => Ok(SubmitResponse {
                ok: true,
                redirect: Some("/result".to_string()),
                error: None,
            }),
        }
    }

    async fn list_questions(&self, filter: &SubjectFilter) -> Result<Vec<BankQuestion>, BankError> {
        self.record(Call::List(filter.clone()));
        if *self.list_fails.lock().unwrap() {
            return Err(transport_failure());
        }
        let rows = self.rows.lock().unwrap().clone();
        Ok(match filter {
            SubjectFilter::All => rows,
            SubjectFilter::Subject(name) => rows.into_iter().filter(|q| &q.subject == name).collect(),
        })
    }

    async fn add_question(&self, question: &QuestionPayload) -> Result<MutationResponse, BankError> {
        self.record(Call::Add(question.clone()));
        self.next_mutation()
    }

    async fn update_question(&self, update: &QuestionUpdate) -> Result<MutationResponse, BankError> {
        self.record(Call::Update(update.clone()));
        self.next_mutation()
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<MutationResponse, BankError> {
        self.record(Call::Delete(id.clone()));
        self.next_mutation()
    }

    async fn upload_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadResponse, BankError> {
        self.record(Call::Upload(file_name.to_string(), contents));
        self.upload_reply.lock().unwrap().clone().ok_or_else(transport_failure)
    }

    async fn csv_template(&self) -> Result<Vec<u8>, BankError> {
        self.record(Call::Template);
        Ok(b"subject,question,optA,optB,optC,optD,answer,difficulty,explanation\n".to_vec())
    }
}
