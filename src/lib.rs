//! # quiz-console
//!
//! Terminal client for a quiz question-bank service: a timed quiz page for
//! test-takers and a question administration page.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quiz_console::{ClientConfig, HttpQuestionBank, Page, QuizController, QuizParams, QuizSession};
//!
//! # async fn example() -> Result<(), quiz_console::ClientError> {
//! let config = ClientConfig::new("http://127.0.0.1:5000", None, 15, "quiz.log".into())?;
//! let bank = Arc::new(HttpQuestionBank::new(&config)?);
//! let params = QuizParams {
//!     quiz_id: Some("3f2a".to_string()),
//!     total_questions: 10,
//!     timer_seconds: 600,
//! };
//! if let Some(session) = QuizSession::new(&params) {
//!     quiz_console::run(Page::Quiz(QuizController::new(bank, session))).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
mod app;
pub mod bank;
pub mod config;
mod error;
pub mod models;
pub mod protocol;
pub mod quiz;
pub mod telemetry;
pub mod terminal;

pub use admin::AdminController;
pub use app::{Action, Page, run};
pub use bank::{HttpQuestionBank, QuestionBank};
pub use config::ClientConfig;
pub use error::{BankError, ClientError};
pub use models::{BankQuestion, Difficulty, QuestionId, QuizQuestion, SubjectFilter};
pub use quiz::{QuizController, QuizParams, QuizSession};
