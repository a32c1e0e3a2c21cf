//! Timed multiple-choice quiz page.

mod controller;
mod session;
pub mod ui;

pub use controller::{QuizAction, QuizController};
pub use session::{Countdown, QuizParams, QuizPhase, QuizSession, SubmitOutcome};
