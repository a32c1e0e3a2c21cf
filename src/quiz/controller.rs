//! Quiz page controller: routes quiz actions into the session and the bank.

use std::sync::Arc;

use tracing::{error, warn};

use crate::bank::QuestionBank;
use crate::protocol::{SUBMIT_FAILED, SubmitRequest};

use super::session::{QuizPhase, QuizSession, SubmitOutcome};

const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    Load,
    Previous,
    Next,
    CursorUp,
    CursorDown,
    /// Record the option under the cursor.
    Choose,
    /// Record option `n` directly.
    Select(usize),
    Submit,
    Tick,
}

pub struct QuizController {
    bank: Arc<dyn QuestionBank>,
    session: QuizSession,
    cursor: usize,
}

impl QuizController {
    pub fn new(bank: Arc<dyn QuestionBank>, session: QuizSession) -> Self {
        Self {
            bank,
            session,
            cursor: 0,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Resolved location of the results page once submission succeeded.
    pub fn result_location(&self) -> Option<String> {
        match self.session.outcome()? {
            SubmitOutcome::Redirect(target) => Some(self.bank.location(target)),
            SubmitOutcome::Failed(_) => None,
        }
    }

    pub async fn dispatch(&mut self, action: QuizAction) {
        match action {
            QuizAction::Load => self.load().await,
            QuizAction::Previous => {
                self.session.previous();
                self.sync_cursor();
            }
            QuizAction::Next => {
                self.session.next();
                self.sync_cursor();
            }
            QuizAction::CursorUp => {
                self.cursor = (self.cursor + OPTION_COUNT - 1) % OPTION_COUNT;
            }
            QuizAction::CursorDown => {
                self.cursor = (self.cursor + 1) % OPTION_COUNT;
            }
            QuizAction::Choose => {
                self.session.select(self.cursor);
            }
            QuizAction::Select(option) => {
                if self.session.select(option) {
                    self.cursor = option;
                }
            }
            QuizAction::Submit => {
                if let Some(payload) = self.session.begin_submit() {
                    self.send(payload).await;
                }
            }
            QuizAction::Tick => {
                if let Some(payload) = self.session.tick() {
                    self.send(payload).await;
                }
            }
        }
    }

    async fn load(&mut self) {
        if self.session.phase() != QuizPhase::Loading {
            return;
        }
        match self.bank.fetch_quiz(self.session.quiz_id()).await {
            Ok(questions) => {
                self.session.activate(questions);
                self.sync_cursor();
            }
            Err(e) => {
                error!(quiz_id = self.session.quiz_id(), error = %e, "could not load quiz");
                self.session.fail_load();
            }
        }
    }

    async fn send(&mut self, payload: SubmitRequest) {
        let outcome = match self.bank.submit(&payload).await {
            Ok(response) => match response.redirect_target() {
                Ok(target) => SubmitOutcome::Redirect(target),
                Err(message) => SubmitOutcome::Failed(message),
            },
            Err(e) => {
                warn!(quiz_id = %payload.quiz_id, error = %e, "submit request failed");
                SubmitOutcome::Failed(SUBMIT_FAILED.to_string())
            }
        };
        self.session.finish(outcome);
    }

    fn sync_cursor(&mut self) {
        self.cursor = self.session.selected_option().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::fake::{Call, FakeBank, quiz_question};
    use crate::protocol::SubmitResponse;
    use crate::quiz::session::QuizParams;

    fn controller(bank: &Arc<FakeBank>, total: usize, timer: u64) -> QuizController {
        let session = QuizSession::new(&QuizParams {
            quiz_id: Some("quiz-1".to_string()),
            total_questions: total,
            timer_seconds: timer,
        })
        .unwrap();
        QuizController::new(bank.clone(), session)
    }

    fn bank_with(count: i64) -> Arc<FakeBank> {
        Arc::new(FakeBank::with_quiz(
            (1..=count)
                .map(|id| quiz_question(id, ["Paris", "London", "Rome", "Berlin"]))
                .collect(),
        ))
    }

    #[tokio::test]
    async fn test_load_activates_and_starts_clock() {
        let bank = bank_with(3);
        let mut quiz = controller(&bank, 3, 90);
        quiz.dispatch(QuizAction::Load).await;

        assert_eq!(quiz.session().phase(), QuizPhase::Active);
        assert!(quiz.session().countdown().is_running());
        assert_eq!(bank.calls(), vec![Call::FetchQuiz("quiz-1".to_string())]);
    }

    #[tokio::test]
    async fn test_failed_load_never_ticks_or_submits() {
        let bank = Arc::new(FakeBank::default());
        let mut quiz = controller(&bank, 3, 2);
        quiz.dispatch(QuizAction::Load).await;
        assert_eq!(quiz.session().phase(), QuizPhase::LoadFailed);

        for _ in 0..5 {
            quiz.dispatch(QuizAction::Tick).await;
        }
        quiz.dispatch(QuizAction::Submit).await;
        assert!(bank.submissions().is_empty());
        assert_eq!(quiz.session().countdown().remaining(), 2);
    }

    #[tokio::test]
    async fn test_empty_quiz_shows_placeholder() {
        let bank = Arc::new(FakeBank::with_quiz(Vec::new()));
        let mut quiz = controller(&bank, 3, 2);
        quiz.dispatch(QuizAction::Load).await;
        quiz.dispatch(QuizAction::Tick).await;
        quiz.dispatch(QuizAction::Tick).await;
        assert_eq!(quiz.session().phase(), QuizPhase::LoadFailed);
        assert!(bank.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_cursor_follows_recorded_selection() {
        let bank = bank_with(3);
        let mut quiz = controller(&bank, 3, 90);
        quiz.dispatch(QuizAction::Load).await;

        quiz.dispatch(QuizAction::CursorDown).await;
        quiz.dispatch(QuizAction::CursorDown).await;
        quiz.dispatch(QuizAction::Choose).await;
        quiz.dispatch(QuizAction::Next).await;
        assert_eq!(quiz.cursor(), 0);

        quiz.dispatch(QuizAction::Previous).await;
        assert_eq!(quiz.cursor(), 2);
        assert_eq!(quiz.session().selected_option(), Some(2));
    }

    #[tokio::test]
    async fn test_answering_two_of_five_sends_two_entries() {
        let bank = bank_with(5);
        let mut quiz = controller(&bank, 5, 90);
        quiz.dispatch(QuizAction::Load).await;

        quiz.dispatch(QuizAction::Select(1)).await;
        quiz.dispatch(QuizAction::Next).await;
        quiz.dispatch(QuizAction::Next).await;
        quiz.dispatch(QuizAction::Next).await;
        quiz.dispatch(QuizAction::Select(3)).await;
        quiz.dispatch(QuizAction::Submit).await;

        let sent = bank.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].answers.len(), 2);
        assert_eq!(sent[0].answers["1"], "London");
        assert_eq!(sent[0].answers["4"], "Berlin");
        assert_eq!(quiz.session().phase(), QuizPhase::Done);
        assert_eq!(quiz.result_location().as_deref(), Some("/result"));
    }

    #[tokio::test]
    async fn test_timer_and_click_in_same_tick_submit_once() {
        let bank = bank_with(2);
        let mut quiz = controller(&bank, 2, 1);
        quiz.dispatch(QuizAction::Load).await;

        quiz.dispatch(QuizAction::Tick).await;
        quiz.dispatch(QuizAction::Submit).await;
        quiz.dispatch(QuizAction::Tick).await;

        assert_eq!(bank.submissions().len(), 1);
        assert_eq!(quiz.session().phase(), QuizPhase::Done);
    }

    #[tokio::test]
    async fn test_rejected_submission_stays_done() {
        let bank = bank_with(2);
        bank.reply_submit(Some(SubmitResponse {
            ok: false,
            redirect: None,
            error: Some("Quiz not found or expired".to_string()),
        }));
        let mut quiz = controller(&bank, 2, 60);
        quiz.dispatch(QuizAction::Load).await;
        quiz.dispatch(QuizAction::Submit).await;
        quiz.dispatch(QuizAction::Submit).await;

        assert_eq!(quiz.session().phase(), QuizPhase::Done);
        assert_eq!(
            quiz.session().outcome(),
            Some(&SubmitOutcome::Failed("Quiz not found or expired".to_string()))
        );
        assert_eq!(bank.submissions().len(), 1);
        assert_eq!(quiz.result_location(), None);
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_message() {
        let bank = bank_with(1);
        bank.reply_submit(None);
        let mut quiz = controller(&bank, 1, 60);
        quiz.dispatch(QuizAction::Load).await;
        quiz.dispatch(QuizAction::Submit).await;

        assert_eq!(
            quiz.session().outcome(),
            Some(&SubmitOutcome::Failed(SUBMIT_FAILED.to_string()))
        );
    }
}
