//! Quiz session state machine.
//!
//! `Loading -> Active -> Submitting -> Done`, with `Loading -> LoadFailed`
//! when the question set cannot be used. A session leaves `Active` at most
//! once, whichever of the clock or the user gets there first.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::models::{QuestionId, QuizQuestion};
use crate::protocol::SubmitRequest;

/// Remaining seconds below which the clock is shown as urgent.
const URGENT_BELOW_SECS: i64 = 30;

/// Values the page supplies at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizParams {
    pub quiz_id: Option<String>,
    pub total_questions: usize,
    pub timer_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Active,
    Submitting,
    Done,
    LoadFailed,
}

/// How the single submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; the results live at this path.
    Redirect(String),
    /// Rejected or never delivered; the message to show.
    Failed(String),
}

/// Per-second countdown with a sticky urgency flag.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: i64,
    running: bool,
    urgent: bool,
}

impl Countdown {
    pub fn new(seconds: u64) -> Self {
        Self {
            remaining: i64::try_from(seconds).unwrap_or(i64::MAX),
            running: false,
            urgent: false,
        }
    }

    fn start(&mut self) {
        self.running = true;
        self.refresh_urgency();
    }

    fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one second. Returns true exactly once, on expiry.
    fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= 1;
        self.refresh_urgency();
        if self.remaining <= 0 {
            self.running = false;
            return true;
        }
        false
    }

    fn refresh_urgency(&mut self) {
        if self.remaining < URGENT_BELOW_SECS {
            self.urgent = true;
        }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn label(&self) -> String {
        format_clock(u64::try_from(self.remaining).unwrap_or(0))
    }
}

/// `M:SS`, or `H:MM:SS` once there is at least an hour.
fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

pub struct QuizSession {
    quiz_id: String,
    expected_total: usize,
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    index: usize,
    answers: BTreeMap<QuestionId, String>,
    countdown: Countdown,
    outcome: Option<SubmitOutcome>,
}

impl QuizSession {
    /// `None` when there is nothing to run: no quiz id or no questions.
    pub fn new(params: &QuizParams) -> Option<Self> {
        let quiz_id = params.quiz_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        if params.total_questions == 0 {
            return None;
        }

        Some(Self {
            quiz_id: quiz_id.to_string(),
            expected_total: params.total_questions,
            phase: QuizPhase::Loading,
            questions: Vec::new(),
            index: 0,
            answers: BTreeMap::new(),
            countdown: Countdown::new(params.timer_seconds),
            outcome: None,
        })
    }

    /// Install the fetched question set and start the clock.
    ///
    /// An empty set is a load failure.
    pub fn activate(&mut self, questions: Vec<QuizQuestion>) {
        if self.phase != QuizPhase::Loading {
            return;
        }
        if questions.is_empty() {
            warn!(quiz_id = %self.quiz_id, "quiz has no questions");
            self.phase = QuizPhase::LoadFailed;
            return;
        }
        if questions.len() != self.expected_total {
            debug!(
                quiz_id = %self.quiz_id,
                expected = self.expected_total,
                received = questions.len(),
                "question count differs from page total"
            );
        }

        self.questions = questions;
        self.index = 0;
        self.phase = QuizPhase::Active;
        self.countdown.start();
        info!(quiz_id = %self.quiz_id, count = self.questions.len(), "quiz started");
    }

    pub fn fail_load(&mut self) {
        if self.phase == QuizPhase::Loading {
            self.phase = QuizPhase::LoadFailed;
        }
    }

    pub fn previous(&mut self) {
        if self.phase == QuizPhase::Active && self.index > 0 {
            self.index -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.phase == QuizPhase::Active && self.index + 1 < self.questions.len() {
            self.index += 1;
        }
    }

    /// Record option `option` for the current question, replacing any
    /// earlier choice for it.
    pub fn select(&mut self, option: usize) -> bool {
        if self.phase != QuizPhase::Active {
            return false;
        }
        let Some(question) = self.questions.get(self.index) else {
            return false;
        };
        let Some(text) = question.options.get(option) else {
            return false;
        };
        debug!(question_id = %question.id, option, "answer recorded");
        self.answers.insert(question.id.clone(), text.clone());
        true
    }

    /// One elapsed second. Yields the payload when the clock runs out.
    pub fn tick(&mut self) -> Option<SubmitRequest> {
        if self.phase != QuizPhase::Active {
            return None;
        }
        if self.countdown.tick() {
            info!(quiz_id = %self.quiz_id, "time is up");
            return self.begin_submit();
        }
        None
    }

    /// Leave `Active` for `Submitting`. Only the first call yields a payload.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.phase != QuizPhase::Active {
            return None;
        }
        self.phase = QuizPhase::Submitting;
        self.countdown.stop();
        Some(self.payload())
    }

    pub fn finish(&mut self, outcome: SubmitOutcome) {
        if self.phase != QuizPhase::Submitting {
            return;
        }
        match &outcome {
            SubmitOutcome::Redirect(target) => info!(quiz_id = %self.quiz_id, %target, "quiz submitted"),
            SubmitOutcome::Failed(message) => warn!(quiz_id = %self.quiz_id, %message, "submission failed"),
        }
        self.phase = QuizPhase::Done;
        self.outcome = Some(outcome);
    }

    fn payload(&self) -> SubmitRequest {
        SubmitRequest {
            quiz_id: self.quiz_id.clone(),
            answers: self
                .answers
                .iter()
                .map(|(id, text)| (id.to_string(), text.clone()))
                .collect(),
        }
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    /// Option index recorded for the current question.
    pub fn selected_option(&self) -> Option<usize> {
        let question = self.current_question()?;
        let text = self.answers.get(&question.id)?;
        question.option_index(text)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn progress_label(&self) -> String {
        format!("Question {} of {}", self.index + 1, self.questions.len())
    }

    /// Share of questions before the current one.
    pub fn progress_ratio(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.index as f64 / self.questions.len() as f64
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::fake::quiz_question;

    fn params(total: usize, timer: u64) -> QuizParams {
        QuizParams {
            quiz_id: Some("quiz-1".to_string()),
            total_questions: total,
            timer_seconds: timer,
        }
    }

    fn active_session(count: usize, timer: u64) -> QuizSession {
        let mut session = QuizSession::new(&params(count, timer)).unwrap();
        let questions = (0..count as i64)
            .map(|id| quiz_question(id + 1, ["A", "B", "C", "D"]))
            .collect();
        session.activate(questions);
        session
    }

    #[test]
    fn test_no_op_without_id_or_questions() {
        let mut missing = params(5, 60);
        missing.quiz_id = None;
        assert!(QuizSession::new(&missing).is_none());

        let mut blank = params(5, 60);
        blank.quiz_id = Some("  ".to_string());
        assert!(QuizSession::new(&blank).is_none());

        assert!(QuizSession::new(&params(0, 60)).is_none());
    }

    #[test]
    fn test_empty_question_set_fails_load() {
        let mut session = QuizSession::new(&params(3, 60)).unwrap();
        session.activate(Vec::new());
        assert_eq!(session.phase(), QuizPhase::LoadFailed);
        assert!(!session.countdown().is_running());
        assert_eq!(session.tick(), None);
        assert_eq!(session.begin_submit(), None);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut session = active_session(3, 60);
        session.previous();
        assert_eq!(session.index(), 0);
        assert!(!session.can_go_previous());

        for _ in 0..10 {
            session.next();
        }
        assert_eq!(session.index(), 2);
        assert!(session.is_last());

        session.previous();
        session.previous();
        session.previous();
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_selection_is_restored_and_replaced() {
        let mut session = active_session(3, 60);
        assert!(session.select(1));
        session.next();
        assert!(session.select(3));
        session.previous();
        assert_eq!(session.selected_option(), Some(1));

        session.select(2);
        assert_eq!(session.selected_option(), Some(2));
        session.next();
        assert_eq!(session.selected_option(), Some(3));
        session.next();
        assert_eq!(session.selected_option(), None);
        assert_eq!(session.answered_count(), 2);
        assert!(!session.select(4));
    }

    #[test]
    fn test_payload_only_has_answered_questions() {
        let mut session = active_session(5, 60);
        session.select(0);
        session.next();
        session.next();
        session.select(3);

        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.quiz_id, "quiz-1");
        assert_eq!(payload.answers.len(), 2);
        assert_eq!(payload.answers.get("1").map(String::as_str), Some("A"));
        assert_eq!(payload.answers.get("3").map(String::as_str), Some("D"));
    }

    #[test]
    fn test_submit_happens_once() {
        let mut session = active_session(2, 2);
        assert!(session.begin_submit().is_some());
        assert_eq!(session.phase(), QuizPhase::Submitting);
        assert_eq!(session.begin_submit(), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), None);

        session.finish(SubmitOutcome::Failed("nope".to_string()));
        assert_eq!(session.phase(), QuizPhase::Done);
        assert_eq!(session.begin_submit(), None);
        session.finish(SubmitOutcome::Redirect("/result".to_string()));
        assert_eq!(session.outcome(), Some(&SubmitOutcome::Failed("nope".to_string())));
    }

    #[test]
    fn test_timer_expiry_submits_once() {
        let mut session = active_session(2, 3);
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), None);
        assert!(session.tick().is_some());
        assert_eq!(session.phase(), QuizPhase::Submitting);
        assert_eq!(session.tick(), None);
        assert_eq!(session.begin_submit(), None);
    }

    #[test]
    fn test_no_interaction_after_submit() {
        let mut session = active_session(3, 60);
        session.begin_submit();
        session.next();
        assert_eq!(session.index(), 0);
        assert!(!session.select(0));
    }

    #[test]
    fn test_progress() {
        let mut session = active_session(5, 60);
        assert_eq!(session.progress_label(), "Question 1 of 5");
        assert_eq!(session.progress_ratio(), 0.0);
        for _ in 0..4 {
            session.next();
        }
        assert_eq!(session.progress_label(), "Question 5 of 5");
        assert!((session.progress_ratio() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(format_clock(45), "0:45");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(3661), "1:01:01");
    }

    #[test]
    fn test_urgency_is_sticky() {
        let mut countdown = Countdown::new(31);
        countdown.start();
        assert!(!countdown.is_urgent());
        countdown.tick();
        assert!(!countdown.is_urgent());
        countdown.tick();
        assert_eq!(countdown.remaining(), 29);
        assert!(countdown.is_urgent());

        countdown.remaining = 300;
        countdown.tick();
        assert!(countdown.is_urgent());
        assert_eq!(countdown.label(), "4:59");
    }

    #[test]
    fn test_short_timer_is_urgent_from_start() {
        let session = active_session(1, 20);
        assert!(session.countdown().is_urgent());
        assert_eq!(session.countdown().label(), "0:20");
    }
}
