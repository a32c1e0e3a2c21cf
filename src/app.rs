//! Page selection and the terminal event loop.
//!
//! Every input is turned into an [`Action`] addressed to one page and handled
//! to completion before the next one is read, so handlers never interleave.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Block;
use tracing::{debug, info};

use crate::admin::{self, AdminAction, AdminController};
use crate::error::ClientError;
use crate::quiz::{self, QuizAction, QuizController};
use crate::terminal::TerminalGuard;

const TICK_RATE: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub enum Page {
    Quiz(QuizController),
    Admin(AdminController),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quiz(QuizAction),
    Admin(AdminAction),
}

enum Command {
    Quit,
    Dispatch(Action),
}

impl Page {
    pub fn name(&self) -> &'static str {
        match self {
            Page::Quiz(_) => "quiz",
            Page::Admin(_) => "admin",
        }
    }

    pub async fn dispatch(&mut self, action: Action) {
        match (self, action) {
            (Page::Quiz(controller), Action::Quiz(action)) => controller.dispatch(action).await,
            (Page::Admin(controller), Action::Admin(action)) => controller.dispatch(action).await,
            (page, action) => debug!(page = page.name(), ?action, "action for another page ignored"),
        }
    }

    fn load_action(&self) -> Action {
        match self {
            Page::Quiz(_) => Action::Quiz(QuizAction::Load),
            Page::Admin(_) => Action::Admin(AdminAction::Reload),
        }
    }

    fn tick_action(&self) -> Option<Action> {
        match self {
            Page::Quiz(_) => Some(Action::Quiz(QuizAction::Tick)),
            Page::Admin(_) => None,
        }
    }

    fn map_key(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }
        match self {
            Page::Quiz(controller) => match quiz::ui::map_key(controller, key)? {
                quiz::ui::QuizKey::Quit => Some(Command::Quit),
                quiz::ui::QuizKey::Action(action) => Some(Command::Dispatch(Action::Quiz(action))),
            },
            Page::Admin(controller) => match admin::ui::map_key(controller, key)? {
                admin::ui::AdminKey::Quit => Some(Command::Quit),
                admin::ui::AdminKey::Action(action) => Some(Command::Dispatch(Action::Admin(action))),
            },
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().bg(Color::Reset), area);
        match self {
            Page::Quiz(controller) => quiz::ui::render(frame, area, controller),
            Page::Admin(controller) => admin::ui::render(frame, area, controller),
        }
    }
}

/// Take over the terminal and run `page` until the user quits.
pub async fn run(mut page: Page) -> Result<(), ClientError> {
    info!(page = page.name(), "page opened");
    let mut guard = TerminalGuard::enter()?;

    guard.terminal().draw(|frame| page.render(frame))?;
    page.dispatch(page.load_action()).await;
    let mut last_tick = Instant::now();

    loop {
        guard.terminal().draw(|frame| page.render(frame))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed()).min(POLL_INTERVAL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match page.map_key(key) {
                        Some(Command::Quit) => break,
                        Some(Command::Dispatch(action)) => page.dispatch(action).await,
                        None => {}
                    }
                }
            }
        }

        // One tick per elapsed second, even if a request held up the loop.
        while last_tick.elapsed() >= TICK_RATE {
            last_tick += TICK_RATE;
            if let Some(tick) = page.tick_action() {
                page.dispatch(tick).await;
            }
        }
    }

    info!(page = page.name(), "page closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bank::fake::{FakeBank, quiz_question};
    use crate::models::SubjectFilter;
    use crate::quiz::{QuizParams, QuizPhase, QuizSession};

    #[tokio::test]
    async fn test_actions_reach_only_their_page() {
        let bank = Arc::new(FakeBank::with_quiz(vec![quiz_question(1, ["a", "b", "c", "d"])]));
        let session = QuizSession::new(&QuizParams {
            quiz_id: Some("quiz-1".to_string()),
            total_questions: 1,
            timer_seconds: 60,
        })
        .unwrap();
        let mut page = Page::Quiz(QuizController::new(bank.clone(), session));

        page.dispatch(Action::Admin(AdminAction::Reload)).await;
        assert!(bank.calls().is_empty());

        page.dispatch(page.load_action()).await;
        let Page::Quiz(controller) = &page else {
            panic!("expected quiz page");
        };
        assert_eq!(controller.session().phase(), QuizPhase::Active);
    }

    #[test]
    fn test_only_the_quiz_ticks() {
        let admin = Page::Admin(AdminController::new(Arc::new(FakeBank::default()), SubjectFilter::All));
        assert_eq!(admin.tick_action(), None);
        assert_eq!(admin.load_action(), Action::Admin(AdminAction::Reload));
    }
}
