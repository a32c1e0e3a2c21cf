//! Quiz screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap};

use super::controller::{QuizAction, QuizController};
use super::session::{QuizPhase, QuizSession, SubmitOutcome};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// What a key press means on the quiz screen.
pub enum QuizKey {
    Quit,
    Action(QuizAction),
}

pub fn map_key(controller: &QuizController, key: KeyEvent) -> Option<QuizKey> {
    let session = controller.session();
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return Some(QuizKey::Quit);
    }
    if session.phase() != QuizPhase::Active {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(QuizKey::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Left | KeyCode::Char('p') if session.can_go_previous() => QuizAction::Previous,
        KeyCode::Right | KeyCode::Char('n') if !session.is_last() => QuizAction::Next,
        KeyCode::Char('s') if session.is_last() => QuizAction::Submit,
        KeyCode::Up | KeyCode::Char('k') => QuizAction::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => QuizAction::CursorDown,
        KeyCode::Enter | KeyCode::Char(' ') => QuizAction::Choose,
        KeyCode::Char(c @ '1'..='4') => QuizAction::Select(c as usize - '1' as usize),
        KeyCode::Char(c @ 'a'..='d') => QuizAction::Select(c as usize - 'a' as usize),
        _ => return None,
    };
    Some(QuizKey::Action(action))
}

pub fn render(frame: &mut Frame, area: Rect, controller: &QuizController) {
    let session = controller.session();
    match session.phase() {
        QuizPhase::Loading => render_notice(frame, area, "Loading questions...", Color::Yellow),
        QuizPhase::LoadFailed => render_notice(
            frame,
            area,
            "Unable to load quiz questions. Please go back and try again.",
            Color::Red,
        ),
        QuizPhase::Done => render_done(frame, area, controller),
        QuizPhase::Active | QuizPhase::Submitting => render_question(frame, area, controller),
    }
}

fn render_question(frame: &mut Frame, area: Rect, controller: &QuizController) {
    let session = controller.session();
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Progress + clock
        Constraint::Length(1), // Gauge
        Constraint::Length(7), // Question text
        Constraint::Min(6),    // Options
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], session);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(session.progress_ratio())
        .label(format!("{:.0}%", session.progress_ratio() * 100.0));
    frame.render_widget(gauge, chunks[1]);

    let text = Paragraph::new(question.question.as_str())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(text, chunks[2]);

    render_options(
        frame,
        chunks[3],
        &question.options,
        session.selected_option(),
        controller.cursor(),
    );
    render_controls(frame, chunks[4], session);
}

fn render_header(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(area);

    let progress = Paragraph::new(session.progress_label()).style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(progress, halves[0]);

    let countdown = session.countdown();
    let clock_style = if countdown.is_urgent() {
        Style::default().fg(Color::Red).bold().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Green)
    };
    let clock = Paragraph::new(countdown.label())
        .alignment(Alignment::Right)
        .style(clock_style);
    frame.render_widget(clock, halves[1]);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String; 4],
    selected: Option<usize>,
    cursor: usize,
) {
    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let pointer = if i == cursor { "> " } else { "  " };
            let mark = if selected == Some(i) { "(*) " } else { "( ) " };
            let style = match (selected == Some(i), i == cursor) {
                (true, _) => Style::default().fg(Color::Green).bold(),
                (false, true) => Style::default().fg(Color::Yellow).bold(),
                (false, false) => Style::default().fg(Color::White),
            };

            Line::from(vec![
                Span::styled(pointer, style),
                Span::styled(mark, style),
                Span::styled(format!("{}) ", OPTION_LABELS[i]), style),
                Span::styled(opt.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, session: &QuizSession) {
    if session.phase() == QuizPhase::Submitting {
        let widget = Paragraph::new("Submitting...")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, area);
        return;
    }

    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    let previous_style = if session.can_go_previous() { enabled } else { disabled };
    let forward = if session.is_last() {
        Span::styled("[s] Submit", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("[→] Next", enabled)
    };

    let line = Line::from(vec![
        Span::styled("[←] Previous", previous_style),
        Span::styled("  ·  ", disabled),
        forward,
        Span::styled("  ·  j/k select, Enter choose, 1-4 answer, q quit", disabled),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_done(frame: &mut Frame, area: Rect, controller: &QuizController) {
    let session = controller.session();
    let heading = match session.outcome() {
        Some(SubmitOutcome::Failed(_)) => Span::styled("SUBMISSION FAILED", Style::default().fg(Color::Red).bold()),
        _ => Span::styled("QUIZ SUBMITTED", Style::default().fg(Color::Cyan).bold()),
    };
    let mut content = vec![Line::from(""), Line::from(heading), Line::from("")];

    match (session.outcome(), controller.result_location()) {
        (Some(SubmitOutcome::Redirect(_)), Some(location)) => {
            content.push(Line::from(Span::styled(
                format!("{} of {} questions answered", session.answered_count(), session.len()),
                Style::default().fg(Color::White),
            )));
            content.push(Line::from(Span::styled(
                format!("Results: {}", location),
                Style::default().fg(Color::Green).bold(),
            )));
        }
        (Some(SubmitOutcome::Failed(message)), _) => {
            content.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).bold(),
            )));
        }
        _ => {}
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "Press [Q] to exit",
        Style::default().fg(Color::DarkGray),
    )));

    let chunks = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Length(content.len() as u16),
        Constraint::Percentage(35),
    ])
    .split(area);
    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, chunks[1]);
}

fn render_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(3),
        Constraint::Percentage(40),
    ])
    .split(area);

    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color).bold());
    frame.render_widget(widget, chunks[1]);
}
