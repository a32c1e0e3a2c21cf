//! Admin screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, TableState, Tabs};

use crate::models::{SUBJECTS, SubjectFilter};

use super::controller::{AdminAction, AdminController};
use super::form::{FormEditor, FormField, FormInput};
use super::table::{AdminMode, AdminTable, Notice};

pub enum AdminKey {
    Quit,
    Action(AdminAction),
}

pub fn map_key(controller: &AdminController, key: KeyEvent) -> Option<AdminKey> {
    let action = match &controller.table().mode {
        AdminMode::Browse => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AdminKey::Quit),
            KeyCode::Up | KeyCode::Char('k') => AdminAction::MoveCursor(-1),
            KeyCode::Down | KeyCode::Char('j') => AdminAction::MoveCursor(1),
            KeyCode::PageUp => AdminAction::MoveCursor(-10),
            KeyCode::PageDown => AdminAction::MoveCursor(10),
            KeyCode::Left => AdminAction::Filter { forward: false },
            KeyCode::Right => AdminAction::Filter { forward: true },
            KeyCode::Char('r') => AdminAction::Reload,
            KeyCode::Char('e') | KeyCode::Enter => AdminAction::Edit,
            KeyCode::Char('a') => AdminAction::Add,
            KeyCode::Char('d') | KeyCode::Delete => AdminAction::Delete,
            KeyCode::Char('i') => AdminAction::Import,
            KeyCode::Char('t') => AdminAction::DownloadTemplate,
            _ => return None,
        },
        AdminMode::Editing(_) | AdminMode::Adding(_) => match key.code {
            KeyCode::Esc => AdminAction::Cancel,
            KeyCode::Enter => AdminAction::Save,
            KeyCode::Tab | KeyCode::Down => AdminAction::Input(FormInput::NextField),
            KeyCode::BackTab | KeyCode::Up => AdminAction::Input(FormInput::PrevField),
            KeyCode::Left => AdminAction::Input(FormInput::Cycle { forward: false }),
            KeyCode::Right => AdminAction::Input(FormInput::Cycle { forward: true }),
            KeyCode::Backspace => AdminAction::Input(FormInput::Backspace),
            KeyCode::Char(c) => AdminAction::Input(FormInput::Char(c)),
            _ => return None,
        },
        AdminMode::ConfirmDelete(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => AdminAction::ConfirmDelete,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => AdminAction::Cancel,
            _ => return None,
        },
        AdminMode::Importing(_) => match key.code {
            KeyCode::Esc => AdminAction::Cancel,
            KeyCode::Enter => AdminAction::Save,
            KeyCode::Backspace => AdminAction::Input(FormInput::Backspace),
            KeyCode::Char(c) => AdminAction::Input(FormInput::Char(c)),
            _ => return None,
        },
    };
    Some(AdminKey::Action(action))
}

pub fn render(frame: &mut Frame, area: Rect, controller: &AdminController) {
    let table = controller.table();
    let panel_height = match &table.mode {
        AdminMode::Editing(_) | AdminMode::Adding(_) => FormField::ORDER.len() as u16 + 2,
        AdminMode::ConfirmDelete(_) | AdminMode::Importing(_) => 3,
        AdminMode::Browse => 0,
    };

    let chunks = Layout::vertical([
        Constraint::Length(3),            // Filter tabs
        Constraint::Min(5),               // Questions
        Constraint::Length(panel_height), // Form or prompt
        Constraint::Length(1),            // Notice
        Constraint::Length(1),            // Controls
    ])
    .split(area);

    render_filter(frame, chunks[0], &table.filter);
    render_rows(frame, chunks[1], table);

    match &table.mode {
        AdminMode::Editing(edit) => {
            render_form(frame, chunks[2], &edit.editor, &format!(" Edit question {} ", edit.id))
        }
        AdminMode::Adding(editor) => render_form(frame, chunks[2], editor, " Add question "),
        AdminMode::ConfirmDelete(id) => render_prompt(
            frame,
            chunks[2],
            " Delete ",
            &format!("Delete question {}? [y] yes  [n] no", id),
        ),
        AdminMode::Importing(path) => {
            render_prompt(frame, chunks[2], " Import CSV file ", &format!("{}_", path))
        }
        AdminMode::Browse => {}
    }

    render_notice(frame, chunks[3], table.notice.as_ref());
    render_controls(frame, chunks[4], &table.mode);
}

fn render_filter(frame: &mut Frame, area: Rect, filter: &SubjectFilter) {
    let mut titles = vec![Line::from("All")];
    titles.extend(SUBJECTS.iter().map(|s| Line::from(*s)));
    let selected = match filter {
        SubjectFilter::All => 0,
        SubjectFilter::Subject(name) => SUBJECTS.iter().position(|s| s == name).map(|i| i + 1).unwrap_or(0),
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Question bank ")
                .title_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(tabs, area);
}

fn render_rows(frame: &mut Frame, area: Rect, table: &AdminTable) {
    let editing = table.editing_id();
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|q| {
            let style = if editing == Some(&q.id) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(q.id.to_string()),
                Cell::from(q.subject.clone()),
                Cell::from(q.question.clone()),
                Cell::from(q.options_cell()),
                Cell::from(q.answer.clone()),
                Cell::from(q.difficulty.to_string()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["ID", "Subject", "Question", "Options", "Answer", "Difficulty"])
        .style(Style::default().fg(Color::Cyan).bold());

    let widget = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(20),
            Constraint::Fill(3),
            Constraint::Fill(3),
            Constraint::Fill(1),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ")
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} questions ", table.rows.len()))
            .title_style(Style::default().fg(Color::Cyan)),
    );

    let mut state = TableState::default();
    if !table.rows.is_empty() {
        state.select(Some(table.cursor));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_form(frame: &mut Frame, area: Rect, editor: &FormEditor, title: &str) {
    let lines: Vec<Line> = FormField::ORDER
        .iter()
        .map(|field| {
            let focused = *field == editor.focus;
            let value = editor.form.value(*field);
            let shown = match field {
                FormField::Subject | FormField::Difficulty if focused => format!("< {} >", value),
                FormField::Answer if focused => format!("{}_  (←/→ pick an option)", value),
                _ if focused => format!("{}_", value),
                _ => value,
            };
            let label_style = if focused {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(format!("{:<12}", field.label()), label_style),
                Span::styled(shown, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_string())
            .title_style(Style::default().fg(Color::Yellow))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title.to_string())
                .title_style(Style::default().fg(Color::Yellow))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let color = match notice {
        Notice::Info(_) => Color::Green,
        Notice::Error(_) => Color::Red,
    };
    let widget = Paragraph::new(notice.text().to_string()).style(Style::default().fg(color).bold());
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, mode: &AdminMode) {
    let text = match mode {
        AdminMode::Browse => {
            "j/k move  ·  ←/→ subject  ·  e edit  ·  a add  ·  d delete  ·  i import  ·  t template  ·  r reload  ·  q quit"
        }
        AdminMode::Editing(_) => "Tab next field  ·  ←/→ choose  ·  Enter save  ·  Esc cancel",
        AdminMode::Adding(_) => "Tab next field  ·  ←/→ choose  ·  Enter add  ·  Esc close",
        AdminMode::ConfirmDelete(_) => "y confirm  ·  n cancel",
        AdminMode::Importing(_) => "Type a path  ·  Enter upload  ·  Esc cancel",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::bank::fake::{FakeBank, bank_question};

    fn action(controller: &AdminController, code: KeyCode) -> Option<AdminAction> {
        match map_key(controller, KeyEvent::new(code, KeyModifiers::NONE)) {
            Some(AdminKey::Action(action)) => Some(action),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_keys_follow_mode() {
        let bank = Arc::new(FakeBank::with_rows(vec![bank_question(
            1,
            "Physics",
            ["a", "b", "c", "d"],
            "a",
        )]));
        let mut admin = AdminController::new(bank, SubjectFilter::All);
        admin.dispatch(AdminAction::Reload).await;

        assert_eq!(action(&admin, KeyCode::Char('e')), Some(AdminAction::Edit));
        assert_eq!(action(&admin, KeyCode::Right), Some(AdminAction::Filter { forward: true }));

        admin.dispatch(AdminAction::Edit).await;
        assert_eq!(
            action(&admin, KeyCode::Char('e')),
            Some(AdminAction::Input(FormInput::Char('e')))
        );
        assert_eq!(action(&admin, KeyCode::Esc), Some(AdminAction::Cancel));

        admin.dispatch(AdminAction::Cancel).await;
        admin.dispatch(AdminAction::Delete).await;
        assert_eq!(action(&admin, KeyCode::Char('y')), Some(AdminAction::ConfirmDelete));
        assert_eq!(action(&admin, KeyCode::Char('x')), None);
    }
}
