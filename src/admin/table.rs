//! Admin table state.

use crate::models::{BankQuestion, QuestionId, SubjectFilter};

use super::form::{FormEditor, QuestionForm};

/// A row being edited in place, drafted from its retained record.
#[derive(Debug, Clone, PartialEq)]
pub struct RowEdit {
    pub id: QuestionId,
    pub editor: FormEditor,
}

/// What the admin screen is doing. Only one row can be edited at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminMode {
    Browse,
    Editing(RowEdit),
    Adding(FormEditor),
    ConfirmDelete(QuestionId),
    /// File path being typed for a CSV import.
    Importing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }
}

#[derive(Debug)]
pub struct AdminTable {
    pub filter: SubjectFilter,
    pub rows: Vec<BankQuestion>,
    pub cursor: usize,
    pub mode: AdminMode,
    pub notice: Option<Notice>,
}

impl AdminTable {
    pub fn new(filter: SubjectFilter) -> Self {
        Self {
            filter,
            rows: Vec::new(),
            cursor: 0,
            mode: AdminMode::Browse,
            notice: None,
        }
    }

    /// Replace the list, keeping the cursor on a valid row.
    pub fn set_rows(&mut self, rows: Vec<BankQuestion>) {
        self.rows = rows;
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn selected_row(&self) -> Option<&BankQuestion> {
        self.rows.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Start editing the selected row from its retained record.
    pub fn begin_edit(&mut self) -> bool {
        let Some(row) = self.selected_row() else {
            return false;
        };
        let edit = RowEdit {
            id: row.id.clone(),
            editor: FormEditor::new(QuestionForm::from(row)),
        };
        self.mode = AdminMode::Editing(edit);
        true
    }

    pub fn editing_id(&self) -> Option<&QuestionId> {
        match &self.mode {
            AdminMode::Editing(edit) => Some(&edit.id),
            _ => None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::Info(text.into()));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::Error(text.into()));
    }
}
