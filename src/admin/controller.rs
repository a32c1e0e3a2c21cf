//! Admin page controller: list, filter, add, inline edit, delete and import.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::bank::QuestionBank;
use crate::models::SubjectFilter;
use crate::protocol::{QuestionUpdate, REQUEST_FAILED};

use super::form::{FormEditor, FormInput, QuestionForm};
use super::table::{AdminMode, AdminTable};

/// Where the CSV template is saved unless told otherwise.
pub const TEMPLATE_FILE: &str = "questions_template.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Reload,
    Filter { forward: bool },
    MoveCursor(isize),
    Edit,
    Add,
    Import,
    /// Keystroke for the open form or the import path prompt.
    Input(FormInput),
    /// Save the edited row, submit the add form, or upload the chosen file.
    Save,
    /// Leave the current mode. Cancelling an edit reloads the list.
    Cancel,
    Delete,
    ConfirmDelete,
    DownloadTemplate,
}

pub struct AdminController {
    bank: Arc<dyn QuestionBank>,
    table: AdminTable,
    template_path: PathBuf,
}

impl AdminController {
    pub fn new(bank: Arc<dyn QuestionBank>, filter: SubjectFilter) -> Self {
        Self {
            bank,
            table: AdminTable::new(filter),
            template_path: PathBuf::from(TEMPLATE_FILE),
        }
    }

    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    pub fn table(&self) -> &AdminTable {
        &self.table
    }

    pub async fn dispatch(&mut self, action: AdminAction) {
        if !matches!(action, AdminAction::Input(_) | AdminAction::MoveCursor(_)) {
            self.table.notice = None;
        }

        match action {
            AdminAction::Reload => self.reload().await,
            AdminAction::Filter { forward } => {
                if self.table.mode == AdminMode::Browse {
                    let filter = self.table.filter.cycle(forward);
                    if self.load(filter).await {
                        self.table.cursor = 0;
                    }
                }
            }
            AdminAction::MoveCursor(delta) => {
                if self.table.mode == AdminMode::Browse {
                    self.table.move_cursor(delta);
                }
            }
            AdminAction::Edit => {
                if self.table.mode == AdminMode::Browse {
                    self.table.begin_edit();
                }
            }
            AdminAction::Add => {
                if self.table.mode == AdminMode::Browse {
                    self.table.mode = AdminMode::Adding(FormEditor::new(QuestionForm::default()));
                }
            }
            AdminAction::Import => {
                if self.table.mode == AdminMode::Browse {
                    self.table.mode = AdminMode::Importing(String::new());
                }
            }
            AdminAction::Input(input) => self.input(input),
            AdminAction::Save => match self.table.mode {
                AdminMode::Editing(_) => self.save_edit().await,
                AdminMode::Adding(_) => self.submit_add().await,
                AdminMode::Importing(_) => self.import().await,
                _ => {}
            },
            AdminAction::Cancel => self.cancel().await,
            AdminAction::Delete => {
                if self.table.mode == AdminMode::Browse {
                    if let Some(row) = self.table.selected_row() {
                        self.table.mode = AdminMode::ConfirmDelete(row.id.clone());
                    }
                }
            }
            AdminAction::ConfirmDelete => self.delete().await,
            AdminAction::DownloadTemplate => self.download_template().await,
        }
    }

    async fn reload(&mut self) {
        self.load(self.table.filter.clone()).await;
    }

    /// Filter and rows change together; a failed load keeps both as they were.
    async fn load(&mut self, filter: SubjectFilter) -> bool {
        match self.bank.list_questions(&filter).await {
            Ok(rows) => {
                self.table.filter = filter;
                self.table.set_rows(rows);
                true
            }
            Err(e) => {
                warn!(subject = filter.query_value(), error = %e, "could not load questions");
                self.table.error(format!("Could not load questions: {}", e));
                false
            }
        }
    }

    fn input(&mut self, input: FormInput) {
        match &mut self.table.mode {
            AdminMode::Editing(edit) => edit.editor.apply(input),
            AdminMode::Adding(editor) => editor.apply(input),
            AdminMode::Importing(path) => match input {
                FormInput::Char(c) => path.push(c),
                FormInput::Backspace => {
                    path.pop();
                }
                _ => {}
            },
            _ => {}
        }
    }

    async fn cancel(&mut self) {
        let previous = std::mem::replace(&mut self.table.mode, AdminMode::Browse);
        if matches!(previous, AdminMode::Editing(_)) {
            self.reload().await;
        }
    }

    async fn save_edit(&mut self) {
        let AdminMode::Editing(edit) = &self.table.mode else {
            return;
        };
        let update = match edit.editor.form.validate() {
            Ok(payload) => QuestionUpdate {
                id: edit.id.clone(),
                payload,
            },
            Err(e) => {
                self.table.error(e.to_string());
                return;
            }
        };

        match self.bank.update_question(&update).await {
            Ok(verdict) => match verdict.rejection() {
                None => {
                    info!(question_id = %update.id, "question updated");
                    self.table.mode = AdminMode::Browse;
                    self.table.info("Question updated.");
                    self.reload().await;
                }
                Some(message) => self.table.error(message),
            },
            Err(e) => {
                warn!(question_id = %update.id, error = %e, "update request failed");
                self.table.error(REQUEST_FAILED);
            }
        }
    }

    async fn submit_add(&mut self) {
        let AdminMode::Adding(editor) = &self.table.mode else {
            return;
        };
        let payload = match editor.form.validate() {
            Ok(payload) => payload,
            Err(e) => {
                self.table.error(e.to_string());
                return;
            }
        };

        match self.bank.add_question(&payload).await {
            Ok(verdict) => match verdict.rejection() {
                None => {
                    info!(subject = %payload.subject, "question added");
                    self.table.mode = AdminMode::Adding(FormEditor::new(QuestionForm::default()));
                    self.table.info("Question added.");
                    self.reload().await;
                }
                Some(message) => self.table.error(message),
            },
            Err(e) => {
                warn!(error = %e, "add request failed");
                self.table.error(REQUEST_FAILED);
            }
        }
    }

    async fn delete(&mut self) {
        let AdminMode::ConfirmDelete(id) = &self.table.mode else {
            return;
        };
        let id = id.clone();
        self.table.mode = AdminMode::Browse;

        match self.bank.delete_question(&id).await {
            Ok(verdict) => match verdict.rejection() {
                None => {
                    info!(question_id = %id, "question deleted");
                    self.table.info("Question deleted.");
                    self.reload().await;
                }
                Some(message) => self.table.error(message),
            },
            Err(e) => {
                warn!(question_id = %id, error = %e, "delete request failed");
                self.table.error(REQUEST_FAILED);
            }
        }
    }

    async fn import(&mut self) {
        let AdminMode::Importing(path) = &self.table.mode else {
            return;
        };
        let path = PathBuf::from(path.trim());
        if path.as_os_str().is_empty() {
            self.table.error("Choose a CSV file to import.");
            return;
        }

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                self.table.error(format!("Could not read {}: {}", path.display(), e));
                return;
            }
        };
        let file_name = file_name(&path);

        match self.bank.upload_csv(&file_name, contents).await {
            Ok(response) => match response.into_report() {
                Ok(report) => {
                    info!(
                        file = %file_name,
                        added = report.added,
                        skipped = report.skipped,
                        errors = report.errors.len(),
                        "csv imported"
                    );
                    self.table.mode = AdminMode::Browse;
                    self.table.info(report.summary());
                    self.reload().await;
                }
                Err(message) => self.table.error(message),
            },
            Err(e) => {
                warn!(file = %file_name, error = %e, "upload request failed");
                self.table.error(REQUEST_FAILED);
            }
        }
    }

    async fn download_template(&mut self) {
        if self.table.mode != AdminMode::Browse {
            return;
        }
        let bytes = match self.bank.csv_template().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "template download failed");
                self.table.error(REQUEST_FAILED);
                return;
            }
        };
        match tokio::fs::write(&self.template_path, bytes).await {
            Ok(()) => {
                let saved = format!("Template saved to {}", self.template_path.display());
                self.table.info(saved);
            }
            Err(e) => {
                let message = format!("Could not write {}: {}", self.template_path.display(), e);
                self.table.error(message);
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions.csv".to_string())
}
