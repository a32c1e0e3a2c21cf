//! Question form shared by the add panel and inline row editing.

use thiserror::Error;

use crate::models::{BankQuestion, Difficulty, SUBJECTS};
use crate::protocol::QuestionPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Subject,
    Question,
    Option(usize),
    Answer,
    Difficulty,
    Explanation,
}

impl FormField {
    pub const ORDER: [FormField; 9] = [
        FormField::Subject,
        FormField::Question,
        FormField::Option(0),
        FormField::Option(1),
        FormField::Option(2),
        FormField::Option(3),
        FormField::Answer,
        FormField::Difficulty,
        FormField::Explanation,
    ];

    pub fn label(&self) -> String {
        match self {
            FormField::Subject => "Subject".to_string(),
            FormField::Question => "Question".to_string(),
            FormField::Option(i) => format!("Option {}", option_letter(i)),
            FormField::Answer => "Answer".to_string(),
            FormField::Difficulty => "Difficulty".to_string(),
            FormField::Explanation => "Explanation".to_string(),
        }
    }

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        Self::ORDER[next]
    }
}

fn option_letter(index: &usize) -> char {
    char::from(b'A' + (*index as u8))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Subject is required.")]
    MissingSubject,
    #[error("Question text is required.")]
    MissingQuestion,
    #[error("All four options are required (option {} is empty).", option_letter(.0))]
    EmptyOption(usize),
    #[error("Answer must match one of the four options.")]
    AnswerNotAnOption,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionForm {
    pub subject: String,
    pub question: String,
    pub options: [String; 4],
    pub answer: String,
    pub difficulty: Difficulty,
    pub explanation: String,
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self {
            subject: SUBJECTS[0].to_string(),
            question: String::new(),
            options: Default::default(),
            answer: String::new(),
            difficulty: Difficulty::Medium,
            explanation: String::new(),
        }
    }
}

impl From<&BankQuestion> for QuestionForm {
    fn from(record: &BankQuestion) -> Self {
        Self {
            subject: record.subject.clone(),
            question: record.question.clone(),
            options: record.options.clone(),
            answer: record.answer.clone(),
            difficulty: record.difficulty,
            explanation: record.explanation.clone().unwrap_or_default(),
        }
    }
}

impl QuestionForm {
    /// Check the form and build the request body from the trimmed values.
    pub fn validate(&self) -> Result<QuestionPayload, FormError> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(FormError::MissingSubject);
        }
        let question = self.question.trim();
        if question.is_empty() {
            return Err(FormError::MissingQuestion);
        }
        let options = self.options.clone().map(|o| o.trim().to_string());
        if let Some(empty) = options.iter().position(|o| o.is_empty()) {
            return Err(FormError::EmptyOption(empty));
        }
        let answer = self.answer.trim();
        if !options.iter().any(|o| o == answer) {
            return Err(FormError::AnswerNotAnOption);
        }

        Ok(QuestionPayload {
            subject: subject.to_string(),
            question: question.to_string(),
            options,
            answer: answer.to_string(),
            difficulty: self.difficulty,
            explanation: self.explanation.trim().to_string(),
        })
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Question => Some(&mut self.question),
            FormField::Option(i) => self.options.get_mut(i),
            FormField::Answer => Some(&mut self.answer),
            FormField::Explanation => Some(&mut self.explanation),
            FormField::Subject | FormField::Difficulty => None,
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Subject => self.subject.clone(),
            FormField::Question => self.question.clone(),
            FormField::Option(i) => self.options.get(i).cloned().unwrap_or_default(),
            FormField::Answer => self.answer.clone(),
            FormField::Difficulty => self.difficulty.to_string(),
            FormField::Explanation => self.explanation.clone(),
        }
    }

    fn cycle(&mut self, field: FormField, forward: bool) {
        match field {
            FormField::Subject => {
                let len = SUBJECTS.len();
                let next = match SUBJECTS.iter().position(|s| *s == self.subject) {
                    Some(pos) if forward => (pos + 1) % len,
                    Some(pos) => (pos + len - 1) % len,
                    None => 0,
                };
                self.subject = SUBJECTS[next].to_string();
            }
            FormField::Difficulty => self.difficulty = self.difficulty.cycle(forward),
            FormField::Answer => {
                let choices: Vec<&String> = self.options.iter().filter(|o| !o.trim().is_empty()).collect();
                if choices.is_empty() {
                    return;
                }
                let len = choices.len();
                let next = match choices.iter().position(|o| **o == self.answer) {
                    Some(pos) if forward => (pos + 1) % len,
                    Some(pos) => (pos + len - 1) % len,
                    None => 0,
                };
                self.answer = choices[next].clone();
            }
            _ => {}
        }
    }
}

/// Keystrokes a form understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Cycle { forward: bool },
}

/// A form plus the field that has focus.
#[derive(Debug, Clone, PartialEq)]
pub struct FormEditor {
    pub form: QuestionForm,
    pub focus: FormField,
}

impl FormEditor {
    pub fn new(form: QuestionForm) -> Self {
        Self {
            form,
            focus: FormField::Question,
        }
    }

    pub fn apply(&mut self, input: FormInput) {
        match input {
            FormInput::NextField => self.focus = self.focus.step(true),
            FormInput::PrevField => self.focus = self.focus.step(false),
            FormInput::Cycle { forward } => self.form.cycle(self.focus, forward),
            FormInput::Char(c) => {
                if let Some(text) = self.form.text_mut(self.focus) {
                    text.push(c);
                }
            }
            FormInput::Backspace => {
                if let Some(text) = self.form.text_mut(self.focus) {
                    text.pop();
                }
            }
        }
    }
}
