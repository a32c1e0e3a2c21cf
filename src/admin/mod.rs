//! Question-bank administration page.

mod controller;
mod form;
mod table;
pub mod ui;

pub use controller::{AdminAction, AdminController, TEMPLATE_FILE};
pub use form::{FormEditor, FormError, FormField, FormInput, QuestionForm};
pub use table::{AdminMode, AdminTable, Notice, RowEdit};
