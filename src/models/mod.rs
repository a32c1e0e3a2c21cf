mod question;

pub use question::{BankQuestion, Difficulty, QuestionId, QuizQuestion, SubjectFilter, SUBJECTS};
