//! quizgen-core: Heuristic quiz generation and grading.
//!
//! Turns free-form study notes into fill-in-the-blank multiple-choice
//! quizzes and grades learner submissions against them. The text pipeline
//! runs normalize, segment, count, extract, build and assemble in that
//! order; an optional external provider can write the quiz instead, with
//! the heuristic pipeline as fallback.

pub mod assembler;
pub mod builder;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod grading;
pub mod model;
pub mod normalize;
pub mod phrases;
pub mod rules;
pub mod segment;
pub mod sources;
pub mod traits;
pub mod validate;

pub use assembler::{generate_quiz, generate_quiz_with_rng};
pub use grading::grade_submission;
pub use model::{AnswerSubmission, Question, Quiz};
