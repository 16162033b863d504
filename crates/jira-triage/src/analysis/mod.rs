//! AI-powered task classification.
//!
//! The model is treated as an untrusted, unstructured text peer: each
//! classifier makes one call, parses the free-form answer defensively and
//! reports the outcome as a [`Verdict`].

mod complexity;
mod labels;
pub mod prompts;
mod verdict;
pub mod vocabulary;

pub use complexity::{parse_complexity, ComplexityAnalyzer, ComplexityScore};
pub use labels::{parse_labels, LabelClassifier, TaskLabels};
pub use prompts::PromptManager;
pub use verdict::{FallbackReason, Verdict};
pub use vocabulary::Vocabulary;

/// Stand-in for issues without a description.
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available";
