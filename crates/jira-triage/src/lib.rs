//! Jira triage crate for classifying issues with a language model.
//!
//! This crate provides:
//! - JQL search pagination over the Jira REST API
//! - Complexity scoring and domain/technology classification via an LLM
//! - Label reconciliation that preserves labels this tool does not own
//! - Close-transition handling for issues that reject direct edits

pub mod analysis;
pub mod config;
pub mod error;
pub mod jira;
pub mod paginator;
pub mod pipeline;
pub mod reconciler;
pub mod tracker;

// Re-export main types
pub use analysis::{ComplexityScore, FallbackReason, TaskLabels, Verdict, Vocabulary};
pub use config::{Config, Overrides};
pub use error::{ConfigError, PipelineError, TrackerError};
pub use jira::JiraClient;
pub use paginator::{PageConfig, Pagination, Paginator};
pub use pipeline::{ComplexityField, Mode, Pipeline, PipelineConfig, RunSummary};
pub use reconciler::{merge_labels, LabelOutcome, LabelReconciler};
pub use tracker::{FieldUpdate, Issue, IssueSummary, IssueTracker, Transition};
