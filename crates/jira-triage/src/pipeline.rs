//! Triage pipeline - orchestrates the list-classify-write flow.

use std::collections::HashSet;
use std::sync::Arc;

use llm::AIProvider;
use tracing::{error, info, warn};

use crate::analysis::{ComplexityAnalyzer, ComplexityScore, LabelClassifier, Vocabulary};
use crate::error::{PipelineError, TrackerError};
use crate::paginator::{PageConfig, Paginator, COMPLEXITY_PAGE_SIZE};
use crate::reconciler::{LabelOutcome, LabelReconciler};
use crate::tracker::{FieldUpdate, IssueTracker};

/// Where complexity scores are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComplexityField {
    /// No target field configured; scores are only logged.
    #[default]
    Unwired,
    /// Custom field ID (e.g., `customfield_10042`).
    Custom(String),
}

impl ComplexityField {
    /// Build from an optional field ID, treating blank as unwired.
    pub fn from_option(field: Option<String>) -> Self {
        field
            .filter(|f| !f.trim().is_empty())
            .map_or(Self::Unwired, Self::Custom)
    }
}

/// What the pipeline classifies and how it writes results.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Score complexity 0-3.
    Complexity { field: ComplexityField },
    /// Assign domain and technology labels.
    Labels {
        /// Vocabulary offered to the model.
        vocabulary: Vocabulary,
        /// Labels this tool may remove.
        controlled: HashSet<String>,
    },
}

/// Configuration for the triage pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Classification mode.
    pub mode: Mode,
    /// Search paging.
    pub paging: PageConfig,
    /// AI model to use.
    pub model: String,
}

impl PipelineConfig {
    /// Label classification over every matching issue.
    pub fn labels(model: impl Into<String>) -> Self {
        Self {
            mode: Mode::Labels {
                vocabulary: Vocabulary::standard(),
                controlled: Vocabulary::controlled_labels(false),
            },
            paging: PageConfig::default(),
            model: model.into(),
        }
    }

    /// Complexity scoring over the first page of matching issues.
    pub fn complexity(model: impl Into<String>, field: ComplexityField) -> Self {
        Self {
            mode: Mode::Complexity { field },
            paging: PageConfig::single(COMPLEXITY_PAGE_SIZE),
            model: model.into(),
        }
    }
}

/// Result of a single run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Issues matching the query.
    pub found: usize,
    /// Issues the oracle classified (not a fallback).
    pub classified: usize,
    /// Issues whose tracker fields were written.
    pub updated: usize,
    /// Issues left untouched (undetermined score, unwired field, no close transition).
    pub skipped: usize,
    /// Issues that failed with a tracker error.
    pub failed: usize,
    /// Errors encountered.
    pub errors: Vec<String>,
}

/// Outcome of processing one issue.
enum IssueOutcome {
    Updated,
    Skipped,
}

/// Triage pipeline orchestrator.
pub struct Pipeline {
    config: PipelineConfig,
    tracker: Arc<dyn IssueTracker>,
    provider: Arc<dyn AIProvider>,
}

impl Pipeline {
    /// Create a new pipeline.
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        tracker: Arc<dyn IssueTracker>,
        provider: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            config,
            tracker,
            provider,
        }
    }

    /// Process every issue matching `query`.
    ///
    /// Per-issue problems are logged and counted; only a failure to list
    /// any issue at all aborts the run.
    pub async fn run(&self, query: &str) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();

        let pagination = Paginator::new(&*self.tracker, self.config.paging)
            .collect_keys(query)
            .await;
        if pagination.failed_outright() {
            if let Some(source) = pagination.interrupted {
                return Err(PipelineError::IssueListing {
                    query: query.to_string(),
                    source,
                });
            }
        }
        if let Some(e) = &pagination.interrupted {
            summary.errors.push(format!("pagination stopped early: {e}"));
        }

        let keys = pagination.keys;
        summary.found = keys.len();
        info!(count = keys.len(), "Found tasks to process");

        match &self.config.mode {
            Mode::Complexity { field } => {
                let analyzer =
                    ComplexityAnalyzer::new(self.provider.clone(), self.config.model.clone())?;
                for key in &keys {
                    let outcome = self.score_issue(&analyzer, field, key, &mut summary).await;
                    record(&mut summary, key, outcome);
                }
            }
            Mode::Labels {
                vocabulary,
                controlled,
            } => {
                let classifier = LabelClassifier::new(
                    self.provider.clone(),
                    self.config.model.clone(),
                    vocabulary.clone(),
                )?;
                let reconciler = LabelReconciler::new(&*self.tracker, controlled);
                for key in &keys {
                    let outcome = self
                        .label_issue(&classifier, &reconciler, key, &mut summary)
                        .await;
                    record(&mut summary, key, outcome);
                }
            }
        }

        info!(
            found = summary.found,
            classified = summary.classified,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }

    async fn score_issue(
        &self,
        analyzer: &ComplexityAnalyzer,
        field: &ComplexityField,
        key: &str,
        summary: &mut RunSummary,
    ) -> Result<IssueOutcome, TrackerError> {
        let issue = self.tracker.get_issue(key).await?;
        info!(issue = %key, "Analyzing complexity for task");

        let verdict = analyzer
            .analyze(&issue.summary, issue.description_text())
            .await;
        if !verdict.is_fallback() {
            summary.classified += 1;
        }

        let score = verdict.into_value();
        if !score.is_determined() {
            warn!(issue = %key, "Skipping update due to invalid complexity");
            return Ok(IssueOutcome::Skipped);
        }
        self.write_complexity(field, key, score).await
    }

    async fn write_complexity(
        &self,
        field: &ComplexityField,
        key: &str,
        score: ComplexityScore,
    ) -> Result<IssueOutcome, TrackerError> {
        match field {
            ComplexityField::Unwired => {
                info!(
                    issue = %key,
                    complexity = %score,
                    "Complexity field not configured, score not written"
                );
                Ok(IssueOutcome::Skipped)
            }
            ComplexityField::Custom(id) => {
                let update = FieldUpdate::new().with(id.as_str(), score.value());
                self.tracker.update_fields(key, &update).await?;
                info!(issue = %key, complexity = %score, field = %id, "Updated complexity");
                Ok(IssueOutcome::Updated)
            }
        }
    }

    async fn label_issue(
        &self,
        classifier: &LabelClassifier,
        reconciler: &LabelReconciler<'_>,
        key: &str,
        summary: &mut RunSummary,
    ) -> Result<IssueOutcome, TrackerError> {
        let issue = self.tracker.get_issue(key).await?;
        info!(issue = %key, "Processing task");

        let verdict = classifier
            .classify(&issue.summary, issue.description_text())
            .await;
        if !verdict.is_fallback() {
            summary.classified += 1;
        }

        let new_labels = verdict.into_value().combined();
        let outcome = reconciler.reconcile_issue(&issue, &new_labels).await?;
        Ok(match outcome {
            LabelOutcome::Updated { .. } | LabelOutcome::Reclosed { .. } => IssueOutcome::Updated,
            LabelOutcome::Abandoned { .. } => IssueOutcome::Skipped,
        })
    }
}

/// Fold one issue's outcome into the run summary.
fn record(summary: &mut RunSummary, key: &str, outcome: Result<IssueOutcome, TrackerError>) {
    match outcome {
        Ok(IssueOutcome::Updated) => summary.updated += 1,
        Ok(IssueOutcome::Skipped) => summary.skipped += 1,
        Err(e) => {
            error!(issue = %key, error = %e, "Failed to process issue");
            summary.failed += 1;
            summary.errors.push(format!("{key}: {e}"));
        }
    }
}
