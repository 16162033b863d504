//! Label reconciliation.
//!
//! Replaces the labels this tool owns with a fresh classification while
//! leaving every other label on the issue untouched.

use std::collections::{BTreeSet, HashSet};

use tracing::{error, info};

use crate::tracker::{FieldUpdate, Issue, IssueTracker, TrackerResult, CLOSED_STATUS};

/// What happened to an issue's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOutcome {
    /// Labels written with a direct field update.
    Updated { labels: Vec<String> },
    /// Issue was closed; labels written while re-applying the close transition.
    Reclosed {
        labels: Vec<String>,
        transition_id: String,
    },
    /// Issue was closed and offered no close transition; nothing written.
    Abandoned { labels: Vec<String> },
}

impl LabelOutcome {
    /// The merged label set, whether or not it was written.
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Updated { labels } | Self::Reclosed { labels, .. } | Self::Abandoned { labels } => {
                labels
            }
        }
    }

    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Abandoned { .. })
    }
}

/// Compute `(current - controlled) ∪ new`, deduplicated and sorted.
pub fn merge_labels<S: AsRef<str>>(
    current: &[S],
    controlled: &HashSet<String>,
    new: &[S],
) -> Vec<String> {
    current
        .iter()
        .map(AsRef::as_ref)
        .filter(|label| !controlled.contains(*label))
        .chain(new.iter().map(AsRef::as_ref))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Writes classified labels back to the tracker.
pub struct LabelReconciler<'a> {
    tracker: &'a dyn IssueTracker,
    controlled: &'a HashSet<String>,
}

impl<'a> LabelReconciler<'a> {
    /// `controlled` is the set of labels this tool may remove.
    pub fn new(tracker: &'a dyn IssueTracker, controlled: &'a HashSet<String>) -> Self {
        Self {
            tracker,
            controlled,
        }
    }

    /// Fetch the issue and reconcile its labels.
    pub async fn reconcile(&self, key: &str, new_labels: &[String]) -> TrackerResult<LabelOutcome> {
        let issue = self.tracker.get_issue(key).await?;
        self.reconcile_issue(&issue, new_labels).await
    }

    /// Reconcile labels on an already-fetched issue.
    pub async fn reconcile_issue(
        &self,
        issue: &Issue,
        new_labels: &[String],
    ) -> TrackerResult<LabelOutcome> {
        let labels = merge_labels(&issue.labels, self.controlled, new_labels);
        let update = FieldUpdate::labels(&labels);

        if !issue.is_closed() {
            self.tracker.update_fields(&issue.key, &update).await?;
            info!(issue = %issue.key, ?labels, "Labels updated for open issue");
            return Ok(LabelOutcome::Updated { labels });
        }

        // Closed issues reject plain edits; re-running the close transition
        // with the fields attached is the only way to change them.
        info!(issue = %issue.key, "Issue is closed, attempting to re-resolve");
        let transitions = if issue.transitions.is_empty() {
            self.tracker.list_transitions(&issue.key).await?
        } else {
            issue.transitions.clone()
        };
        let Some(close) = transitions
            .into_iter()
            .find(|t| t.name.to_lowercase() == CLOSED_STATUS)
        else {
            error!(
                issue = %issue.key,
                "No 'closed' transition available, labels not updated"
            );
            return Ok(LabelOutcome::Abandoned { labels });
        };

        self.tracker
            .transition_with_fields(&issue.key, &close.id, &update)
            .await?;
        info!(issue = %issue.key, ?labels, "Issue re-resolved and labels updated");
        Ok(LabelOutcome::Reclosed {
            labels,
            transition_id: close.id,
        })
    }
}
