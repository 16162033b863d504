//! End-to-end pipeline tests against in-memory doubles.

mod common;

use std::sync::Arc;

use common::{issue, FakeTracker, Page, ScriptedProvider};
use jira_triage::analysis::DESCRIPTION_PLACEHOLDER;
use jira_triage::{ComplexityField, Pipeline, PipelineConfig, PipelineError, Transition};
use serde_json::json;

const MODEL: &str = "gpt-3.5-turbo";
const QUERY: &str = "project = OPS";

fn keys(keys: &[&str]) -> Page {
    Page::Keys(keys.iter().map(|k| (*k).to_string()).collect())
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn pipeline(
    config: PipelineConfig,
    tracker: &Arc<FakeTracker>,
    provider: &Arc<ScriptedProvider>,
) -> Pipeline {
    Pipeline::new(config, tracker.clone(), provider.clone())
}

// =============================================================================
// Label mode
// =============================================================================

#[tokio::test]
async fn test_labels_open_and_closed_issues() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-1", "OPS-2"])])
            .with_issue(issue(
                "OPS-1",
                "In Progress",
                Some("Rotate the IAM keys used by the billing job"),
                &["aws", "foo"],
            ))
            .with_issue(issue("OPS-2", "Closed", None, &["cybersecurity"]))
            .with_transitions(
                "OPS-2",
                vec![Transition::new("11", "Reopen"), Transition::new("31", "Closed")],
            ),
    );
    let provider = Arc::new(ScriptedProvider::replying(&[
        "Domains: insurance; cybersecurity\nTechnologies: aws",
        "Domains: fintech-made-up\nTechnologies: gcp",
    ]));

    let summary = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    assert_eq!(summary.found, 2);
    assert_eq!(summary.classified, 2);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.failed, 0);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0]
        .user_prompt()
        .contains("Rotate the IAM keys used by the billing job"));
    assert!(calls[0].user_prompt().contains("Summary of OPS-1"));
    assert!(calls[1].user_prompt().contains(DESCRIPTION_PLACEHOLDER));
    assert!(calls.iter().all(|c| c.model == MODEL));

    let updates = tracker.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "OPS-1");
    assert_eq!(
        updates[0].1.label_values(),
        Some(labels(&["aws", "cybersecurity", "foo", "insurance"]))
    );

    let transitioned = tracker.transitioned();
    assert_eq!(transitioned.len(), 1);
    assert_eq!(transitioned[0].0, "OPS-2");
    assert_eq!(transitioned[0].1, "31");
    assert_eq!(transitioned[0].2.label_values(), Some(labels(&["gcp"])));
}

#[tokio::test]
async fn test_label_requests_use_low_temperature() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-1"])])
            .with_issue(issue("OPS-1", "Open", None, &[])),
    );
    let provider = Arc::new(ScriptedProvider::replying(&["Domains: \nTechnologies: "]));

    pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    let calls = provider.calls();
    assert_eq!(calls[0].options.temperature, Some(0.2));
    assert_eq!(calls[0].options.max_tokens, Some(200));
}

#[tokio::test]
async fn test_oracle_failure_still_strips_controlled_labels() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-1"])])
            .with_issue(issue("OPS-1", "Open", Some("text"), &["aws", "team-a"])),
    );
    let provider = Arc::new(ScriptedProvider::new(vec![Err("quota exceeded")]));

    let summary = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    assert_eq!(summary.classified, 0);
    assert_eq!(summary.updated, 1);
    let updates = tracker.updates();
    assert_eq!(updates[0].1.label_values(), Some(labels(&["team-a"])));
}

#[tokio::test]
async fn test_single_line_answer_is_treated_as_empty() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-1"])])
            .with_issue(issue("OPS-1", "Open", None, &["gcp"])),
    );
    let provider = Arc::new(ScriptedProvider::replying(&["Domains: insurance"]));

    pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    assert_eq!(tracker.updates()[0].1.label_values(), Some(Vec::new()));
}

#[tokio::test]
async fn test_failing_issue_does_not_stop_the_run() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-1", "OPS-2", "OPS-3"])])
            .with_issue(issue("OPS-1", "Open", None, &[]))
            .with_issue(issue("OPS-3", "Open", None, &[]))
            .with_failing_update("OPS-1"),
    );
    let provider = Arc::new(ScriptedProvider::replying(&[
        "Domains: insurance\nTechnologies: aws",
        "Domains: insurance\nTechnologies: sap",
    ]));

    let summary = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    // OPS-1 fails on write, OPS-2 does not exist, OPS-3 succeeds.
    assert_eq!(summary.found, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.errors.len(), 2);
    let updates = tracker.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "OPS-3");
    assert_eq!(
        updates[0].1.label_values(),
        Some(labels(&["insurance", "sap"]))
    );
}

#[tokio::test]
async fn test_abandoned_close_counts_as_skipped() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-9"])])
            .with_issue(issue("OPS-9", "closed", None, &[])),
    );
    let provider = Arc::new(ScriptedProvider::replying(&["Domains: insurance\nTechnologies: aws"]));

    let summary = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert!(tracker.updates().is_empty());
    assert!(tracker.transitioned().is_empty());
}

// =============================================================================
// Listing failures
// =============================================================================

#[tokio::test]
async fn test_listing_failure_aborts_run() {
    let tracker = Arc::new(FakeTracker::new().with_pages(vec![Page::Fail]));
    let provider = Arc::new(ScriptedProvider::default());

    let result = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await;

    assert!(matches!(result, Err(PipelineError::IssueListing { ref query, .. }) if query == QUERY));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_partial_listing_processes_what_was_collected() {
    let tracker = Arc::new(
        FakeTracker::new()
            .with_pages(vec![
                Page::Keys((0..50).map(|n| format!("OPS-{n}")).collect()),
                Page::Fail,
            ])
            .with_issue(issue("OPS-0", "Open", None, &[])),
    );
    let provider = Arc::new(ScriptedProvider::replying(&[
        "Domains: insurance\nTechnologies: aws",
    ]));

    let summary = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    assert_eq!(summary.found, 50);
    assert_eq!(summary.updated, 1);
    assert!(summary
        .errors
        .iter()
        .any(|e| e.starts_with("pagination stopped early")));
}

#[tokio::test]
async fn test_empty_result_makes_no_oracle_calls() {
    let tracker = Arc::new(FakeTracker::new());
    let provider = Arc::new(ScriptedProvider::default());

    let summary = pipeline(PipelineConfig::labels(MODEL), &tracker, &provider)
        .run(QUERY)
        .await
        .unwrap();

    assert_eq!(summary.found, 0);
    assert!(provider.calls().is_empty());
}

// =============================================================================
// Complexity mode
// =============================================================================

fn complexity_tracker() -> Arc<FakeTracker> {
    Arc::new(
        FakeTracker::new()
            .with_pages(vec![keys(&["OPS-1", "OPS-2", "OPS-3"])])
            .with_issue(issue("OPS-1", "Open", Some("Fix a typo"), &[]))
            .with_issue(issue("OPS-2", "Open", None, &[]))
            .with_issue(issue("OPS-3", "Open", None, &[])),
    )
}

#[tokio::test]
async fn test_complexity_writes_scores_to_custom_field() {
    let tracker = complexity_tracker();
    let provider = Arc::new(ScriptedProvider::replying(&["Output: 2", "0", "banana"]));
    let config = PipelineConfig::complexity(
        MODEL,
        ComplexityField::Custom("customfield_10042".to_string()),
    );

    let summary = pipeline(config, &tracker, &provider).run(QUERY).await.unwrap();

    assert_eq!(summary.found, 3);
    assert_eq!(summary.classified, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 2);

    let updates = tracker.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "OPS-1");
    assert_eq!(updates[0].1.get("customfield_10042"), Some(&json!(2)));
}

#[tokio::test]
async fn test_complexity_without_field_writes_nothing() {
    let tracker = complexity_tracker();
    let provider = Arc::new(ScriptedProvider::replying(&["1", "2", "3"]));

    let summary = pipeline(
        PipelineConfig::complexity(MODEL, ComplexityField::Unwired),
        &tracker,
        &provider,
    )
    .run(QUERY)
    .await
    .unwrap();

    assert_eq!(summary.classified, 3);
    assert_eq!(summary.skipped, 3);
    assert!(tracker.updates().is_empty());
}

#[tokio::test]
async fn test_complexity_requests_one_page_with_short_answers() {
    let tracker = complexity_tracker();
    let provider = Arc::new(ScriptedProvider::replying(&["1", "1", "1"]));

    pipeline(
        PipelineConfig::complexity(MODEL, ComplexityField::Unwired),
        &tracker,
        &provider,
    )
    .run(QUERY)
    .await
    .unwrap();

    let searches = tracker.searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].max_results, 100);

    let calls = provider.calls();
    assert!(calls[0].user_prompt().contains("Task Description: Fix a typo"));
    assert!(calls[1]
        .user_prompt()
        .contains(&format!("Task Description: {DESCRIPTION_PLACEHOLDER}")));
    assert!(calls
        .iter()
        .all(|c| c.options.temperature == Some(0.2) && c.options.max_tokens == Some(10)));
}
