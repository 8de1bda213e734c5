// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the generation state machine against a scripted
//! provider. Time is paused so backoff sleeps and attempt timeouts advance
//! instantly.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use postloom_config::{ActionLimit, LimitsConfig, PostloomConfig};
use postloom_core::{ContentType, ErrorKind, GenerationRequest, Platform, PromptVersion};
use postloom_engine::{ACTION_GENERATE, BackoffPolicy, NoJitter, Orchestrator};
use postloom_test_utils::{MockOutcome, MockProvider, RecordingAuditLogger};

fn request() -> GenerationRequest {
    GenerationRequest::new("coffee brewing tips", Platform::Twitter, ContentType::Post)
}

/// Orchestrator over the given provider with pinned (zero) jitter and a
/// recording audit sink.
fn orchestrator(provider: Arc<MockProvider>) -> (Orchestrator, RecordingAuditLogger) {
    let config = PostloomConfig::default();
    let audit = RecordingAuditLogger::new();
    let orchestrator = Orchestrator::new(provider, &config)
        .with_audit(Arc::new(audit.clone()))
        .with_backoff(BackoffPolicy::new(&config.backoff).with_jitter(Arc::new(NoJitter)));
    (orchestrator, audit)
}

#[tokio::test(start_paused = true)]
async fn first_attempt_success_needs_no_retries() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![MockOutcome::Reply(
        "fresh post about coffee".to_string(),
    )]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.content, "fresh post about coffee");
    assert_eq!(result.attempts_made, 1);
    assert!(!result.fallback_used);
    assert!(result.error.is_none());
    assert_eq!(result.metadata.prompt_version, PromptVersion::V2_1);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_to_success() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![
        MockOutcome::fail_status("overloaded", 503),
        MockOutcome::fail_transport("connection reset"),
        MockOutcome::Reply("third time lucky".to_string()),
    ]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.content, "third time lucky");
    assert_eq!(result.attempts_made, 3);
    assert!(!result.fallback_used);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_fall_back_with_last_error() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![
        MockOutcome::fail_status("overloaded", 503),
        MockOutcome::fail_status("overloaded", 503),
        MockOutcome::fail_status("overloaded", 529),
    ]));
    let (orchestrator, audit) = orchestrator(provider.clone());

    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(!result.success);
    assert!(result.fallback_used);
    assert_eq!(result.attempts_made, 3);
    assert!(!result.content.is_empty());
    assert!(result.content.contains("coffee brewing tips"));
    let error = result.error.expect("fallback carries the last error");
    assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
    assert_eq!(result.metadata.prompt_version, PromptVersion::Fallback);
    assert!(audit.event_names().contains(&"fallback_used"));
    assert_eq!(provider.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn authentication_failure_short_circuits() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![MockOutcome::fail_status(
        "invalid api key",
        401,
    )]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(!result.success);
    assert!(result.fallback_used);
    assert_eq!(result.attempts_made, 1);
    assert_eq!(provider.calls(), 1, "non-retryable errors get no retries");
    assert_eq!(result.error.unwrap().kind, ErrorKind::Authentication);
}

#[tokio::test(start_paused = true)]
async fn hung_attempt_times_out_and_retries() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![
        MockOutcome::Hang,
        MockOutcome::Reply("recovered after timeout".to_string()),
    ]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.content, "recovered after timeout");
    assert_eq!(result.attempts_made, 2);
}

#[tokio::test(start_paused = true)]
async fn empty_completion_is_retried() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![
        MockOutcome::Empty,
        MockOutcome::Reply("non-empty this time".to_string()),
    ]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.attempts_made, 2);
}

#[tokio::test(start_paused = true)]
async fn blank_topic_fails_validation_without_provider_calls() {
    let provider = Arc::new(MockProvider::new());
    let (orchestrator, audit) = orchestrator(provider.clone());

    let mut req = request();
    req.topic = "   \t ".to_string();
    let result = orchestrator
        .generate(&req, "user-1", &CancellationToken::new())
        .await;

    assert!(!result.success);
    assert!(result.fallback_used);
    assert_eq!(result.attempts_made, 0);
    assert_eq!(provider.calls(), 0);
    assert!(!result.content.is_empty());
    assert_eq!(result.error.unwrap().kind, ErrorKind::ValidationError);
    assert!(audit.event_names().contains(&"sanitization_violation"));
}

#[tokio::test(start_paused = true)]
async fn dangerous_topic_is_rejected_but_fallback_keeps_safe_text() {
    let provider = Arc::new(MockProvider::new());
    let (orchestrator, audit) = orchestrator(provider.clone());

    let mut req = request();
    req.topic = "coffee brewing <script>alert(1)</script> tips".to_string();
    let result = orchestrator
        .generate(&req, "user-1", &CancellationToken::new())
        .await;

    assert!(!result.success);
    assert_eq!(result.attempts_made, 0);
    assert_eq!(provider.calls(), 0);
    assert!(result.content.contains("coffee brewing"));
    assert!(!result.content.contains("<script"));
    assert_eq!(result.error.unwrap().kind, ErrorKind::ValidationError);
    assert!(audit.event_names().contains(&"sanitization_violation"));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_denial_yields_fallback_without_attempts() {
    let provider = Arc::new(MockProvider::new());
    let config = PostloomConfig {
        limits: LimitsConfig {
            actions: BTreeMap::from([(
                "generate_content".to_string(),
                ActionLimit {
                    max_requests: 1,
                    window_ms: 3_600_000,
                },
            )]),
        },
        ..PostloomConfig::default()
    };
    let audit = RecordingAuditLogger::new();
    let orchestrator = Orchestrator::new(provider.clone(), &config)
        .with_audit(Arc::new(audit.clone()))
        .with_backoff(BackoffPolicy::new(&config.backoff).with_jitter(Arc::new(NoJitter)));
    let cancel = CancellationToken::new();

    let first = orchestrator.generate(&request(), "user-1", &cancel).await;
    assert!(first.success);

    let second = orchestrator.generate(&request(), "user-1", &cancel).await;
    assert!(!second.success);
    assert!(second.fallback_used);
    assert_eq!(second.attempts_made, 0);
    let error = second.error.expect("denial carries a rate_limit error");
    assert_eq!(error.kind, ErrorKind::RateLimit);
    assert!(!error.retryable, "local denials are final for this call");
    assert!(audit.event_names().contains(&"rate_limit_denied"));
    assert_eq!(provider.calls(), 1);

    // Another subject still has capacity.
    let other = orchestrator.generate(&request(), "user-2", &cancel).await;
    assert!(other.success);
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_returns_fallback_without_attempts() {
    let provider = Arc::new(MockProvider::new());
    let (orchestrator, _) = orchestrator(provider.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = orchestrator.generate(&request(), "user-1", &cancel).await;

    assert!(!result.success);
    assert!(result.fallback_used);
    assert_eq!(result.attempts_made, 0);
    assert_eq!(provider.calls(), 0);
    let error = result.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Unknown);
    assert!(!error.retryable);
}

#[tokio::test(start_paused = true)]
async fn cancellation_mid_attempt_stops_the_loop() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![MockOutcome::Hang]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = orchestrator.generate(&request(), "user-1", &cancel).await;

    assert!(!result.success);
    assert!(result.fallback_used);
    assert_eq!(result.attempts_made, 1);
    assert!(!result.content.is_empty());
}

#[tokio::test(start_paused = true)]
async fn retry_after_hint_stretches_the_backoff() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![
        MockOutcome::Fail {
            message: "slow down".to_string(),
            status: Some(429),
            retry_after_ms: Some(5_000),
        },
        MockOutcome::Reply("after the hint".to_string()),
    ]));
    let (orchestrator, _) = orchestrator(provider.clone());

    let started = tokio::time::Instant::now();
    let result = orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.attempts_made, 2);
    // Default schedule would wait 1s; the hint stretches it to 5s.
    assert!(started.elapsed() >= std::time::Duration::from_millis(5_000));
}

#[tokio::test(start_paused = true)]
async fn progress_messages_follow_the_attempt_index() {
    let provider = Arc::new(MockProvider::with_outcomes(vec![
        MockOutcome::fail_status("overloaded", 503),
        MockOutcome::fail_status("overloaded", 503),
        MockOutcome::Reply("done".to_string()),
    ]));
    let (orchestrator, _) = orchestrator(provider);

    let messages: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let result = orchestrator
        .generate_with_progress(
            &request(),
            "user-1",
            |message| messages.lock().unwrap().push(message.to_string()),
            &CancellationToken::new(),
        )
        .await;

    assert!(result.success);
    assert_eq!(
        *messages.lock().unwrap(),
        vec![
            "First attempt failed, retrying...".to_string(),
            "Retrying with a different approach...".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn content_is_never_empty_whatever_the_failure() {
    let failures = vec![
        MockOutcome::fail_status("bad request", 400),
        MockOutcome::fail_status("invalid api key", 401),
        MockOutcome::fail_status("quota exhausted", 402),
        MockOutcome::fail_status("slow down", 429),
        MockOutcome::fail_status("overloaded", 503),
        MockOutcome::fail_transport("dns failure"),
        MockOutcome::Empty,
        MockOutcome::Hang,
    ];
    for outcome in failures {
        let provider = Arc::new(MockProvider::with_outcomes(vec![outcome.clone()]));
        let (orchestrator, _) = orchestrator(provider);
        let req = request().with_max_retries(1);
        let result = orchestrator
            .generate(&req, "user-1", &CancellationToken::new())
            .await;
        assert!(!result.content.is_empty(), "empty content for {outcome:?}");
        assert!(result.fallback_used, "no fallback for {outcome:?}");
        assert!(result.error.is_some(), "no error for {outcome:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn pre_flight_check_is_a_read_only_peek() {
    let provider = Arc::new(MockProvider::new());
    let (orchestrator, _) = orchestrator(provider);

    let before = orchestrator.check_rate_limit("user-1", ACTION_GENERATE);
    assert!(before.allowed);
    assert_eq!(
        orchestrator.check_rate_limit("user-1", ACTION_GENERATE).remaining,
        before.remaining
    );

    orchestrator
        .generate(&request(), "user-1", &CancellationToken::new())
        .await;
    let after = orchestrator.check_rate_limit("user-1", ACTION_GENERATE);
    assert_eq!(after.remaining, before.remaining - 1);

    // Other actions are scoped independently of generation.
    let login = orchestrator.check_rate_limit("user-1", "login");
    assert!(login.allowed);
    assert_eq!(login.remaining, 5);
}
