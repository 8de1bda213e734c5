// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation state machine: validate, admit, attempt, retry, fall back.
//!
//! `generate` is the single entry point of the resilience layer. It is
//! total over its input space: every call terminates with a
//! [`GenerationResult`] whose `content` is non-empty, no matter how the
//! provider misbehaves. The provider and audit sink are injected trait
//! objects; the limiter and backoff policy are built from config.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::time::{Instant, sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use postloom_config::{EngineConfig, PostloomConfig};
use postloom_core::{
    AuditEvent, AuditLogger, AuditSeverity, ClassifiedError, ErrorKind, GenerationRequest,
    GenerationResult, PostloomError, PromptPayload, PromptVersion, ProviderAdapter, ProviderOutput,
    RateLimitDecision, ResultMetadata, TracingAuditLogger,
};
use postloom_fallback::{DEFAULT_TOPIC, synthesize};
use postloom_guard::validate;
use postloom_ratelimit::RateLimiter;

use crate::backoff::BackoffPolicy;
use crate::classify::classify;
use crate::progress::retry_message;

/// Rate-limit action name for content generation calls.
pub const ACTION_GENERATE: &str = "generate_content";

/// Drives a generation request through validation, rate limiting, the
/// retry loop, and fallback synthesis.
pub struct Orchestrator {
    provider: Arc<dyn ProviderAdapter>,
    limiter: RateLimiter,
    audit: Arc<dyn AuditLogger>,
    engine: EngineConfig,
    backoff: BackoffPolicy,
}

impl Orchestrator {
    /// Builds an orchestrator from config, with a fresh in-memory limiter
    /// and the default tracing audit sink.
    pub fn new(provider: Arc<dyn ProviderAdapter>, config: &PostloomConfig) -> Self {
        Self {
            provider,
            limiter: RateLimiter::new(config.limits.clone()),
            audit: Arc::new(TracingAuditLogger),
            engine: config.engine.clone(),
            backoff: BackoffPolicy::new(&config.backoff),
        }
    }

    /// Replaces the audit sink.
    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the rate limiter, e.g. to share a store across instances.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Replaces the backoff policy. Tests pin the jitter source this way.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Pre-flight rate-limit decision for `(subject, action)`, without
    /// consuming a slot. Only [`generate`](Self::generate) records
    /// admissions (under [`ACTION_GENERATE`]).
    pub fn check_rate_limit(&self, subject: &str, action: &str) -> RateLimitDecision {
        self.limiter.peek(subject, action)
    }

    /// Runs a generation request to completion. Never fails: provider
    /// exhaustion, rate-limit denial, and invalid input all yield a
    /// fallback result instead of an error.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        subject: &str,
        cancel: &CancellationToken,
    ) -> GenerationResult {
        self.generate_with_progress(request, subject, |_| {}, cancel)
            .await
    }

    /// Like [`generate`](Self::generate), invoking `on_progress` with a
    /// user-facing message before each retry.
    pub async fn generate_with_progress(
        &self,
        request: &GenerationRequest,
        subject: &str,
        on_progress: impl Fn(&str) + Send,
        cancel: &CancellationToken,
    ) -> GenerationResult {
        let start = Instant::now();

        // Validation and sanitization happen before anything is spent on
        // the request: no provider call, no rate-limit slot.
        let validation = validate(&request.topic);
        if !validation.violations.is_empty() {
            self.audit.log(AuditEvent::new(
                "sanitization_violation",
                subject,
                AuditSeverity::Warning,
                json!({ "violations": &validation.violations }),
            ));
        }
        if !validation.is_valid {
            let error = ClassifiedError::new(
                ErrorKind::ValidationError,
                validation.violations.join("; "),
            );
            return self.fallback_result(
                request,
                validation.sanitized.as_deref(),
                error,
                0,
                subject,
                start,
            );
        }
        // Checked above: a valid result always carries a sanitized topic.
        let sanitized = validation.sanitized.unwrap_or_default();

        let decision = self.limiter.check(subject, ACTION_GENERATE);
        if !decision.allowed {
            self.audit.log(AuditEvent::new(
                "rate_limit_denied",
                subject,
                AuditSeverity::Warning,
                json!({ "action": ACTION_GENERATE, "reset_at_ms": decision.reset_at_ms }),
            ));
            let mut error = ClassifiedError::new(
                ErrorKind::RateLimit,
                format!("generation denied by local rate limit for {subject}"),
            )
            .non_retryable();
            if let Some(reset_at_ms) = decision.reset_at_ms {
                let wait_ms = reset_at_ms.saturating_sub(Utc::now().timestamp_millis());
                error = error.with_retry_after_ms(wait_ms.max(0) as u64);
            }
            return self.fallback_result(request, Some(&sanitized), error, 0, subject, start);
        }

        let payload = PromptPayload {
            text: sanitized.clone(),
            platform: request.platform,
            content_type: request.content_type,
            tone: request.tone.clone(),
            goal: request.goal.clone(),
            key_points: request.key_points.clone(),
            style: request.style,
        };
        let max_retries = request.max_retries.max(1);
        let attempt_timeout =
            std::time::Duration::from_millis(request.timeout_ms.unwrap_or(self.engine.timeout_ms));

        let mut attempts_made = 0;
        let mut last_error: Option<ClassifiedError> = None;

        for attempt in 1..=max_retries {
            if cancel.is_cancelled() {
                last_error = Some(classify(&PostloomError::Cancelled));
                break;
            }
            attempts_made = attempt;

            match self.attempt(&payload, attempt_timeout, cancel).await {
                Ok(output) => {
                    debug!(
                        provider = self.provider.name(),
                        attempt,
                        model = output.model.as_deref().unwrap_or("unknown"),
                        "generation succeeded"
                    );
                    return GenerationResult {
                        content: output.content,
                        success: true,
                        error: None,
                        attempts_made,
                        fallback_used: false,
                        metadata: metadata(start, PromptVersion::V2_1),
                    };
                }
                Err(err) => {
                    let classified = classify(&err);
                    warn!(
                        provider = self.provider.name(),
                        attempt,
                        kind = %classified.kind,
                        retryable = classified.retryable,
                        "generation attempt failed"
                    );
                    let retry_after_ms = classified.retry_after_ms;
                    let retryable = classified.retryable;
                    last_error = Some(classified);

                    if !retryable || attempt == max_retries {
                        break;
                    }
                    if let Some(message) = retry_message(attempt + 1, max_retries) {
                        on_progress(&message);
                    }
                    let delay = self.backoff.delay_after(attempt, retry_after_ms);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            last_error = Some(classify(&PostloomError::Cancelled));
                            break;
                        }
                        _ = sleep(delay) => {}
                    }
                }
            }
        }

        // Retries exhausted or a final error: synthesize locally.
        let error = last_error.unwrap_or_else(|| {
            ClassifiedError::new(ErrorKind::Unknown, "generation ended without an outcome")
        });
        self.fallback_result(request, Some(&sanitized), error, attempts_made, subject, start)
    }

    /// One provider attempt under a deadline and the caller's cancellation.
    ///
    /// The first resolved branch wins; a late provider result is discarded.
    /// The child token tells a well-behaved adapter to stop working once
    /// the attempt no longer matters.
    async fn attempt(
        &self,
        payload: &PromptPayload,
        attempt_timeout: std::time::Duration,
        cancel: &CancellationToken,
    ) -> Result<ProviderOutput, PostloomError> {
        let child = cancel.child_token();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                child.cancel();
                Err(PostloomError::Cancelled)
            }
            completed = timeout(attempt_timeout, self.provider.complete(payload, &child)) => {
                match completed {
                    Ok(inner) => inner,
                    Err(_) => {
                        child.cancel();
                        Err(PostloomError::Timeout { duration: attempt_timeout })
                    }
                }
            }
        };
        match outcome {
            Ok(output) if output.content.trim().is_empty() => Err(PostloomError::EmptyCompletion),
            other => other,
        }
    }

    /// Builds the fallback result and emits the `fallback_used` audit event.
    fn fallback_result(
        &self,
        request: &GenerationRequest,
        sanitized: Option<&str>,
        error: ClassifiedError,
        attempts_made: u32,
        subject: &str,
        start: Instant,
    ) -> GenerationResult {
        let mut fallback_request = request.clone();
        fallback_request.topic = match sanitized {
            Some(topic) if !topic.is_empty() => topic.to_string(),
            _ => DEFAULT_TOPIC.to_string(),
        };
        let content = synthesize(&fallback_request);

        self.audit.log(AuditEvent::new(
            "fallback_used",
            subject,
            AuditSeverity::Info,
            json!({ "kind": error.kind.to_string(), "attempts_made": attempts_made }),
        ));
        info!(
            kind = %error.kind,
            attempts_made,
            "returning fallback content"
        );

        GenerationResult {
            content,
            success: false,
            error: Some(error),
            attempts_made,
            fallback_used: true,
            metadata: metadata(start, PromptVersion::Fallback),
        }
    }
}

fn metadata(start: Instant, prompt_version: PromptVersion) -> ResultMetadata {
    ResultMetadata {
        duration_ms: start.elapsed().as_millis() as u64,
        prompt_version,
        generated_at: Utc::now(),
    }
}
