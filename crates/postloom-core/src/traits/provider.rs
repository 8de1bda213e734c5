// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for AI completion backends.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::PostloomError;
use crate::types::{PromptPayload, ProviderOutput};

/// Adapter for an upstream AI completion provider.
///
/// Implementations own all network concerns (endpoints, authentication,
/// encoding). The orchestrator enforces its own per-attempt deadline by
/// racing `complete` against a timer, but also cancels `cancel` when the
/// deadline fires so cooperative adapters can abandon in-flight work.
/// Adapters that ignore the token are tolerated: the orchestrator drops the
/// attempt future and discards any late response.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + 'static {
    /// Human-readable adapter name, used in logs and audit events.
    fn name(&self) -> &str;

    /// Produces a completion for the given prompt payload.
    ///
    /// An `Ok` with empty `content` is treated by the engine as a
    /// generation failure, not a success.
    async fn complete(
        &self,
        prompt: &PromptPayload,
        cancel: &CancellationToken,
    ) -> Result<ProviderOutput, PostloomError>;
}
