//! Per-session provider health state and failure classification.
//!
//! A [`ProviderSession`] is created once per enrichment batch from the
//! configured credentials, mutated in place as provider-call outcomes are
//! fed back, and discarded at session end. It is never persisted.
//!
//! # Single-writer contract
//!
//! The session is designed for one logical thread of control: the batch
//! driver mutates it through [`ProviderSession::record_failure`] /
//! [`ProviderSession::record_success`] and reads it back for the next
//! record. No internal locking is performed; concurrent use requires
//! external serialization (a mutex, or a single-consumer channel).
//!
//! # Time
//!
//! Cooldown expiry is lazy and timer-free: availability is a pure function
//! of the stored expiry and the current time, re-evaluated on every read.
//! Every time-dependent method has an `_at(now)` form taking an explicit
//! instant; the convenience form uses `Utc::now()`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::Credentials;
use crate::providers::Provider;

/// Default rate-limit cooldown: 60 seconds.
pub const DEFAULT_COOLDOWN_MS: i64 = 60_000;

/// Error-like value describing a failed provider call.
///
/// The HTTP collaborator hands back whatever it has: a numeric status, a
/// message, or both. Classification checks the status first and falls back
/// to case-insensitive substring matching on the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallError {
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl CallError {
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: Some(message.into()),
        }
    }

    /// Diagnostic string stored as a provider's `last_error`.
    fn render(&self) -> String {
        match (&self.message, self.status) {
            (Some(message), _) => message.clone(),
            (None, Some(status)) => format!("HTTP {status}"),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// Classification of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401/unauthorized: the provider is dead for the rest of the session.
    AuthError,
    /// 429/rate limit: the provider is paused until the cooldown expires.
    RateLimited,
    /// 400/bad request: a record-level problem, not a provider-health signal.
    MissingInput,
    /// "Not found" / "no candidates": a normal business outcome.
    NoCandidates,
    /// Anything else: counted, but no behavior attached yet.
    Error,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::AuthError => "auth_error",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::MissingInput => "missing_input",
            FailureKind::NoCandidates => "no_candidates",
            FailureKind::Error => "error",
        }
    }
}

/// Map an error-like value onto a [`FailureKind`].
///
/// A recognized numeric status (401/429/400) wins outright; message
/// substrings are consulted only when the status is absent or unrecognized,
/// so a 500 whose body mentions "rate limit" still pauses the provider.
pub fn classify(error: &CallError) -> FailureKind {
    match error.status {
        Some(401) => return FailureKind::AuthError,
        Some(429) => return FailureKind::RateLimited,
        Some(400) => return FailureKind::MissingInput,
        _ => {}
    }

    let message = error
        .message
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    if message.contains("401") || message.contains("unauthorized") {
        FailureKind::AuthError
    } else if message.contains("429") || message.contains("rate limit") {
        FailureKind::RateLimited
    } else if message.contains("400") || message.contains("bad request") {
        FailureKind::MissingInput
    } else if message.contains("not found")
        || message.contains("no candidates")
        || message.contains("no_candidates")
    {
        FailureKind::NoCandidates
    } else {
        FailureKind::Error
    }
}

/// Mutable health record for one provider, scoped to one session.
///
/// Fields are private so the invariants hold by construction: `authorized`
/// flips true to false at most once and never reverses, and `available`
/// goes false only on a rate-limit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderState {
    configured: bool,
    authorized: bool,
    available: bool,
    rate_limit_expires_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl ProviderState {
    fn new(configured: bool) -> Self {
        Self {
            configured,
            authorized: true,
            available: true,
            rate_limit_expires_at: None,
            consecutive_failures: 0,
            last_error: None,
        }
    }

    /// Whether an API key was supplied for this provider.
    pub fn configured(&self) -> bool {
        self.configured
    }

    /// False after the first permanent auth failure; never recovers.
    pub fn authorized(&self) -> bool {
        self.authorized
    }

    /// The stored availability flag, without lazy-recovery evaluation.
    /// Use [`ProviderSession::is_available`] for the authoritative read.
    pub fn available(&self) -> bool {
        self.available
    }

    pub fn rate_limit_expires_at(&self) -> Option<DateTime<Utc>> {
        self.rate_limit_expires_at
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Operator-facing status for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProviderStatus {
    Ready,
    NotConfigured,
    Unauthorized,
    RateLimited {
        /// Whole seconds until the cooldown expires.
        remaining_secs: i64,
    },
}

/// Per-provider health for one enrichment session.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    states: [ProviderState; 3],
    started_at: DateTime<Utc>,
    cooldown: Duration,
}

impl ProviderSession {
    /// Create a session from the configured credentials.
    ///
    /// Each provider starts authorized and available; `configured` is true
    /// when a non-empty API key was supplied. Keys are read once here;
    /// supplying a key mid-batch means starting a new session.
    pub fn new(credentials: &Credentials) -> Self {
        Self::new_at(credentials, Utc::now())
    }

    /// Create a session with an explicit start time.
    pub fn new_at(credentials: &Credentials, now: DateTime<Utc>) -> Self {
        let configured =
            |provider| credentials.key_for(provider).is_some_and(|k| !k.trim().is_empty());
        Self {
            states: Provider::ALL.map(|p| ProviderState::new(configured(p))),
            started_at: now,
            cooldown: Duration::milliseconds(DEFAULT_COOLDOWN_MS),
        }
    }

    /// Override the rate-limit cooldown (default 60 000 ms).
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// The raw health record for a provider.
    pub fn state(&self, provider: Provider) -> &ProviderState {
        &self.states[provider as usize]
    }

    fn state_mut(&mut self, provider: Provider) -> &mut ProviderState {
        &mut self.states[provider as usize]
    }

    /// Record a successful call: resets the failure counter and clears the
    /// stored diagnostic.
    pub fn record_success(&mut self, provider: Provider) {
        let state = self.state_mut(provider);
        state.consecutive_failures = 0;
        state.last_error = None;
    }

    /// Classify a failed call and apply its state transition.
    pub fn record_failure(&mut self, provider: Provider, error: &CallError) -> FailureKind {
        self.record_failure_at(provider, error, Utc::now())
    }

    /// [`Self::record_failure`] with an explicit current time.
    pub fn record_failure_at(
        &mut self,
        provider: Provider,
        error: &CallError,
        now: DateTime<Utc>,
    ) -> FailureKind {
        let kind = classify(error);
        let cooldown = self.cooldown;
        let state = self.state_mut(provider);

        match kind {
            FailureKind::AuthError => {
                // Terminal for the session
                state.authorized = false;
                state.last_error = Some(error.render());
                tracing::warn!(
                    provider = provider.as_str(),
                    error = %error.render(),
                    "provider unauthorized for the rest of the session"
                );
            }
            FailureKind::RateLimited => {
                state.available = false;
                state.rate_limit_expires_at = Some(now + cooldown);
                state.last_error = Some(error.render());
                tracing::debug!(
                    provider = provider.as_str(),
                    cooldown_ms = cooldown.num_milliseconds(),
                    "provider rate-limited, pausing"
                );
            }
            // Record-level problem or normal business outcome: provider
            // health is untouched.
            FailureKind::MissingInput | FailureKind::NoCandidates => {}
            FailureKind::Error => {
                state.consecutive_failures += 1;
                state.last_error = Some(error.render());
            }
        }

        kind
    }

    /// Whether the provider is currently available, applying lazy cooldown
    /// recovery: the first read after expiry flips the flag back and clears
    /// the stored expiry.
    pub fn is_available(&mut self, provider: Provider) -> bool {
        self.is_available_at(provider, Utc::now())
    }

    /// [`Self::is_available`] with an explicit current time.
    pub fn is_available_at(&mut self, provider: Provider, now: DateTime<Utc>) -> bool {
        let state = self.state_mut(provider);
        if !state.available
            && let Some(expires_at) = state.rate_limit_expires_at
            && now >= expires_at
        {
            state.available = true;
            state.rate_limit_expires_at = None;
            tracing::debug!(provider = provider.as_str(), "cooldown expired, provider available");
        }
        state.available
    }

    /// Configured AND authorized AND available. The availability read
    /// performs lazy recovery.
    pub fn is_ready(&mut self, provider: Provider) -> bool {
        self.is_ready_at(provider, Utc::now())
    }

    /// [`Self::is_ready`] with an explicit current time.
    pub fn is_ready_at(&mut self, provider: Provider, now: DateTime<Utc>) -> bool {
        let available = self.is_available_at(provider, now);
        let state = self.state(provider);
        state.configured && state.authorized && available
    }

    /// Operator-facing status for one provider.
    pub fn status(&mut self, provider: Provider) -> ProviderStatus {
        self.status_at(provider, Utc::now())
    }

    /// [`Self::status`] with an explicit current time.
    pub fn status_at(&mut self, provider: Provider, now: DateTime<Utc>) -> ProviderStatus {
        let available = self.is_available_at(provider, now);
        let state = self.state(provider);
        if !state.configured {
            ProviderStatus::NotConfigured
        } else if !state.authorized {
            ProviderStatus::Unauthorized
        } else if !available {
            let remaining_secs = state
                .rate_limit_expires_at
                .map(|expires_at| (expires_at - now).num_seconds().max(0))
                .unwrap_or(0);
            ProviderStatus::RateLimited { remaining_secs }
        } else {
            ProviderStatus::Ready
        }
    }

    /// Statuses for all providers, in declaration order.
    pub fn statuses(&mut self) -> Vec<(Provider, ProviderStatus)> {
        self.statuses_at(Utc::now())
    }

    /// [`Self::statuses`] with an explicit current time.
    pub fn statuses_at(&mut self, now: DateTime<Utc>) -> Vec<(Provider, ProviderStatus)> {
        Provider::ALL
            .into_iter()
            .map(|provider| (provider, self.status_at(provider, now)))
            .collect()
    }
}
