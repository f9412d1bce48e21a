//! Collaborator traits for accounting and identity.
//!
//! Credits, rate limiting, and authentication live in external stores; the
//! pipeline consumes them through these traits. Implementations must be
//! thread-safe (`Send + Sync`), and a credit store must make "record a
//! successful attempt and decrement the balance" atomic so concurrent
//! requests from one identity cannot double-spend.
//!
//! In-memory reference implementations live in [`super::memory`]; they
//! double as test fixtures and as backing for single-process deployments.

use crate::Result;
use crate::types::AttemptRecord;
use async_trait::async_trait;
use std::time::Duration;

/// A verified caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: String,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Verifies caller credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer credential to a verified identity.
    ///
    /// # Errors
    ///
    /// `DocketError::Unauthenticated` when the credential cannot be
    /// verified.
    async fn verify(&self, credential: &str) -> Result<Identity>;
}

/// Usage-credit balance and attempt audit trail.
#[async_trait]
pub trait CreditStore: Send + Sync {
    /// Current credit balance for an identity.
    async fn balance(&self, identity: &Identity) -> Result<i64>;

    /// Record a terminal attempt, returning the remaining balance.
    ///
    /// A successful record deducts one credit atomically with the insert;
    /// non-billable records only append to the audit trail.
    ///
    /// # Errors
    ///
    /// `DocketError::InsufficientCredits` when a billable record would take
    /// the balance below zero.
    async fn record_attempt(&self, identity: &Identity, record: &AttemptRecord) -> Result<i64>;
}

/// Sliding-window attempt counter.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Number of attempts by this identity inside the trailing window.
    async fn count_recent_attempts(&self, identity: &Identity, window: Duration) -> Result<u32>;
}
