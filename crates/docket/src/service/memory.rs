//! In-memory collaborator implementations.
//!
//! [`MemoryLedger`] keeps balances and the attempt trail in one structure,
//! mirroring how a real deployment backs both the credit store and the rate
//! limiter with a single table. A `parking_lot` mutex serializes updates,
//! which gives `record_attempt` its required atomicity in-process.

use crate::service::traits::{CreditStore, Identity, IdentityProvider, RateLimiter};
use crate::types::AttemptRecord;
use crate::{DocketError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Account {
    credits: i64,
    attempts: Vec<(Instant, AttemptRecord)>,
}

/// Combined in-memory credit store, audit trail, and rate limiter.
///
/// # Example
///
/// ```rust
/// use docket::service::memory::MemoryLedger;
/// use docket::service::traits::{CreditStore, Identity};
///
/// # tokio_test::block_on(async {
/// let ledger = MemoryLedger::new(3);
/// let balance = ledger.balance(&Identity::new("user")).await?;
/// assert_eq!(balance, 3);
/// # Ok::<(), docket::DocketError>(())
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryLedger {
    initial_credits: i64,
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryLedger {
    /// Every unseen identity starts with `initial_credits`.
    pub fn new(initial_credits: i64) -> Self {
        Self {
            initial_credits,
            accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Set an explicit balance for one identity.
    pub fn set_credits(&self, identity: &Identity, credits: i64) {
        let mut accounts = self.accounts.lock();
        let account = accounts.entry(identity.id.clone()).or_insert_with(|| Account {
            credits,
            attempts: Vec::new(),
        });
        account.credits = credits;
    }

    /// Number of recorded attempts for an identity, all time.
    pub fn attempt_count(&self, identity: &Identity) -> usize {
        self.accounts
            .lock()
            .get(&identity.id)
            .map(|account| account.attempts.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CreditStore for MemoryLedger {
    async fn balance(&self, identity: &Identity) -> Result<i64> {
        let accounts = self.accounts.lock();
        Ok(accounts
            .get(&identity.id)
            .map(|account| account.credits)
            .unwrap_or(self.initial_credits))
    }

    async fn record_attempt(&self, identity: &Identity, record: &AttemptRecord) -> Result<i64> {
        let mut accounts = self.accounts.lock();
        let account = accounts.entry(identity.id.clone()).or_insert_with(|| Account {
            credits: self.initial_credits,
            attempts: Vec::new(),
        });

        if record.success {
            if account.credits <= 0 {
                return Err(DocketError::InsufficientCredits {
                    remaining: account.credits,
                });
            }
            account.credits -= 1;
        }
        account.attempts.push((Instant::now(), record.clone()));
        Ok(account.credits)
    }
}

#[async_trait]
impl RateLimiter for MemoryLedger {
    async fn count_recent_attempts(&self, identity: &Identity, window: Duration) -> Result<u32> {
        let accounts = self.accounts.lock();
        let count = accounts
            .get(&identity.id)
            .map(|account| {
                account
                    .attempts
                    .iter()
                    .filter(|(at, _)| at.elapsed() <= window)
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u32)
    }
}

/// Identity provider backed by a static token table.
///
/// Suitable for single-tenant deployments and tests; anything multi-tenant
/// belongs behind a real [`IdentityProvider`].
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn verify(&self, credential: &str) -> Result<Identity> {
        self.tokens
            .get(credential)
            .cloned()
            .ok_or(DocketError::Unauthenticated)
    }
}
