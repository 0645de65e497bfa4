//! Visibility change pipeline.
//!
//! ```text
//! VisibilityChange
//!   ↓
//! 1. Read the collection state for the target (store)
//!   ↓
//! 2. Decide the write-set (pure rule engine)
//!   ↓
//! 3. Commit write-set + preconditions as one conditional write
//!   ↓  (precondition failed → back to 1, bounded)
//! Stored product
//! ```
//!
//! A lost race is never surfaced as a silent overwrite: either the re-decided
//! change commits against fresh state, or the caller sees the rule rejection
//! that fresh state produces (typically `LimitReached`).

use thiserror::Error;
use tracing::{debug, info, warn};

use showcase_core::ProductId;
use showcase_products::{
    apply_visibility_change, Product, RuleViolation, VisibilityChange, WriteSet,
};

use crate::clock::Clock;
use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisibilityError {
    #[error("invalid visibility flag: {0}")]
    InvalidFlag(String),

    #[error("limit reached: {current} of {limit}")]
    LimitReached { current: usize, limit: usize },

    #[error("product not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl VisibilityError {
    pub fn user_message(&self) -> String {
        match self {
            VisibilityError::InvalidFlag(flag) => {
                RuleViolation::InvalidFlag(flag.clone()).user_message()
            }
            VisibilityError::LimitReached { current, limit } => RuleViolation::LimitReached {
                current: *current,
                limit: *limit,
            }
            .user_message(),
            VisibilityError::NotFound => RuleViolation::NotFound.user_message(),
            VisibilityError::StoreUnavailable(_) => {
                "Visibility could not be updated, please retry".to_string()
            }
        }
    }
}

impl From<RuleViolation> for VisibilityError {
    fn from(value: RuleViolation) -> Self {
        match value {
            RuleViolation::InvalidFlag(flag) => VisibilityError::InvalidFlag(flag),
            RuleViolation::LimitReached { current, limit } => {
                VisibilityError::LimitReached { current, limit }
            }
            RuleViolation::NotFound => VisibilityError::NotFound,
        }
    }
}

impl From<StoreError> for VisibilityError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => VisibilityError::NotFound,
            other => VisibilityError::StoreUnavailable(other.to_string()),
        }
    }
}

/// Result of an applied (or no-op) visibility change.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOutcome {
    /// The target product as stored after the change.
    pub product: Product,
    pub write_set: WriteSet,
}

/// Runs visibility changes against a store with bounded optimistic retries.
#[derive(Debug)]
pub struct VisibilityDispatcher<S, C> {
    store: S,
    clock: C,
    max_attempts: usize,
}

impl<S, C> VisibilityDispatcher<S, C> {
    /// `max_attempts` is clamped to at least one.
    pub fn new(store: S, clock: C, max_attempts: usize) -> Self {
        Self {
            store,
            clock,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl<S, C> VisibilityDispatcher<S, C>
where
    S: ProductStore,
    C: Clock,
{
    /// Apply one flag change, cascading whatever the curation rules require.
    pub fn dispatch(&self, change: VisibilityChange) -> Result<VisibilityOutcome, VisibilityError> {
        let mut last_conflict = String::new();

        for attempt in 1..=self.max_attempts {
            let state = self.store.collection_state(change.product_id)?;
            let write_set = match apply_visibility_change(&change, &state) {
                Ok(ws) => ws,
                Err(violation) => {
                    warn!(
                        product_id = %change.product_id,
                        flag = %change.flag,
                        value = change.value,
                        reason = %violation,
                        "visibility change rejected"
                    );
                    return Err(violation.into());
                }
            };

            if write_set.is_noop() {
                debug!(product_id = %change.product_id, flag = %change.flag, "visibility change is a no-op");
                let product = self
                    .store
                    .get(change.product_id)?
                    .ok_or(VisibilityError::NotFound)?;
                return Ok(VisibilityOutcome { product, write_set });
            }

            match self.store.commit(&write_set, self.clock.now()) {
                Ok(product) => {
                    info!(
                        product_id = %change.product_id,
                        flag = %change.flag,
                        value = change.value,
                        writes = write_set.writes().len(),
                        attempt,
                        "visibility change applied"
                    );
                    return Ok(VisibilityOutcome { product, write_set });
                }
                Err(StoreError::PreconditionFailed(reason)) => {
                    warn!(
                        product_id = %change.product_id,
                        attempt,
                        reason = %reason,
                        "visibility commit lost a race, re-deciding"
                    );
                    last_conflict = reason;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(VisibilityError::StoreUnavailable(format!(
            "gave up after {} attempts: {last_conflict}",
            self.max_attempts
        )))
    }

    /// Parse a client-supplied flag name, then dispatch.
    pub fn dispatch_named(
        &self,
        product_id: ProductId,
        flag: &str,
        value: bool,
    ) -> Result<VisibilityOutcome, VisibilityError> {
        self.dispatch(VisibilityChange::parse(product_id, flag, value)?)
    }
}
