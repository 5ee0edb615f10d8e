use tracing::debug;

use crate::model::{Booking, BookingRequest, IdempotencyState};
use crate::observability;

use super::{Engine, EngineError};

/// Outcome of claiming an idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Begin {
    /// No record existed; the caller now owns the key and must run the
    /// operation and `complete` it.
    Fresh,
    /// Another execution holds the key.
    InProgress,
    /// The operation already ran; replay the stored response verbatim.
    Completed { code: u16, body: String },
}

/// Result of an idempotent create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateReply {
    Created(Booking),
    /// Cached response from an earlier execution with the same key. The
    /// code/body pair may describe a success or a failure.
    Replayed { code: u16, body: String },
}

impl Engine {
    /// Claim `key`. Exactly one caller ever observes `Fresh` for a given
    /// key; concurrent losers observe `InProgress`, later callers observe
    /// `Completed` once the outcome is stored.
    pub async fn begin(&self, key: &str) -> Result<Begin, EngineError> {
        if let Some(record) = self.idempotency.get(key).await? {
            return Ok(match record.state {
                IdempotencyState::Locked => Begin::InProgress,
                IdempotencyState::Completed => Begin::Completed {
                    code: record.response_code.unwrap_or(500),
                    body: record.response_body.unwrap_or_default(),
                },
            });
        }
        if self.idempotency.try_create_lock(key, self.now()).await? {
            Ok(Begin::Fresh)
        } else {
            // Lost the insert race to a concurrent request with the same key.
            Ok(Begin::InProgress)
        }
    }

    /// Store the outcome for `key` so later retries replay it.
    pub async fn complete(&self, key: &str, code: u16, body: String) -> Result<(), EngineError> {
        self.idempotency.complete(key, code, body, self.now()).await
    }

    /// The idempotency-coordinated create path. Failures are cached too:
    /// retrying a failed request with the same key replays the same failure
    /// instead of re-running the booking logic.
    pub async fn create_booking_with_key(
        &self,
        key: &str,
        req: &BookingRequest,
    ) -> Result<CreateReply, EngineError> {
        match self.begin(key).await? {
            Begin::InProgress => Err(EngineError::RequestInProgress),
            Begin::Completed { code, body } => {
                metrics::counter!(observability::IDEMPOTENT_REPLAYS_TOTAL).increment(1);
                debug!(key, code, "replaying cached idempotent response");
                Ok(CreateReply::Replayed { code, body })
            }
            Begin::Fresh => match self.create_booking(req).await {
                Ok(booking) => {
                    let body = serde_json::to_string(&booking)
                        .map_err(|e| EngineError::Internal(e.to_string()))?;
                    self.complete(key, 200, body).await?;
                    Ok(CreateReply::Created(booking))
                }
                Err(err) => {
                    let body =
                        serde_json::json!({ "error": err.to_string() }).to_string();
                    self.complete(key, err.status_code(), body).await?;
                    Err(err)
                }
            },
        }
    }

    /// Drop completed idempotency records past the retention window.
    pub async fn purge_idempotency_records(&self) -> Result<usize, EngineError> {
        let cutoff = self.now() - self.config().idempotency_ttl;
        let purged = self.idempotency.purge_completed_before(cutoff).await?;
        if purged > 0 {
            metrics::counter!(observability::IDEMPOTENCY_RECORDS_PURGED_TOTAL)
                .increment(purged as u64);
        }
        Ok(purged)
    }
}
