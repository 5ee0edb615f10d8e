use chrono::Duration;

/// Engine tunables. Defaults match the domain policy; `from_env` lets a
/// deployment override them without a config file.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// A booking may be cancelled only while `now <= start - cancel_cutoff`.
    pub cancel_cutoff: Duration,
    /// Completed idempotency records older than this are purged.
    pub idempotency_ttl: Duration,
    /// How often the reaper wakes up.
    pub reaper_interval: std::time::Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cancel_cutoff: Duration::hours(1),
            idempotency_ttl: Duration::hours(24),
            reaper_interval: std::time::Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    /// Read overrides from `SLOTWISE_*` environment variables, falling back
    /// to defaults for anything absent or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cancel_cutoff_minutes: i64 = std::env::var("SLOTWISE_CANCEL_CUTOFF_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| defaults.cancel_cutoff.num_minutes());
        let idempotency_ttl_hours: i64 = std::env::var("SLOTWISE_IDEMPOTENCY_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| defaults.idempotency_ttl.num_hours());
        let reaper_interval_secs: u64 = std::env::var("SLOTWISE_REAPER_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.reaper_interval.as_secs());

        Self {
            cancel_cutoff: Duration::minutes(cancel_cutoff_minutes),
            idempotency_ttl: Duration::hours(idempotency_ttl_hours),
            reaper_interval: std::time::Duration::from_secs(reaper_interval_secs),
        }
    }
}
