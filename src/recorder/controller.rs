use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::{info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    config::RecorderConfig,
    models::{SleepSession, UserLedger},
    motion::{MotionSource, SamplerController},
    rewards,
    store::Store,
};

use super::{RecorderState, RecorderStatus};

/// Store key holding the JSON array of completed sessions.
pub const SLEEP_DATA_KEY: &str = "sleepData";
/// Store key holding the user ledger record.
pub const USER_DATA_KEY: &str = "userData";

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecorderSnapshot {
    pub status: RecorderStatus,
    pub started_at: Option<i64>,
    pub sample_count: usize,
    pub ledger: UserLedger,
    pub can_claim: bool,
    pub pending_wallet_request: bool,
}

/// What `stop_tracking` hands back: the completed session and whether it
/// tripped the low-motion check.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StopOutcome {
    pub session: SleepSession,
    pub low_motion_anomaly: bool,
}

/// Owns all recording and ledger state. Every mutation funnels through this
/// controller, persists before committing to memory, and leaves the
/// in-memory state untouched when the store rejects the write.
#[derive(Clone)]
pub struct RecorderController {
    state: Arc<Mutex<RecorderState>>,
    ledger: Arc<Mutex<UserLedger>>,
    sessions: Arc<Mutex<Vec<SleepSession>>>,
    last_session: Arc<Mutex<Option<SleepSession>>>,
    pending_wallet_request: Arc<Mutex<bool>>,
    sampler: Arc<Mutex<SamplerController>>,
    source: Arc<dyn MotionSource>,
    store: Store,
    config: RecorderConfig,
}

impl RecorderController {
    pub fn new(store: Store, source: Arc<dyn MotionSource>, config: RecorderConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(RecorderState::new())),
            ledger: Arc::new(Mutex::new(UserLedger::default())),
            sessions: Arc::new(Mutex::new(Vec::new())),
            last_session: Arc::new(Mutex::new(None)),
            pending_wallet_request: Arc::new(Mutex::new(false)),
            sampler: Arc::new(Mutex::new(SamplerController::new())),
            source,
            store,
            config,
        }
    }

    /// Load persisted state into memory. Writes the default ledger back when
    /// no record exists yet, so later loads always find one.
    pub async fn load(&self) -> Result<()> {
        let ledger = match self
            .store
            .get_json::<UserLedger>(USER_DATA_KEY)
            .await
            .context("failed to load user ledger")?
        {
            Some(stored) => stored,
            None => {
                let defaults = UserLedger::default();
                self.store
                    .put_json(USER_DATA_KEY, &defaults)
                    .await
                    .context("failed to seed default user ledger")?;
                defaults
            }
        };

        let sessions = self
            .store
            .get_json::<Vec<SleepSession>>(SLEEP_DATA_KEY)
            .await
            .context("failed to load sleep sessions")?
            .unwrap_or_default();

        info!("loaded ledger and {} sleep sessions", sessions.len());
        *self.ledger.lock().await = ledger;
        *self.sessions.lock().await = sessions;
        Ok(())
    }

    pub async fn start_tracking(&self) -> Result<RecorderSnapshot> {
        let started_at = Utc::now().timestamp_millis();

        {
            let mut state = self.state.lock().await;
            if state.status != RecorderStatus::Idle {
                bail!("tracking already active");
            }
            state.begin(started_at);
        }
        *self.last_session.lock().await = None;

        self.sampler
            .lock()
            .await
            .start_sampling(
                self.source.clone(),
                self.config.sample_interval(),
                self.state.clone(),
            )
            .await?;

        info!("sleep tracking started");
        Ok(self.snapshot().await)
    }

    pub async fn stop_tracking(&self) -> Result<StopOutcome> {
        let end_time = Utc::now().timestamp_millis();

        let session = {
            let mut state = self.state.lock().await;
            if state.status != RecorderStatus::Recording {
                bail!("no active session to stop");
            }
            let start_time = state
                .started_at
                .ok_or_else(|| anyhow!("recording state missing start time"))?;
            let samples = std::mem::take(&mut state.samples);
            state.reset();

            SleepSession {
                start_time,
                end_time,
                duration: end_time - start_time,
                movement_data: samples,
            }
        };

        // Teardown happens with the transition; anything the source delivers
        // from here on belongs to the next session and is dropped by the
        // status check in the sampling loop.
        self.sampler.lock().await.stop_sampling().await?;

        let total_movement = session.total_movement();
        let low_motion_anomaly = self.config.is_low_motion(session.duration, total_movement);
        if low_motion_anomaly {
            warn!(
                "session flagged for review: {} ms with total movement {:.3}",
                session.duration, total_movement
            );
            *self.pending_wallet_request.lock().await = true;
        }

        self.append_session(session.clone()).await?;
        *self.last_session.lock().await = Some(session.clone());
        self.update_streak().await?;

        info!(
            "sleep tracking stopped after {} ms ({} samples)",
            session.duration,
            session.movement_data.len()
        );
        Ok(StopOutcome {
            session,
            low_motion_anomaly,
        })
    }

    /// Claim today's tokens. Returns the amount granted, or `None` when the
    /// claim is not currently permitted.
    pub async fn claim_tokens(&self) -> Result<Option<u64>> {
        let mut ledger = self.ledger.lock().await;
        let mut updated = ledger.clone();
        let Some(amount) = rewards::apply_claim(&mut updated, rewards::today_local()) else {
            return Ok(None);
        };

        self.store
            .put_json(USER_DATA_KEY, &updated)
            .await
            .context("failed to persist user ledger")?;
        *ledger = updated;

        info!("claimed {amount} tokens (streak {})", ledger.streak);
        Ok(Some(amount))
    }

    pub async fn toggle_testing_mode(&self) -> Result<bool> {
        let mut ledger = self.ledger.lock().await;
        let mut updated = ledger.clone();
        updated.testing_mode = !updated.testing_mode;

        self.store
            .put_json(USER_DATA_KEY, &updated)
            .await
            .context("failed to persist user ledger")?;
        let enabled = updated.testing_mode;
        *ledger = updated;

        info!(
            "testing mode {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(enabled)
    }

    /// Store a wallet address on the ledger and clear the pending request
    /// raised by a flagged session.
    pub async fn save_wallet_address(&self, address: String) -> Result<()> {
        let mut ledger = self.ledger.lock().await;
        let mut updated = ledger.clone();
        updated.wallet_address = Some(address);

        self.store
            .put_json(USER_DATA_KEY, &updated)
            .await
            .context("failed to persist user ledger")?;
        *ledger = updated;
        *self.pending_wallet_request.lock().await = false;
        Ok(())
    }

    /// Clear persisted session history and restore the ledger defaults.
    /// Safe to call repeatedly; recording state is left alone.
    pub async fn reset(&self) -> Result<()> {
        self.store
            .remove_many(&[SLEEP_DATA_KEY, USER_DATA_KEY])
            .await
            .context("failed to clear persisted state")?;

        let defaults = UserLedger::default();
        self.store
            .put_json(USER_DATA_KEY, &defaults)
            .await
            .context("failed to seed default user ledger")?;

        *self.ledger.lock().await = defaults;
        self.sessions.lock().await.clear();
        *self.last_session.lock().await = None;
        *self.pending_wallet_request.lock().await = false;

        info!("cleared all sessions and reset the ledger");
        Ok(())
    }

    pub async fn snapshot(&self) -> RecorderSnapshot {
        let state = self.state.lock().await;
        let ledger = self.ledger.lock().await;
        RecorderSnapshot {
            status: state.status,
            started_at: state.started_at,
            sample_count: state.samples.len(),
            can_claim: rewards::can_claim(&ledger, rewards::today_local()),
            pending_wallet_request: *self.pending_wallet_request.lock().await,
            ledger: ledger.clone(),
        }
    }

    pub async fn is_tracking(&self) -> bool {
        self.state.lock().await.status == RecorderStatus::Recording
    }

    pub async fn can_claim_tokens(&self) -> bool {
        rewards::can_claim(&*self.ledger.lock().await, rewards::today_local())
    }

    pub async fn ledger(&self) -> UserLedger {
        self.ledger.lock().await.clone()
    }

    /// Completed sessions, newest first.
    pub async fn sessions(&self) -> Vec<SleepSession> {
        let mut sessions = self.sessions.lock().await.clone();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    /// The most recently completed session, cleared when a new recording
    /// starts.
    pub async fn last_session(&self) -> Option<SleepSession> {
        self.last_session.lock().await.clone()
    }

    pub async fn pending_wallet_request(&self) -> bool {
        *self.pending_wallet_request.lock().await
    }

    async fn append_session(&self, session: SleepSession) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        let mut updated = sessions.clone();
        updated.push(session);

        self.store
            .put_json(SLEEP_DATA_KEY, &updated)
            .await
            .context("failed to persist sleep sessions")?;
        *sessions = updated;
        Ok(())
    }

    async fn update_streak(&self) -> Result<()> {
        let mut ledger = self.ledger.lock().await;
        let mut updated = ledger.clone();
        if rewards::record_sleep_day(&mut updated, rewards::today_local()) {
            self.store
                .put_json(USER_DATA_KEY, &updated)
                .await
                .context("failed to persist user ledger")?;
            *ledger = updated;
        }
        Ok(())
    }
}
