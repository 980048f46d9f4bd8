//! Per-page widget instances and the tasks that carry out their effects.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::AppError;
use crate::explain::{ExplainRequest, Explainer};
use crate::intake::{update, Effect, FileId, IntakeState, IntakeView, Msg};
use crate::policy::UploadPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Slot {
    intake: IntakeState,
    touched: Instant,
}

/// One widget instance. Nothing is shared between sessions.
pub struct Session {
    id: SessionId,
    slot: Mutex<Slot>,
}

impl Session {
    fn new(id: SessionId, max_files: usize) -> Self {
        Self {
            id,
            slot: Mutex::new(Slot {
                intake: IntakeState::new(max_files),
                touched: Instant::now(),
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current snapshot. Reading counts as activity for idle expiry.
    pub async fn view(&self) -> IntakeView {
        let mut slot = self.slot.lock().await;
        slot.touched = Instant::now();
        slot.intake.view()
    }

    /// How many more files the selection can take.
    pub async fn room(&self) -> usize {
        let slot = self.slot.lock().await;
        slot.intake
            .max_files()
            .saturating_sub(slot.intake.files().len())
    }

    /// Applies `msg` unless `guard` refuses the current state.
    async fn apply_checked<F>(
        &self,
        msg: Msg,
        guard: F,
    ) -> Result<(IntakeView, Vec<Effect>), AppError>
    where
        F: FnOnce(&IntakeState) -> Result<(), AppError>,
    {
        let mut slot = self.slot.lock().await;
        guard(&slot.intake)?;
        slot.touched = Instant::now();
        let current = std::mem::take(&mut slot.intake);
        let (next, effects) = update(current, msg);
        slot.intake = next;
        Ok((slot.intake.view(), effects))
    }

    async fn apply(&self, msg: Msg) -> (IntakeView, Vec<Effect>) {
        let mut slot = self.slot.lock().await;
        let current = std::mem::take(&mut slot.intake);
        let (next, effects) = update(current, msg);
        slot.intake = next;
        (slot.intake.view(), effects)
    }

    /// Advances the cosmetic timer; false once the file is done or gone.
    async fn tick_progress(&self, file_id: FileId) -> bool {
        let mut slot = self.slot.lock().await;
        let current = std::mem::take(&mut slot.intake);
        let (next, _) = update(current, Msg::ProgressTick(file_id));
        slot.intake = next;
        slot.intake.is_tracking(file_id)
    }

    async fn idle_for(&self) -> Duration {
        self.slot.lock().await.touched.elapsed()
    }
}

/// Executes effects emitted by `update` on behalf of a session.
#[derive(Clone)]
struct EffectRunner {
    explainer: Arc<dyn Explainer>,
    policy: Arc<UploadPolicy>,
    progress_interval: Duration,
}

impl EffectRunner {
    fn run(&self, session: &Arc<Session>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartProgress { file_id } => {
                    self.spawn_progress(Arc::clone(session), file_id);
                }
                Effect::RequestExplanation {
                    submission,
                    prompt,
                    file,
                } => {
                    tracing::info!(
                        session = %session.id(),
                        submission,
                        file = %file.name,
                        "explanation requested"
                    );
                    self.spawn_explanation(
                        Arc::clone(session),
                        submission,
                        ExplainRequest::new(prompt, file),
                    );
                }
                Effect::NotifyRemoved { file_id, name } => {
                    tracing::info!(session = %session.id(), %file_id, %name, "removed file");
                }
            }
        }
    }

    fn spawn_progress(&self, session: Arc<Session>, file_id: FileId) {
        let period = self.progress_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !session.tick_progress(file_id).await {
                    break;
                }
            }
        });
    }

    fn spawn_explanation(&self, session: Arc<Session>, submission: u64, request: ExplainRequest) {
        let explainer = Arc::clone(&self.explainer);
        let policy = Arc::clone(&self.policy);
        tokio::spawn(async move {
            let outcome = match policy.check_submission(&request.file) {
                Ok(()) => explainer.explain(request).await,
                Err(err) => Err(err),
            };
            let outcome = outcome.map_err(|err| {
                tracing::warn!(
                    session = %session.id(),
                    submission,
                    error = %err,
                    "explanation failed"
                );
                err.to_string()
            });
            session
                .apply(Msg::ExplanationFinished {
                    submission,
                    outcome,
                })
                .await;
        });
    }
}

/// Registry of live widget instances keyed by [`SessionId`].
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    max_files: usize,
    runner: EffectRunner,
}

impl SessionStore {
    pub fn new(
        policy: Arc<UploadPolicy>,
        explainer: Arc<dyn Explainer>,
        progress_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_files: policy.max_files,
            runner: EffectRunner {
                explainer,
                policy,
                progress_interval,
            },
        }
    }

    pub async fn create(&self) -> (SessionId, IntakeView) {
        let id = SessionId::new();
        let session = Arc::new(Session::new(id, self.max_files));
        let view = session.view().await;
        self.sessions.write().await.insert(id, session);
        tracing::debug!(session = %id, "session created");
        (id, view)
    }

    pub async fn get(&self, id: SessionId) -> Result<Arc<Session>, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }

    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Applies `msg` to a session and starts whatever effects it emits.
    ///
    /// The emitted effects are returned as well so callers can report on them.
    pub async fn dispatch(
        &self,
        id: SessionId,
        msg: Msg,
    ) -> Result<(IntakeView, Vec<Effect>), AppError> {
        self.dispatch_checked(id, msg, |_| Ok(())).await
    }

    pub async fn dispatch_checked<F>(
        &self,
        id: SessionId,
        msg: Msg,
        guard: F,
    ) -> Result<(IntakeView, Vec<Effect>), AppError>
    where
        F: FnOnce(&IntakeState) -> Result<(), AppError>,
    {
        let session = self.get(id).await?;
        let (view, effects) = session.apply_checked(msg, guard).await?;
        self.runner.run(&session, effects.clone());
        Ok((view, effects))
    }

    /// Drops sessions idle for longer than `ttl`; returns how many went.
    pub async fn sweep_expired(&self, ttl: Duration) -> usize {
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();
        let mut expired = Vec::new();
        for session in sessions {
            if session.idle_for().await > ttl {
                expired.push(session.id());
            }
        }

        let mut map = self.sessions.write().await;
        for id in &expired {
            map.remove(id);
        }
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired idle sessions");
        }
        expired.len()
    }
}

pub async fn run_sweeper(store: Arc<SessionStore>, ttl: Duration) {
    let mut ticker = tokio::time::interval(Duration::from_secs(60));
    loop {
        ticker.tick().await;
        store.sweep_expired(ttl).await;
    }
}
