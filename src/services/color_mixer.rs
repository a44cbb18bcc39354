//! Worker-isolated color mixer service.
//!
//! The session runs on a dedicated `color-mixer` thread. Callers talk to it
//! through a cloneable [`ColorMixerHandle`]: each call is an [`Envelope`]
//! on a bounded queue, answered on a oneshot channel. Requests are handled
//! one at a time, in arrival order.
//!
//! [`ResilientColorMixer`] wraps a handle and, when the worker is gone,
//! starts a new one and replays the last paint set and background before
//! retrying the call once.

use crate::error::ServiceError;
use crate::models::WorkerConfig;
use crate::services::session::ColorMixerSession;
use pigment_mix::{Consistency, Paint, PaintMix, PaintSet, SearchOptions, SimilarColor, Srgb};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};

/// Worker start-up settings
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub background: Srgb,
    pub queue_capacity: usize,
    pub memo_capacity: usize,
}

impl WorkerOptions {
    pub fn from_config(background: Srgb, config: &WorkerConfig) -> Self {
        Self {
            background,
            queue_capacity: config.queue_capacity.max(1),
            memo_capacity: config.memo_capacity,
        }
    }
}

/// A request to the session
#[derive(Debug)]
pub enum Command {
    SetPaintSet(PaintSet),
    SetBackground(String),
    FindSimilarColors {
        target: String,
        is_glaze: bool,
        options: SearchOptions,
    },
    MixPaints {
        paints: Vec<Arc<Paint>>,
        fractions: Vec<u8>,
        background: String,
    },
    Mix {
        paints: Vec<Arc<Paint>>,
        fractions: Vec<u8>,
        is_glaze: bool,
        consistency: Consistency,
        background: String,
    },
    /// Stop the worker after answering
    Shutdown,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::SetPaintSet(_) => "set_paint_set",
            Command::SetBackground(_) => "set_background",
            Command::FindSimilarColors { .. } => "find_similar_colors",
            Command::MixPaints { .. } => "mix_paints",
            Command::Mix { .. } => "mix",
            Command::Shutdown => "shutdown",
        }
    }
}

/// The session's answer to a [`Command`]
#[derive(Debug)]
pub enum Reply {
    Done,
    SimilarColors(Vec<SimilarColor>),
    PaintMixes(Vec<PaintMix>),
    PaintMix(PaintMix),
}

/// A command with its correlation id and reply channel
#[derive(Debug)]
pub struct Envelope {
    pub request_id: u64,
    pub command: Command,
    pub reply: oneshot::Sender<Result<Reply, ServiceError>>,
}

/// Cloneable client of one color mixer worker
#[derive(Debug, Clone)]
pub struct ColorMixerHandle {
    sender: mpsc::Sender<Envelope>,
    next_id: Arc<AtomicU64>,
    generation: u64,
}

impl ColorMixerHandle {
    /// Start a worker thread with a fresh session
    pub fn spawn(options: &WorkerOptions) -> std::io::Result<Self> {
        Self::spawn_generation(options, 0, Arc::new(AtomicU64::new(1)))
    }

    fn spawn_generation(
        options: &WorkerOptions,
        generation: u64,
        next_id: Arc<AtomicU64>,
    ) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel(options.queue_capacity.max(1));
        let session = ColorMixerSession::new(options.background, options.memo_capacity);

        std::thread::Builder::new()
            .name("color-mixer".to_string())
            .spawn(move || run_worker(receiver, session, generation))?;

        tracing::info!(generation, "Color mixer worker started");
        Ok(Self {
            sender,
            next_id,
            generation,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the worker has stopped taking requests
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn call(&self, command: Command) -> Result<Reply, ServiceError> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope {
                request_id,
                command,
                reply,
            })
            .await
            .map_err(|_| ServiceError::WorkerUnavailable)?;
        response.await.map_err(|_| ServiceError::WorkerUnavailable)?
    }

    pub async fn set_paint_set(&self, paint_set: PaintSet) -> Result<(), ServiceError> {
        self.call(Command::SetPaintSet(paint_set)).await.map(|_| ())
    }

    pub async fn set_background(&self, color_hex: &str) -> Result<(), ServiceError> {
        self.call(Command::SetBackground(color_hex.to_string()))
            .await
            .map(|_| ())
    }

    pub async fn find_similar_colors(
        &self,
        target_hex: &str,
        is_glaze: bool,
        options: SearchOptions,
    ) -> Result<Vec<SimilarColor>, ServiceError> {
        let command = Command::FindSimilarColors {
            target: target_hex.to_string(),
            is_glaze,
            options,
        };
        match self.call(command).await? {
            Reply::SimilarColors(results) => Ok(results),
            _ => Err(ServiceError::WorkerUnavailable),
        }
    }

    pub async fn mix_paints(
        &self,
        paints: Vec<Arc<Paint>>,
        fractions: Vec<u8>,
        background_hex: &str,
    ) -> Result<Vec<PaintMix>, ServiceError> {
        let command = Command::MixPaints {
            paints,
            fractions,
            background: background_hex.to_string(),
        };
        match self.call(command).await? {
            Reply::PaintMixes(mixes) => Ok(mixes),
            _ => Err(ServiceError::WorkerUnavailable),
        }
    }

    pub async fn mix(
        &self,
        paints: Vec<Arc<Paint>>,
        fractions: Vec<u8>,
        is_glaze: bool,
        consistency: Consistency,
        background_hex: &str,
    ) -> Result<PaintMix, ServiceError> {
        let command = Command::Mix {
            paints,
            fractions,
            is_glaze,
            consistency,
            background: background_hex.to_string(),
        };
        match self.call(command).await? {
            Reply::PaintMix(mix) => Ok(mix),
            _ => Err(ServiceError::WorkerUnavailable),
        }
    }

    /// Ask the worker to stop. Later calls fail with `WorkerUnavailable`.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.call(Command::Shutdown).await.map(|_| ())
    }
}

fn run_worker(mut receiver: mpsc::Receiver<Envelope>, mut session: ColorMixerSession, generation: u64) {
    while let Some(envelope) = receiver.blocking_recv() {
        let span = tracing::debug_span!(
            "request",
            id = envelope.request_id,
            command = envelope.command.name(),
            generation
        );
        let _enter = span.enter();

        let stop = matches!(envelope.command, Command::Shutdown);
        let result = handle(&mut session, envelope.command);
        if let Err(ref e) = result {
            tracing::debug!(error = %e, "Request failed");
        }
        if envelope.reply.send(result).is_err() {
            tracing::debug!("Caller went away before the reply");
        }
        if stop {
            break;
        }
    }
    tracing::info!(generation, "Color mixer worker stopped");
}

fn handle(session: &mut ColorMixerSession, command: Command) -> Result<Reply, ServiceError> {
    match command {
        Command::SetPaintSet(paint_set) => {
            session.set_paint_set(paint_set);
            Ok(Reply::Done)
        }
        Command::SetBackground(color) => session.set_background(&color).map(|_| Reply::Done),
        Command::FindSimilarColors {
            target,
            is_glaze,
            options,
        } => session
            .find_similar_colors(&target, is_glaze, &options)
            .map(Reply::SimilarColors),
        Command::MixPaints {
            paints,
            fractions,
            background,
        } => session
            .mix_paints(&paints, &fractions, &background)
            .map(Reply::PaintMixes),
        Command::Mix {
            paints,
            fractions,
            is_glaze,
            consistency,
            background,
        } => session
            .mix(&paints, &fractions, is_glaze, consistency, &background)
            .map(Reply::PaintMix),
        Command::Shutdown => Ok(Reply::Done),
    }
}

#[derive(Debug, Default, Clone)]
struct ReplayState {
    paint_set: Option<PaintSet>,
    background: Option<String>,
}

/// A color mixer that survives the loss of its worker.
///
/// Locks are always taken in the order `state`, then `handle`. Setters hold
/// `state` across the worker call so the replay state always matches what
/// the live worker was told.
pub struct ResilientColorMixer {
    options: WorkerOptions,
    handle: RwLock<ColorMixerHandle>,
    state: Mutex<ReplayState>,
    next_id: Arc<AtomicU64>,
    restarts: AtomicU64,
}

impl ResilientColorMixer {
    pub fn spawn(options: WorkerOptions) -> std::io::Result<Self> {
        let next_id = Arc::new(AtomicU64::new(1));
        let handle = ColorMixerHandle::spawn_generation(&options, 0, next_id.clone())?;
        Ok(Self {
            options,
            handle: RwLock::new(handle),
            state: Mutex::new(ReplayState::default()),
            next_id,
            restarts: AtomicU64::new(0),
        })
    }

    /// How many times the worker has been replaced
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::Relaxed)
    }

    /// The last paint set that was set successfully
    pub async fn paint_set(&self) -> Option<PaintSet> {
        self.state.lock().await.paint_set.clone()
    }

    /// The last background that was set successfully, as given
    pub async fn background(&self) -> String {
        self.state
            .lock()
            .await
            .background
            .clone()
            .unwrap_or_else(|| self.options.background.to_hex())
    }

    async fn current(&self) -> ColorMixerHandle {
        self.handle.read().await.clone()
    }

    /// Replace the worker of `generation`, unless that already happened.
    async fn respawn(&self, generation: u64) -> Result<(), ServiceError> {
        let state = self.state.lock().await;
        self.respawn_locked(&state, generation).await
    }

    /// Like [`respawn`](Self::respawn), with the state lock already held.
    async fn respawn_locked(&self, state: &ReplayState, generation: u64) -> Result<(), ServiceError> {
        let mut handle = self.handle.write().await;
        if handle.generation() != generation {
            return Ok(());
        }

        tracing::warn!(generation, "Color mixer worker unavailable, restarting");
        let replacement =
            ColorMixerHandle::spawn_generation(&self.options, generation + 1, self.next_id.clone())
                .map_err(|e| {
                    tracing::warn!(error = %e, "Failed to start color mixer worker");
                    ServiceError::WorkerUnavailable
                })?;

        if let Some(paint_set) = &state.paint_set {
            replacement.set_paint_set(paint_set.clone()).await?;
        }
        if let Some(background) = &state.background {
            replacement.set_background(background).await?;
        }

        *handle = replacement;
        self.restarts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn with_retry<T, F, Fut>(&self, call: F) -> Result<T, ServiceError>
    where
        F: Fn(ColorMixerHandle) -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let handle = self.current().await;
        let generation = handle.generation();
        match call(handle).await {
            Err(ServiceError::WorkerUnavailable) => {
                self.respawn(generation).await?;
                call(self.current().await).await
            }
            other => other,
        }
    }

    /// [`with_retry`](Self::with_retry) for callers holding the state lock
    async fn with_retry_locked<T, F, Fut>(&self, state: &ReplayState, call: F) -> Result<T, ServiceError>
    where
        F: Fn(ColorMixerHandle) -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let handle = self.current().await;
        let generation = handle.generation();
        match call(handle).await {
            Err(ServiceError::WorkerUnavailable) => {
                self.respawn_locked(state, generation).await?;
                call(self.current().await).await
            }
            other => other,
        }
    }

    pub async fn set_paint_set(&self, paint_set: PaintSet) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        self.with_retry_locked(&state, |h| {
            let paint_set = paint_set.clone();
            async move { h.set_paint_set(paint_set).await }
        })
        .await?;
        state.paint_set = Some(paint_set);
        Ok(())
    }

    pub async fn set_background(&self, color_hex: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        self.with_retry_locked(&state, |h| async move { h.set_background(color_hex).await })
            .await?;
        state.background = Some(color_hex.to_string());
        Ok(())
    }

    pub async fn find_similar_colors(
        &self,
        target_hex: &str,
        is_glaze: bool,
        options: SearchOptions,
    ) -> Result<Vec<SimilarColor>, ServiceError> {
        self.with_retry(|h| {
            let options = options.clone();
            async move { h.find_similar_colors(target_hex, is_glaze, options).await }
        })
        .await
    }

    pub async fn mix_paints(
        &self,
        paints: Vec<Arc<Paint>>,
        fractions: Vec<u8>,
        background_hex: &str,
    ) -> Result<Vec<PaintMix>, ServiceError> {
        self.with_retry(|h| {
            let paints = paints.clone();
            let fractions = fractions.clone();
            async move { h.mix_paints(paints, fractions, background_hex).await }
        })
        .await
    }

    pub async fn mix(
        &self,
        paints: Vec<Arc<Paint>>,
        fractions: Vec<u8>,
        is_glaze: bool,
        consistency: Consistency,
        background_hex: &str,
    ) -> Result<PaintMix, ServiceError> {
        self.with_retry(|h| {
            let paints = paints.clone();
            let fractions = fractions.clone();
            async move {
                h.mix(paints, fractions, is_glaze, consistency, background_hex)
                    .await
            }
        })
        .await
    }

    /// Stop the current worker. The next call starts a new one.
    pub async fn shutdown_worker(&self) -> Result<(), ServiceError> {
        self.current().await.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigment_mix::{Medium, OFF_WHITE_HEX};

    fn options() -> WorkerOptions {
        WorkerOptions {
            background: OFF_WHITE_HEX.parse().unwrap(),
            queue_capacity: 4,
            memo_capacity: 8,
        }
    }

    fn primaries() -> PaintSet {
        let paints = [(1, "#FF0000"), (2, "#FFFF00"), (3, "#0000FF")]
            .into_iter()
            .map(|(id, hex)| Paint::new("acme", id, hex, Medium::Oil, hex.parse().unwrap()))
            .collect();
        PaintSet::new(Medium::Oil, paints).unwrap()
    }

    #[tokio::test]
    async fn test_handle_round_trip() {
        let handle = ColorMixerHandle::spawn(&options()).unwrap();
        handle.set_paint_set(primaries()).await.unwrap();
        let results = handle
            .find_similar_colors("#FFFF00", false, SearchOptions::default())
            .await
            .unwrap();
        assert!(results[0].delta_e < 1e-6);
    }

    #[tokio::test]
    async fn test_errors_cross_the_boundary() {
        let handle = ColorMixerHandle::spawn(&options()).unwrap();
        let err = handle.set_background("nope").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_color");
        // The worker keeps serving after an error
        handle.set_background("#FFFFFF").await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_makes_handle_unavailable() {
        let handle = ColorMixerHandle::spawn(&options()).unwrap();
        handle.shutdown().await.unwrap();
        let err = handle.set_background("#FFFFFF").await.unwrap_err();
        assert!(matches!(err, ServiceError::WorkerUnavailable));
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        let handle = ColorMixerHandle::spawn(&options()).unwrap();
        handle.set_paint_set(primaries()).await.unwrap();

        let mut tasks = Vec::new();
        for hex in ["#FF0000", "#FFFF00", "#0000FF", "#FF8000"] {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle
                    .find_similar_colors(hex, false, SearchOptions::default())
                    .await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
    }

    #[tokio::test]
    async fn test_resilient_mixer_replays_state() {
        let mixer = ResilientColorMixer::spawn(options()).unwrap();
        mixer.set_paint_set(primaries()).await.unwrap();
        mixer.set_background("#3C5AC8").await.unwrap();
        let before = mixer
            .find_similar_colors("#FFD700", true, SearchOptions::default())
            .await
            .unwrap();

        mixer.shutdown_worker().await.unwrap();
        let after = mixer
            .find_similar_colors("#FFD700", true, SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(mixer.restarts(), 1);
        assert_eq!(before, after);
        assert_eq!(mixer.background().await, "#3C5AC8");
        assert_eq!(mixer.paint_set().await.map(|s| s.len()), Some(3));
    }

    #[tokio::test]
    async fn test_failed_set_is_not_replayed() {
        let mixer = ResilientColorMixer::spawn(options()).unwrap();
        assert!(mixer.set_background("bad").await.is_err());
        assert_eq!(mixer.background().await, OFF_WHITE_HEX);
    }

    #[tokio::test]
    async fn test_resilient_mix_after_restart() {
        let mixer = ResilientColorMixer::spawn(options()).unwrap();
        let paints: Vec<_> = primaries().paints()[..2].to_vec();
        mixer.shutdown_worker().await.unwrap();

        let mix = mixer
            .mix(paints, vec![2, 2], true, Consistency::Thick, "#FFFFFF")
            .await
            .unwrap();
        assert_eq!(mixer.restarts(), 1);
        assert!(mix.is_glaze);
        assert_eq!(mix.fractions(), vec![1, 1]);
        assert_eq!(mix.background.to_hex(), "#FFFFFF");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_setters_keep_replay_state_in_step() {
        let mixer = Arc::new(ResilientColorMixer::spawn(options()).unwrap());
        mixer.set_paint_set(primaries()).await.unwrap();
        let search = SearchOptions::new()
            .limit_results(1)
            .tight_search(false)
            .max_delta_e(1000.0);
        let backgrounds = ["#FFFFFF", "#3C5AC8", "#E0C090", "#80A0A0"];

        for round in 0..25 {
            let mut tasks = Vec::new();
            for background in backgrounds {
                let mixer = mixer.clone();
                tasks.push(tokio::spawn(async move {
                    mixer.set_background(background).await
                }));
            }
            if round % 5 == 0 {
                let mixer = mixer.clone();
                tasks.push(tokio::spawn(async move {
                    // A lost worker is replaced from the replay state
                    mixer.shutdown_worker().await.ok();
                    mixer
                        .find_similar_colors("#FF0000", false, SearchOptions::default())
                        .await
                        .map(|_| ())
                }));
            }
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let expected = mixer.background().await;
            let results = mixer
                .find_similar_colors("#FF8000", true, search.clone())
                .await
                .unwrap();
            assert_eq!(results[0].paint_mix.background.to_hex(), expected);
        }
    }
}
