//! Tracking loop driving the zone pipeline one frame at a time.
//!
//! The loop owns the perception collaborator and the per-session pipeline
//! state. It has no scheduler of its own: an external driver (render loop,
//! timer, replay, test) calls [`TrackingLoop::tick`] once per frame.
//!
//! ```text
//! Idle --start--> WarmingUp --first valid frame--> Running --stop/cancel--> Stopped
//!   \--start fails------------------------------------------------------------^
//! ```

use crate::{
    config::TrackingConfig,
    gesture::ActionEvent,
    orientation::RotationTransform,
    pipeline::ZonePipeline,
    zones::Zone,
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Metadata every frame must expose to the loop
pub trait VideoFrame {
    /// Monotonic capture time in milliseconds
    fn timestamp_ms(&self) -> i64;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Zero-area frames arrive while the media stream is still loading
    fn has_valid_dimensions(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Pull-based supply of frames
pub trait FrameSource {
    type Frame: VideoFrame;

    /// Next frame, or `None` when the source is exhausted
    fn next_frame(&mut self) -> Option<Self::Frame>;
}

/// Model mapping a frame to a head rotation
pub trait PerceptionModel {
    type Frame: VideoFrame;

    /// `Ok(None)` means no face in this frame.
    ///
    /// # Errors
    ///
    /// Any error is treated by the loop as a missed frame.
    fn detect(&mut self, frame: &Self::Frame) -> Result<Option<RotationTransform>>;

    /// Release model resources
    fn close(&mut self) {}
}

/// Lifecycle of a [`TrackingLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, not started
    Idle,
    /// Perception acquired, waiting for a frame with valid dimensions
    WarmingUp,
    Running,
    /// Terminal
    Stopped,
}

/// What subscribers receive after each processed frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PublishedState {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub zone: Zone,
    /// False until the first valid frame was observed
    pub ready: bool,
}

/// Outcome of a single [`TrackingLoop::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Loop not started, stopped, or cancelled
    Inactive,
    /// Frame had zero area before the first valid frame
    WarmingUp,
    /// No face, detection fault or malformed frame; the retained state is returned
    Missed(PublishedState),
    /// Frame processed and published to subscribers
    Published {
        state: PublishedState,
        action: Option<ActionEvent>,
    },
}

impl TickOutcome {
    /// Current published state, if the loop has one
    #[must_use]
    pub const fn published(&self) -> Option<PublishedState> {
        match self {
            Self::Missed(state) | Self::Published { state, .. } => Some(*state),
            Self::Inactive | Self::WarmingUp => None,
        }
    }

    #[must_use]
    pub const fn action(&self) -> Option<ActionEvent> {
        match self {
            Self::Published { action, .. } => *action,
            _ => None,
        }
    }
}

/// Cloneable cancellation flag, checked before each tick
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Frame counters for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingStats {
    /// Ticks while the loop was active
    pub ticks: u64,
    pub warm_up_frames: u64,
    pub processed: u64,
    /// Frames without a detected face
    pub missed: u64,
    /// Detection errors and malformed frames
    pub faults: u64,
    pub actions: u64,
}

impl fmt::Display for TrackingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} warm-up, {} processed, {} missed, {} faults, {} actions",
            self.ticks, self.warm_up_frames, self.processed, self.missed, self.faults, self.actions
        )
    }
}

type Subscriber = Box<dyn FnMut(&PublishedState) + Send>;
type ActionCallback = Box<dyn FnMut() + Send>;

/// Frame-paced tracking session
pub struct TrackingLoop<P: PerceptionModel> {
    state: LoopState,
    pipeline: ZonePipeline,
    perception: Option<P>,
    published: PublishedState,
    subscribers: Vec<Subscriber>,
    on_action: Option<ActionCallback>,
    cancel: CancelHandle,
    stats: TrackingStats,
}

impl<P: PerceptionModel> TrackingLoop<P> {
    /// Create an idle loop
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is out of range.
    pub fn new(config: &TrackingConfig) -> Result<Self> {
        let pipeline = ZonePipeline::new(config)?;
        debug!("Tracking loop created with {config:?}");

        Ok(Self {
            state: LoopState::Idle,
            pipeline,
            perception: None,
            published: PublishedState::default(),
            subscribers: Vec::new(),
            on_action: None,
            cancel: CancelHandle::default(),
            stats: TrackingStats::default(),
        })
    }

    /// Register a callback receiving every published state
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&PublishedState) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Set the callback invoked once per action event
    pub fn on_action<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_action = Some(Box::new(callback));
    }

    /// Handle that cancels this loop from anywhere
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Acquire the perception collaborator and begin warming up.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if the loop was already started, and
    /// `Error::Initialization` if acquisition fails; the loop is then stopped.
    pub async fn start<F>(&mut self, acquire: F) -> Result<()>
    where
        F: Future<Output = Result<P>>,
    {
        if self.state != LoopState::Idle {
            return Err(Error::InvalidState(format!(
                "Cannot start a loop in state {:?}",
                self.state
            )));
        }

        info!("Starting tracking loop");
        let perception = match acquire.await {
            Ok(perception) => perception,
            Err(e) => {
                self.state = LoopState::Stopped;
                warn!("Failed to acquire perception model: {e}");
                return Err(match e {
                    Error::Initialization(_) => e,
                    other => Error::Initialization(other.to_string()),
                });
            }
        };

        self.perception = Some(perception);
        self.state = LoopState::WarmingUp;

        if self.cancel.is_cancelled() {
            self.stop();
        }

        Ok(())
    }

    /// Process one frame.
    ///
    /// Cancellation is observed here, before any work for the frame. A missed
    /// detection freezes the smoother and debouncer at their last values.
    pub fn tick(&mut self, frame: &P::Frame) -> TickOutcome {
        if self.cancel.is_cancelled() && self.state != LoopState::Stopped {
            info!("Cancellation observed");
            self.stop();
        }

        if matches!(self.state, LoopState::Idle | LoopState::Stopped) {
            return TickOutcome::Inactive;
        }
        self.stats.ticks += 1;

        if !frame.has_valid_dimensions() {
            if self.state == LoopState::WarmingUp {
                debug!("Skipping {}x{} frame during warm-up", frame.width(), frame.height());
                self.stats.warm_up_frames += 1;
                return TickOutcome::WarmingUp;
            }
            warn!(
                "Skipping malformed {}x{} frame at {} ms",
                frame.width(),
                frame.height(),
                frame.timestamp_ms()
            );
            self.stats.faults += 1;
            return TickOutcome::Missed(self.published);
        }

        if self.state == LoopState::WarmingUp {
            info!("First valid frame {}x{}, tracking ready", frame.width(), frame.height());
            self.state = LoopState::Running;
            self.published.ready = true;
        }

        let Some(perception) = self.perception.as_mut() else {
            return TickOutcome::Inactive;
        };

        let transform = match perception.detect(frame) {
            Ok(Some(transform)) => transform,
            Ok(None) => {
                debug!("No face at {} ms", frame.timestamp_ms());
                self.stats.missed += 1;
                return TickOutcome::Missed(self.published);
            }
            Err(e) => {
                warn!("Detection failed, skipping frame: {e}");
                self.stats.faults += 1;
                return TickOutcome::Missed(self.published);
            }
        };

        let result = match self.pipeline.process(&transform, frame.timestamp_ms()) {
            Ok(result) => result,
            Err(e) => {
                warn!("Rejected transform, skipping frame: {e}");
                self.stats.faults += 1;
                return TickOutcome::Missed(self.published);
            }
        };

        let state = PublishedState {
            yaw_deg: result.pose.yaw,
            pitch_deg: result.pose.pitch,
            zone: result.zone,
            ready: true,
        };
        self.published = state;
        self.stats.processed += 1;

        debug!(
            "Yaw: {:.2}°, Pitch: {:.2}°, Zone: {}",
            state.yaw_deg, state.pitch_deg, state.zone
        );
        for subscriber in &mut self.subscribers {
            subscriber(&state);
        }

        if let Some(event) = result.action {
            self.stats.actions += 1;
            info!("{} action fired at {} ms", state.zone, event.fired_at_ms);
            if let Some(callback) = self.on_action.as_mut() {
                callback();
            }
        }

        TickOutcome::Published {
            state,
            action: result.action,
        }
    }

    /// Halt the loop and release the perception collaborator. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        if let Some(mut perception) = self.perception.take() {
            perception.close();
        }
        self.state = LoopState::Stopped;
        info!("Tracking stopped: {}", self.stats);
    }

    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.published.ready
    }

    /// Most recent published state, retained across missed frames
    #[must_use]
    pub const fn last_published(&self) -> PublishedState {
        self.published
    }

    #[must_use]
    pub const fn stats(&self) -> TrackingStats {
        self.stats
    }

    #[must_use]
    pub const fn pipeline(&self) -> &ZonePipeline {
        &self.pipeline
    }
}

impl<P: PerceptionModel> Drop for TrackingLoop<P> {
    fn drop(&mut self) {
        if let Some(mut perception) = self.perception.take() {
            perception.close();
        }
    }
}
