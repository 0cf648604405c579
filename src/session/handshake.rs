//! One producer, one consumer: the render loop starts a session, polls it
//! without blocking, asks for exactly one draw pass once the spiral is
//! ready, and then joins the worker.
//!
//! The session state is a single `AtomicU8`. The worker publishes its output
//! under the mutex and only then stores `Ready` with release ordering, so a
//! foreground that loads `Ready` with acquire ordering sees the finished
//! points and extent.

use crate::error::{Result, SpiralError};
use crate::geometry::Point2D;
use crate::session::request::SpiralRequest;
use crate::spiral::{BoundingExtent, ScreenRect, SpiralOutput, Viewport};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle = 0,
    Building = 1,
    Ready = 2,
    Rendering = 3,
    // Foreground gave up on the session; the worker discards what it built
    Abandoned = 4,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionState::Building,
            2 => SessionState::Ready,
            3 => SessionState::Rendering,
            4 => SessionState::Abandoned,
            _ => SessionState::Idle,
        }
    }

    pub fn flags(self) -> HandshakeFlags {
        let (started, sequence_ready, proceed) = match self {
            SessionState::Idle => (false, false, false),
            SessionState::Building | SessionState::Abandoned => (true, false, false),
            SessionState::Ready => (true, true, false),
            SessionState::Rendering => (true, true, true),
        };
        HandshakeFlags {
            started,
            sequence_ready,
            proceed,
        }
    }
}

/// The classic three-flag view of a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandshakeFlags {
    pub started: bool,
    pub sequence_ready: bool,
    pub proceed: bool,
}

/// What one completed session hands to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub points: Vec<Point2D>,
    pub extent: Option<BoundingExtent>,
    pub rects: Vec<ScreenRect>,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// No session is running.
    Inactive,
    /// Still building, or rendering after `proceed`.
    Pending,
    /// The spiral is built; call `proceed` and then `finish`.
    Ready,
    /// The worker stopped without ever reaching `Ready`.
    Failed,
    /// The build exceeded the ready timeout and was abandoned.
    TimedOut,
    /// An abandoned worker has not exited yet.
    Draining,
}

struct Shared {
    state: AtomicU8,
    output: Mutex<Option<SpiralOutput>>,
    render_passes: AtomicUsize,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(SessionState::Idle as u8),
            output: Mutex::new(None),
            render_passes: AtomicUsize::new(0),
        }
    }

    fn load(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn store(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn transition(&self, from: SessionState, to: SessionState) -> bool {
        let swapped = self
            .state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if swapped {
            tracing::trace!("Session {:?} -> {:?}", from, to);
        }
        swapped
    }
}

/// Foreground handle on the spiral worker.
pub struct SpiralSession {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<Option<RenderedFrame>>>,
    started_at: Option<Instant>,
    ready_timeout: Duration,
}

impl SpiralSession {
    pub fn new(ready_timeout: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            worker: None,
            started_at: None,
            ready_timeout,
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.load()
    }

    pub fn flags(&self) -> HandshakeFlags {
        self.state().flags()
    }

    /// Total draw passes performed by workers of this session handle.
    pub fn render_passes(&self) -> usize {
        self.shared.render_passes.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    /// Spawns the worker for `request`. Only one session may run at a time.
    pub fn start(&mut self, request: SpiralRequest, viewport: Viewport) -> Result<()> {
        if self.worker.is_some()
            || !self
                .shared
                .transition(SessionState::Idle, SessionState::Building)
        {
            return Err(SpiralError::SessionBusy);
        }

        tracing::info!("Starting spiral session for {:?}", request.source);
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("spiral-worker".to_string())
            .spawn(move || run_worker(&shared, &request, viewport));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                self.started_at = Some(Instant::now());
                Ok(())
            }
            Err(e) => {
                self.shared.store(SessionState::Idle);
                Err(SpiralError::Io(e))
            }
        }
    }

    /// Checks on the session without blocking the caller.
    pub fn poll(&mut self) -> SessionEvent {
        let Some(worker) = &self.worker else {
            return SessionEvent::Inactive;
        };

        match self.shared.load() {
            SessionState::Ready => SessionEvent::Ready,
            SessionState::Rendering => SessionEvent::Pending,
            SessionState::Idle => {
                // The worker gave up before reaching Ready
                self.reap();
                SessionEvent::Failed
            }
            SessionState::Building if worker.is_finished() => {
                tracing::error!("Spiral worker exited while building");
                self.reap();
                SessionEvent::Failed
            }
            SessionState::Building => {
                let overdue = self
                    .started_at
                    .is_some_and(|t| t.elapsed() >= self.ready_timeout);
                if overdue
                    && self
                        .shared
                        .transition(SessionState::Building, SessionState::Abandoned)
                {
                    tracing::warn!(
                        "Spiral session not ready after {:?}, abandoning it",
                        self.ready_timeout
                    );
                    return SessionEvent::TimedOut;
                }
                SessionEvent::Pending
            }
            SessionState::Abandoned => {
                if worker.is_finished() {
                    self.reap();
                    SessionEvent::Inactive
                } else {
                    SessionEvent::Draining
                }
            }
        }
    }

    /// Releases the worker for its single draw pass. Returns `false` unless
    /// the session was `Ready`, so repeated calls have no further effect.
    pub fn proceed(&self) -> bool {
        let released = self
            .shared
            .transition(SessionState::Ready, SessionState::Rendering);
        if released {
            tracing::debug!("Spiral session released for rendering");
        }
        released
    }

    /// Joins a worker released by [`SpiralSession::proceed`] and resets the
    /// session to `Idle`. Does nothing in any other state.
    pub fn finish(&mut self) -> Option<RenderedFrame> {
        if self.shared.load() != SessionState::Rendering {
            return None;
        }
        let frame = self.reap();
        if let Some(frame) = &frame {
            tracing::info!(
                "Spiral session finished: {} points, {} rects",
                frame.points.len(),
                frame.rects.len()
            );
        }
        frame
    }

    /// Read access to the published spiral while the session is `Ready`.
    pub fn with_output<R>(&self, f: impl FnOnce(&SpiralOutput) -> R) -> Option<R> {
        if self.shared.load() != SessionState::Ready {
            return None;
        }
        self.shared.output.lock().as_ref().map(f)
    }

    fn reap(&mut self) -> Option<RenderedFrame> {
        let frame = match self.worker.take().map(JoinHandle::join) {
            Some(Ok(frame)) => frame,
            Some(Err(_)) => {
                tracing::error!("Spiral worker panicked");
                None
            }
            None => None,
        };
        self.shared.output.lock().take();
        self.started_at = None;
        self.shared.store(SessionState::Idle);
        frame
    }
}

impl Drop for SpiralSession {
    fn drop(&mut self) {
        // Let a waiting worker exit on its own; never block here.
        if self.worker.is_some() {
            self.shared.store(SessionState::Abandoned);
        }
    }
}

fn run_worker(
    shared: &Shared,
    request: &SpiralRequest,
    viewport: Viewport,
) -> Option<RenderedFrame> {
    let samples = match request.load_samples() {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!("Spiral session aborted: {}", e);
            shared.transition(SessionState::Building, SessionState::Idle);
            return None;
        }
    };

    if let Err(e) = request.persist(&samples) {
        tracing::warn!("Failed to save fibonacci sequence: {}", e);
    }

    let output = SpiralOutput::from_samples(&samples, request.first_index);
    tracing::debug!(
        "Built {} spiral points from {} samples",
        output.points.len(),
        samples.len()
    );
    *shared.output.lock() = Some(output);

    if !shared.transition(SessionState::Building, SessionState::Ready) {
        tracing::debug!("Spiral session abandoned before it was ready");
        shared.output.lock().take();
        return None;
    }

    // Short, exclusive sessions: spin rather than park
    loop {
        match shared.load() {
            SessionState::Rendering => break,
            SessionState::Ready => std::hint::spin_loop(),
            _ => return None,
        }
    }

    let output = shared.output.lock().take()?;
    let rects = output.screen_rects(viewport);
    shared.render_passes.fetch_add(1, Ordering::AcqRel);

    Some(RenderedFrame {
        points: output.points,
        extent: output.extent,
        rects,
        viewport,
    })
}
