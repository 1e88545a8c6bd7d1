use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::PlumConfig;
use crate::foundation::core::StrokeStyle;
use crate::foundation::error::PlumResult;
use crate::growth::engine::GrowthEngine;
use crate::growth::session::{GrowthSession, SessionId};
use crate::host::headless::HeadlessHost;
use crate::host::{FrameHandle, Host, HostEvent, ListenerId};
use crate::render::surface::Surface;
use crate::schedule::scheduler::{FrameScheduler, TickOutcome};

/// The animated background: owns the surface, the current growth session and the refresh loop.
///
/// A backdrop is inert until [`Backdrop::initialize`] (or [`Backdrop::mount`]) starts a session.
/// Every initialization discards the previous session completely.
pub struct Backdrop<S, R> {
    surface: S,
    rng: R,
    stroke: StrokeStyle,
    engine: GrowthEngine,
    scheduler: FrameScheduler,
    session: Option<GrowthSession>,
    sessions_started: u64,
    frame: Option<FrameHandle>,
}

/// A backdrop driven by the seeded generator from its config.
pub type SeededBackdrop<S> = Backdrop<S, ChaCha8Rng>;

impl<S: Surface> Backdrop<S, ChaCha8Rng> {
    /// Backdrop whose randomness comes from `ChaCha8` seeded with `cfg.seed`.
    pub fn from_config(surface: S, cfg: &PlumConfig) -> PlumResult<Self> {
        Self::with_rng(surface, cfg, ChaCha8Rng::seed_from_u64(cfg.seed))
    }
}

impl<S: Surface, R: Rng> Backdrop<S, R> {
    /// Backdrop drawing its random decisions from `rng`.
    pub fn with_rng(surface: S, cfg: &PlumConfig, rng: R) -> PlumResult<Self> {
        cfg.validate()?;
        Ok(Self {
            surface,
            rng,
            stroke: cfg.stroke,
            engine: GrowthEngine::new(cfg.growth.clone()),
            scheduler: FrameScheduler::new(cfg.scheduler.clone()),
            session: None,
            sessions_started: 0,
            frame: None,
        })
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the drawing surface, e.g. to read back pixels.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current growth session, if one was started.
    pub fn session(&self) -> Option<&GrowthSession> {
        self.session.as_ref()
    }

    /// The refresh throttle.
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Refresh request currently outstanding with the host.
    pub fn scheduled_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Start a fresh session sized to the host viewport.
    ///
    /// Cancels any in-flight loop, clears and resizes the surface, applies the stroke style,
    /// seeds a single root branch and schedules the first refresh.
    #[tracing::instrument(skip_all)]
    pub fn initialize<H>(&mut self, host: &mut H) -> PlumResult<()>
    where
        H: Host + ?Sized,
    {
        self.cancel_loop(host);
        self.session = None;

        let canvas = host.viewport().canvas();
        self.surface.clear();
        self.surface.resize(canvas)?;
        self.surface.set_stroke_style(self.stroke)?;

        self.sessions_started += 1;
        let id = SessionId(self.sessions_started);
        self.session = Some(GrowthSession::seeded(id, self.engine.params().max_pending));

        self.scheduler.start();
        self.frame = Some(host.request_frame());
        tracing::info!(
            session = id.0,
            width = canvas.width,
            height = canvas.height,
            "growth session started"
        );
        Ok(())
    }

    /// React to a refresh. Returns `None` when `handle` is not the outstanding request.
    ///
    /// A failed surface flush stops the loop before the error is returned.
    pub fn on_refresh<H>(
        &mut self,
        host: &mut H,
        handle: FrameHandle,
    ) -> PlumResult<Option<TickOutcome>>
    where
        H: Host + ?Sized,
    {
        if self.frame != Some(handle) {
            tracing::debug!(handle = handle.0, "ignoring stale refresh");
            return Ok(None);
        }
        self.frame = None;

        let outcome = self.scheduler.tick();
        if let TickOutcome::Eligible(tick) = outcome
            && let Some(session) = self.session.as_mut()
        {
            let selected = self
                .scheduler
                .advance_frame(session.pending_mut(), &mut self.rng);
            let n = selected.len();
            session.run_frame(&self.engine, selected, &mut self.rng, &mut self.surface);
            let pending = session.pending().len();
            if let Err(e) = self.surface.flush() {
                tracing::warn!(error = %e, "surface flush failed; stopping the loop");
                self.cancel_loop(host);
                return Err(e);
            }
            tracing::debug!(
                tick = tick.0,
                expanded = n,
                pending,
                "advanced growth"
            );
        }

        if self.scheduler.is_running() {
            self.frame = Some(host.request_frame());
        }
        Ok(Some(outcome))
    }

    /// Stop the refresh loop. Safe to call when nothing is scheduled.
    pub fn cancel_loop<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.scheduler.cancel();
        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }
    }

    /// Register for resize notifications and start the first session.
    pub fn mount<H>(self, host: &mut H) -> PlumResult<Mounted<S, R>>
    where
        H: Host + ?Sized,
    {
        let listener = host.add_resize_listener();
        let mut mounted = Mounted {
            backdrop: self,
            listener,
        };
        if let Err(e) = mounted.backdrop.initialize(host) {
            mounted.backdrop.cancel_loop(host);
            host.remove_resize_listener(listener);
            return Err(e);
        }
        Ok(mounted)
    }
}

/// A backdrop attached to a host.
///
/// Holds the resize registration and, through the backdrop, the outstanding refresh request.
/// [`Mounted::teardown`] releases both; dropping a `Mounted` without it leaves them registered.
#[must_use = "call `teardown` to release the host registrations"]
pub struct Mounted<S, R> {
    backdrop: Backdrop<S, R>,
    listener: ListenerId,
}

impl<S: Surface, R: Rng> Mounted<S, R> {
    /// The mounted backdrop.
    pub fn backdrop(&self) -> &Backdrop<S, R> {
        &self.backdrop
    }

    /// Mutable access to the mounted backdrop.
    pub fn backdrop_mut(&mut self) -> &mut Backdrop<S, R> {
        &mut self.backdrop
    }

    /// Resize registration held by this mount.
    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    /// Dispatch one host event.
    pub fn handle_event<H>(&mut self, host: &mut H, event: HostEvent) -> PlumResult<()>
    where
        H: Host + ?Sized,
    {
        match event {
            HostEvent::Refresh(handle) => {
                self.backdrop.on_refresh(host, handle)?;
            }
            HostEvent::Resize(id) if id == self.listener => {
                self.backdrop.initialize(host)?;
            }
            HostEvent::Resize(id) => {
                tracing::debug!(listener = id.0, "ignoring resize for another listener");
            }
        }
        Ok(())
    }

    /// Deliver every event queued in a headless host. Returns how many were handled.
    pub fn pump(&mut self, host: &mut HeadlessHost) -> PlumResult<usize> {
        let mut handled = 0;
        while let Some(event) = host.poll_event() {
            self.handle_event(host, event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Simulate `refreshes` display refreshes on a headless host, handling all events.
    pub fn run_refreshes(&mut self, host: &mut HeadlessHost, refreshes: u64) -> PlumResult<()> {
        for _ in 0..refreshes {
            host.refresh();
            self.pump(host)?;
        }
        Ok(())
    }

    /// Unregister from resize events and stop the refresh loop.
    pub fn teardown<H>(mut self, host: &mut H) -> Backdrop<S, R>
    where
        H: Host + ?Sized,
    {
        host.remove_resize_listener(self.listener);
        self.backdrop.cancel_loop(host);
        tracing::info!(
            sessions = self.backdrop.sessions_started,
            "backdrop torn down"
        );
        self.backdrop
    }
}

#[cfg(test)]
#[path = "../tests/unit/backdrop.rs"]
mod tests;
