use crate::backdrop::Backdrop;
use crate::config::PlumConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Viewport};
use crate::foundation::error::{PlumError, PlumResult};
use crate::growth::session::SessionStats;
use crate::host::headless::HeadlessHost;
use crate::render::cpu::CpuSurface;
use crate::render::frame::FrameRGBA;
use crate::render::surface::{NullSurface, Surface};

/// Options for [`Recorder::record`].
#[derive(Clone, Copy, Debug)]
pub struct RecordOpts {
    /// Display refreshes to simulate.
    pub refreshes: u64,
    /// Capture a frame after every `capture_every`-th refresh.
    pub capture_every: u64,
    /// Frame rate handed to the sink.
    pub fps: Fps,
}

impl Default for RecordOpts {
    fn default() -> Self {
        Self {
            refreshes: 600,
            capture_every: 1,
            fps: Fps::default(),
        }
    }
}

/// Statistics of a finished recording.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RecordStats {
    /// Refreshes simulated.
    pub refreshes: u64,
    /// Frames pushed to the sink.
    pub frames_captured: u64,
    /// Growth counters of the session at the end.
    pub session: SessionStats,
}

/// Runs a backdrop on a [`HeadlessHost`] and captures what it draws.
///
/// Each call mounts a fresh backdrop, so the same recorder and arguments always produce the same
/// pixels.
#[derive(Clone, Debug)]
pub struct Recorder {
    config: PlumConfig,
    viewport: Viewport,
}

impl Recorder {
    /// Recorder for `viewport` using `config`.
    pub fn new(config: PlumConfig, viewport: Viewport) -> PlumResult<Self> {
        config.validate()?;
        if viewport.canvas().is_empty() {
            return Err(PlumError::validation("viewport must be non-empty"));
        }
        Ok(Self { config, viewport })
    }

    /// Active configuration.
    pub fn config(&self) -> &PlumConfig {
        &self.config
    }

    /// Pixels after `refreshes` display refreshes.
    pub fn render_frame(&self, refreshes: u64) -> PlumResult<(FrameRGBA, SessionStats)> {
        let surface = CpuSurface::new(self.viewport.canvas())?;
        let (mut surface, stats) = self.run(surface, refreshes)?;
        Ok((surface.snapshot()?, stats))
    }

    /// Growth counters after `refreshes` display refreshes, without rasterizing anything.
    pub fn stats(&self, refreshes: u64) -> PlumResult<SessionStats> {
        let surface = NullSurface::new(self.viewport.canvas());
        Ok(self.run(surface, refreshes)?.1)
    }

    /// Stream captured frames into `sink`.
    #[tracing::instrument(skip(self, sink))]
    pub fn record(&self, opts: RecordOpts, sink: &mut dyn FrameSink) -> PlumResult<RecordStats> {
        if opts.capture_every == 0 {
            return Err(PlumError::validation("capture_every must be >= 1"));
        }
        let mut host = HeadlessHost::new(self.viewport);
        let surface = CpuSurface::new(self.viewport.canvas())?;
        let mut mounted = Backdrop::from_config(surface, &self.config)?.mount(&mut host)?;

        sink.begin(SinkConfig {
            canvas: self.viewport.canvas(),
            fps: opts.fps,
        })?;

        let mut captured = 0u64;
        for r in 1..=opts.refreshes {
            mounted.run_refreshes(&mut host, 1)?;
            if r.is_multiple_of(opts.capture_every) {
                let frame = mounted.backdrop_mut().surface_mut().snapshot()?;
                sink.push_frame(FrameIndex(captured), &frame)?;
                captured += 1;
            }
        }
        sink.end()?;

        let backdrop = mounted.teardown(&mut host);
        let session = backdrop
            .session()
            .map(|s| s.stats())
            .unwrap_or_default();
        tracing::info!(frames = captured, segments = session.segments_drawn, "recording finished");
        Ok(RecordStats {
            refreshes: opts.refreshes,
            frames_captured: captured,
            session,
        })
    }

    fn run<S: Surface>(&self, surface: S, refreshes: u64) -> PlumResult<(S, SessionStats)> {
        let mut host = HeadlessHost::new(self.viewport);
        let mut mounted = Backdrop::from_config(surface, &self.config)?.mount(&mut host)?;
        mounted.run_refreshes(&mut host, refreshes)?;
        let backdrop = mounted.teardown(&mut host);
        let stats = backdrop
            .session()
            .map(|s| s.stats())
            .unwrap_or_default();
        Ok((backdrop.into_surface(), stats))
    }
}

#[cfg(test)]
#[path = "../tests/unit/recorder.rs"]
mod tests;
