//! Plum is a self-animating background of recursively growing branches.
//!
//! A root branch is seeded at the top-left corner of the canvas. Every third display refresh a
//! random subset of the pending branches is drawn and each of them may spawn two children that
//! veer slightly left and right. Early generations always continue; deeper ones continue by coin
//! flip, so the growth dies out on its own.
//!
//! - Configure a [`PlumConfig`] (or load one from JSON)
//! - Mount a [`Backdrop`] onto a [`Host`] and feed it [`HostEvent`]s
//! - Or let a [`Recorder`] drive a [`HeadlessHost`] and capture frames into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Surface lifecycle: initialization, the refresh loop, resize and teardown.
pub mod backdrop;
/// JSON configuration.
pub mod config;
pub mod encode;
pub mod growth;
pub mod host;
/// Headless recording.
pub mod recorder;
pub mod render;
pub mod schedule;

pub use crate::foundation::core::{
    Canvas, Fps, FrameIndex, Point, Rgba8, Rgba8Premul, StrokeStyle, TickIndex, Vec2, Viewport,
};
pub use crate::foundation::error::{PlumError, PlumResult};

pub use crate::backdrop::{Backdrop, Mounted, SeededBackdrop};
pub use crate::config::PlumConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::growth::branch::Branch;
pub use crate::growth::engine::{Expansion, GrowthEngine, GrowthParams};
pub use crate::growth::pending::{Admission, PendingWork};
pub use crate::growth::session::{GrowthSession, SessionId, SessionStats};
pub use crate::host::headless::HeadlessHost;
pub use crate::host::{FrameHandle, Host, HostEvent, ListenerId};
pub use crate::recorder::{RecordOpts, RecordStats, Recorder};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::surface::{NullSurface, RecordingSurface, Surface, SurfaceOp};
pub use crate::schedule::scheduler::{FrameScheduler, SchedulerParams, SchedulerState, TickOutcome};
