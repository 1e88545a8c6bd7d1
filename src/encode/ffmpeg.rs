use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, Rgba8};
use crate::foundation::error::{PlumError, PlumResult};
use crate::foundation::math::flatten_over_bg;
use crate::render::frame::FrameRGBA;

/// Where [`FfmpegSink`] writes and what the transparent backdrop is composited onto.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Destination MP4.
    pub out_path: PathBuf,
    /// Replace an existing file instead of failing in `begin`.
    pub overwrite: bool,
    /// Opaque color under the strokes.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Overwriting output to `out_path` over black.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::new(0, 0, 0, 255),
        }
    }
}

/// Sink that pipes flattened frames into a system `ffmpeg` producing H.264 MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> PlumResult<()> {
        check_canvas(cfg.canvas)?;
        if self.encoder.is_some() {
            return Err(PlumError::encode("recording already in progress"));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(PlumError::validation(format!(
                "refusing to overwrite '{}'",
                self.opts.out_path.display()
            )));
        }
        self.encoder = Some(Encoder::spawn(&self.opts, &cfg)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PlumResult<()> {
        let background = self.opts.background;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| PlumError::encode("push_frame called before begin"))?;
        encoder.write(idx, frame, background)
    }

    fn end(&mut self) -> PlumResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| PlumError::encode("end called before begin"))?;
        encoder.finish()
    }
}

/// One running `ffmpeg` process.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    canvas: Canvas,
    flat: Vec<u8>,
    last: Option<FrameIndex>,
}

impl Encoder {
    fn spawn(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> PlumResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(PlumError::encode("`ffmpeg` not found on PATH"));
        }
        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(cfg, opts))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PlumError::encode(format!("spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut err_pipe)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(PlumError::encode("ffmpeg pipes unavailable"));
        };
        // ffmpeg blocks once its stderr pipe is full, so it is read concurrently.
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            err_pipe.read_to_end(&mut buf)?;
            Ok(buf)
        });

        tracing::info!(
            out = %opts.out_path.display(),
            width = cfg.canvas.width,
            height = cfg.canvas.height,
            fps = cfg.fps.num,
            "mp4 encoding started"
        );
        Ok(Self {
            child,
            stdin,
            stderr,
            canvas: cfg.canvas,
            flat: vec![0; cfg.canvas.rgba8_len()],
            last: None,
        })
    }

    fn write(&mut self, idx: FrameIndex, frame: &FrameRGBA, background: Rgba8) -> PlumResult<()> {
        if self.last.is_some_and(|last| idx <= last) {
            return Err(PlumError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0,
                self.last.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (self.canvas.width, self.canvas.height)
            || !frame.premultiplied
        {
            return Err(PlumError::validation(format!(
                "expected a premultiplied {}x{} frame, got {}x{}",
                self.canvas.width, self.canvas.height, frame.width, frame.height
            )));
        }
        let bg = background.premultiplied().to_array();
        if !flatten_over_bg(&mut self.flat, &frame.data, [bg[0], bg[1], bg[2], 255]) {
            return Err(PlumError::validation(format!(
                "frame {} holds {} bytes, expected {}",
                idx.0,
                frame.data.len(),
                self.flat.len()
            )));
        }
        self.stdin
            .write_all(&self.flat)
            .map_err(|e| PlumError::encode(format!("write frame {} to ffmpeg: {e}", idx.0)))?;
        self.last = Some(idx);
        Ok(())
    }

    fn finish(self) -> PlumResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
            last,
            ..
        } = self;
        // Closing stdin tells ffmpeg the stream is over.
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| PlumError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| PlumError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| PlumError::encode(format!("read ffmpeg stderr: {e}")))?;
        if !status.success() {
            return Err(PlumError::encode(format!(
                "ffmpeg failed ({status}): {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        tracing::info!(frames = last.map_or(0, |l| l.0 + 1), "mp4 encoding finished");
        Ok(())
    }
}

fn check_canvas(canvas: Canvas) -> PlumResult<()> {
    if canvas.is_empty() {
        return Err(PlumError::validation(format!(
            "cannot encode an empty {}x{} canvas",
            canvas.width, canvas.height
        )));
    }
    if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
        return Err(PlumError::validation(format!(
            "yuv420p output needs even dimensions, got {}x{}",
            canvas.width, canvas.height
        )));
    }
    Ok(())
}

fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args: Vec<String> = vec![
        if opts.overwrite { "-y" } else { "-n" }.into(),
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        // input: raw opaque rgba on stdin
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-video_size".into(),
        format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
        "-framerate".into(),
        format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i".into(),
        "-".into(),
        // output: h264 mp4
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-movflags".into(),
        "+faststart".into(),
    ];
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

/// Return `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
