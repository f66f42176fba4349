use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    foundation::core::{Canvas, Fps},
    foundation::error::{SketchError, SketchResult},
    foundation::math::mul_div255_u16,
    render::backend::FrameRGBA,
};

/// Output settings for one MP4 file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    /// Encoder settings matching a sketch's canvas and frame rate.
    ///
    /// Only whole-number frame rates can be passed to `ffmpeg -r` here.
    pub fn for_canvas(
        canvas: Canvas,
        fps: Fps,
        out_path: impl Into<PathBuf>,
        overwrite: bool,
    ) -> SketchResult<Self> {
        if fps.den != 1 {
            return Err(SketchError::validation(format!(
                "mp4 output needs a whole-number frame rate, got {}/{}",
                fps.num, fps.den
            )));
        }
        let cfg = Self {
            width: canvas.width,
            height: canvas.height,
            fps: fps.num,
            out_path: out_path.into(),
            overwrite,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SketchResult<()> {
        if self.width == 0 || self.height == 0 || self.fps == 0 {
            return Err(SketchError::validation(format!(
                "mp4 output needs non-zero size and fps, got {}x{} @ {}",
                self.width, self.height, self.fps
            )));
        }
        // yuv420p subsamples chroma 2x2.
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SketchError::validation(format!(
                "mp4 output needs an even canvas, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Arguments after `ffmpeg`: raw RGBA on stdin in, H.264 yuv420p out.
    fn ffmpeg_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            if self.overwrite { "-y" } else { "-n" }.into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pix_fmt".into(),
            "rgba".into(),
            "-s".into(),
            format!("{}x{}", self.width, self.height),
            "-r".into(),
            self.fps.to_string(),
            "-i".into(),
            "pipe:0".into(),
            "-an".into(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-movflags".into(),
            "+faststart".into(),
        ];
        args.push(self.out_path.to_string_lossy().into_owned());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Create the directory that will hold `path`, if any.
pub fn ensure_parent_dir(path: &Path) -> SketchResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                SketchError::encode(format!(
                    "create output directory '{}': {e}",
                    parent.display()
                ))
            })
        }
        _ => Ok(()),
    }
}

/// Pipes rendered sketch frames into a system `ffmpeg` process.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    bg_rgba: [u8; 4],
    child: Child,
    stdin: Option<ChildStdin>,
    opaque: Vec<u8>,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, bg_rgba: [u8; 4]) -> SketchResult<Self> {
        cfg.validate()?;
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(SketchError::validation(format!(
                "'{}' exists and overwrite is off",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(SketchError::encode("mp4 output needs `ffmpeg` on PATH"));
        }
        ensure_parent_dir(&cfg.out_path)?;

        tracing::debug!(
            out = %cfg.out_path.display(),
            w = cfg.width,
            h = cfg.height,
            fps = cfg.fps,
            "starting ffmpeg"
        );
        let mut child = Command::new("ffmpeg")
            .args(cfg.ffmpeg_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SketchError::encode(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SketchError::encode("ffmpeg stdin is not piped"))?;

        Ok(Self {
            opaque: vec![0; cfg.frame_bytes()],
            cfg,
            bg_rgba,
            child,
            stdin: Some(stdin),
            frames_written: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> SketchResult<()> {
        if (frame.width, frame.height) != (self.cfg.width, self.cfg.height) {
            return Err(SketchError::validation(format!(
                "frame is {}x{} but the video is {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        flatten_to_opaque_rgba8(
            &mut self.opaque,
            &frame.data,
            frame.premultiplied,
            self.bg_rgba,
        )?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SketchError::encode("encoder already finished"))?;
        stdin.write_all(&self.opaque).map_err(|e| {
            SketchError::encode(format!(
                "write frame {} to ffmpeg: {e}",
                self.frames_written
            ))
        })?;
        self.frames_written += 1;
        Ok(())
    }

    /// Close ffmpeg's input and wait for the file to be written.
    pub fn finish(mut self) -> SketchResult<()> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| SketchError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(SketchError::encode(format!(
                "ffmpeg failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!(
            out = %self.cfg.out_path.display(),
            frames = self.frames_written,
            "mp4 written"
        );
        Ok(())
    }
}

/// Composite RGBA8 pixels over an opaque background color.
///
/// Straight-alpha input is premultiplied first so both inputs share one blend.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> SketchResult<()> {
    if dst.len() != src.len() || !src.len().is_multiple_of(4) {
        return Err(SketchError::validation(format!(
            "cannot flatten {} rgba bytes into {}",
            src.len(),
            dst.len()
        )));
    }

    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let alpha = u16::from(px[3]);
        let behind = 255 - alpha;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(px[c])
            } else {
                mul_div255_u16(u16::from(px[c]), alpha)
            };
            let v = fg + mul_div255_u16(u16::from(bg_rgba[c]), behind);
            out[c] = v.min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
