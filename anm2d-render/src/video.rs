//! VP9/WebM export via an external `ffmpeg` process.

use crate::RenderError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Encoder that shells out to FFmpeg over a directory of numbered PNG frames
/// (`img_0000.png`, `img_0001.png`, ...).
pub struct WebmEncoder;

impl WebmEncoder {
    /// Check if FFmpeg is available on the system.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Encodes the PNG frames under `frames_dir` into a VP9 WebM file at
    /// `output`, preserving alpha (`yuva420p`), in constant-quality mode.
    pub fn encode(frames_dir: &Path, frame_rate: u8, output: &Path) -> Result<(), RenderError> {
        if !Self::is_available() {
            return Err(RenderError::EncoderFailure {
                detail: "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html"
                    .to_string(),
            });
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y");
        cmd.args(["-framerate", &frame_rate.to_string()]);
        cmd.arg("-i").arg(frames_dir.join("img_%04d.png"));
        cmd.args([
            "-c:v", "libvpx-vp9",
            "-pix_fmt", "yuva420p", // keep the alpha channel
            "-crf", "31",
            "-b:v", "0", // constant quality mode
            "-row-mt", "1",
        ]);
        cmd.arg(output);

        let result = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RenderError::EncoderFailure {
                detail: format!("failed to start ffmpeg: {e}"),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::EncoderFailure {
                detail: format!("ffmpeg (VP9) failed with status {}: {stderr}", result.status),
            });
        }

        tracing::info!(
            frames_dir = %frames_dir.display(),
            output = %output.display(),
            frame_rate,
            "encoded PNG frames to WebM (VP9)"
        );

        Ok(())
    }
}
