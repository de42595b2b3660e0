//! Video aspect-ratio probing
//!
//! [`FfprobeProbe`] shells out to `ffprobe` against a staged file and returns the
//! dimensions of the first video stream; [`classify`] turns those dimensions into an
//! [`Orientation`]. The probe sits behind the [`AspectProbe`] trait so tests can feed
//! canned output without the binary installed.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tubely_core::models::Orientation;
use tubely_core::AppError;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const RATIO_TOLERANCE: f64 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// ffprobe could not be run, exited non-zero, or wrote unreadable output.
    #[error("ffprobe execution failed: {0}")]
    Execution(String),

    /// ffprobe ran but its output has no usable video dimensions.
    #[error("Failed to decode ffprobe output: {0}")]
    Decode(String),
}

impl From<ProbeError> for AppError {
    fn from(err: ProbeError) -> Self {
        AppError::MediaProbe(err.to_string())
    }
}

/// Dimensions of one stream as reported by ffprobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
struct ProbeOutput {
    streams: Vec<StreamInfo>,
}

#[async_trait]
pub trait AspectProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamInfo>, ProbeError>;
}

/// `AspectProbe` backed by the ffprobe binary
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProbeError> {
        let ffprobe_path = ffprobe_path.into();

        if ffprobe_path.is_empty()
            || !ffprobe_path.chars().all(|c| {
                c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
            })
        {
            return Err(ProbeError::Execution(format!(
                "Invalid ffprobe path: {}",
                ffprobe_path
            )));
        }

        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl AspectProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<Vec<StreamInfo>, ProbeError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProbeError::Execution(format!("Failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            tracing::warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "ffprobe exited with failure"
            );
            return Err(ProbeError::Execution(format!(
                "ffprobe exited with {}",
                output.status
            )));
        }

        let streams = parse_probe_output(&output.stdout)?;

        tracing::debug!(
            streams = streams.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe completed"
        );

        Ok(streams)
    }
}

/// Parse ffprobe's `-print_format json -show_streams` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Vec<StreamInfo>, ProbeError> {
    let text = std::str::from_utf8(stdout)
        .map_err(|e| ProbeError::Execution(format!("ffprobe output is not UTF-8: {}", e)))?;

    let parsed: ProbeOutput =
        serde_json::from_str(text).map_err(|e| ProbeError::Decode(e.to_string()))?;

    Ok(parsed.streams)
}

/// Orientation of the first stream. The remaining streams are ignored.
pub fn classify(streams: &[StreamInfo]) -> Result<Orientation, ProbeError> {
    let first = streams
        .first()
        .ok_or_else(|| ProbeError::Decode("no streams in ffprobe output".to_string()))?;

    if first.width == 0 || first.height == 0 {
        return Err(ProbeError::Decode(format!(
            "invalid dimensions {}x{}",
            first.width, first.height
        )));
    }

    let ratio = first.width as f64 / first.height as f64;

    let orientation = if (ratio - LANDSCAPE_RATIO).abs() < RATIO_TOLERANCE {
        Orientation::Landscape
    } else if (ratio - PORTRAIT_RATIO).abs() < RATIO_TOLERANCE {
        Orientation::Portrait
    } else {
        Orientation::Other
    };

    Ok(orientation)
}
