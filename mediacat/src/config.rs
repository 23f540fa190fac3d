//! Configuration for merge operations.
//!
//! A [`MergeConfig`] bundles the encoding targets used when normalizing
//! media inputs and the page layout used when rendering text and images
//! into PDF pages. Defaults match the service's canonical output profile:
//! 192 kbps 44.1 kHz stereo MP3, 1280-wide 30 fps H.264/AAC MP4, and
//! Letter-sized Helvetica text pages.

use anyhow::{Result, bail};

/// Target encoding for audio normalization and the final MP3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    /// Output bitrate in kbps.
    pub bitrate_kbps: u32,

    /// Output sample rate in Hz.
    pub sample_rate: u32,

    /// Output channel count.
    pub channels: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bitrate_kbps: 192,
            sample_rate: 44_100,
            channels: 2,
        }
    }
}

/// Target encoding for video normalization and the final MP4.
///
/// Every input is re-encoded to this common profile so the concat demuxer
/// can join the parts with a plain stream copy.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSettings {
    /// Maximum output width in pixels; narrower inputs keep their width.
    pub max_width: u32,

    /// Output frame rate.
    pub fps: u32,

    /// libx264 constant rate factor (lower is higher quality).
    pub crf: u32,

    /// libx264 encoder preset.
    pub preset: String,

    /// AAC audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            max_width: 1280,
            fps: 30,
            crf: 23,
            preset: "veryfast".to_string(),
            audio_bitrate_kbps: 192,
        }
    }
}

/// Page layout for text rendered into PDF pages.
///
/// Dimensions are in PDF points (1/72 inch); defaults are US Letter.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    /// Page width in points.
    pub width: f32,

    /// Page height in points.
    pub height: f32,

    /// Margin on all sides in points.
    pub margin: f32,

    /// Font size in points (Helvetica).
    pub font_size: f32,

    /// Baseline-to-baseline line height in points.
    pub line_height: f32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 54.0,
            font_size: 12.0,
            line_height: 14.4,
        }
    }
}

impl PageSettings {
    /// Lines of text that fit on one page.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.height - 2.0 * self.margin;
        (usable / self.line_height).floor().max(1.0) as usize
    }

    /// Characters that fit on one line, estimated from the average
    /// Helvetica glyph width (roughly half the font size).
    pub fn chars_per_line(&self) -> usize {
        let usable = self.width - 2.0 * self.margin;
        (usable / (self.font_size * 0.5)).floor().max(1.0) as usize
    }
}

/// Complete configuration for the merge orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeConfig {
    /// Audio normalization and output settings.
    pub audio: AudioSettings,

    /// Video normalization and output settings.
    pub video: VideoSettings,

    /// Page layout for text-to-PDF rendering.
    pub page: PageSettings,
}

impl MergeConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any encoding or layout parameter is out of its
    /// sane range (zero rates, margins swallowing the whole page, and so
    /// on).
    pub fn validate(&self) -> Result<()> {
        if self.audio.bitrate_kbps == 0 {
            bail!("Audio bitrate must be positive");
        }

        if self.audio.sample_rate == 0 {
            bail!("Audio sample rate must be positive");
        }

        if self.audio.channels == 0 || self.audio.channels > 2 {
            bail!("Audio channel count must be 1 or 2");
        }

        if self.video.max_width == 0 || self.video.fps == 0 {
            bail!("Video width and frame rate must be positive");
        }

        if self.video.crf > 51 {
            bail!("Video CRF must be between 0 and 51");
        }

        if self.video.preset.trim().is_empty() {
            bail!("Video encoder preset must not be empty");
        }

        if self.page.width <= 0.0 || self.page.height <= 0.0 {
            bail!("Page dimensions must be positive");
        }

        if 2.0 * self.page.margin >= self.page.width.min(self.page.height) {
            bail!("Page margins leave no room for content");
        }

        if self.page.font_size <= 0.0 || self.page.line_height < self.page.font_size {
            bail!("Line height must be at least the font size");
        }

        Ok(())
    }
}
