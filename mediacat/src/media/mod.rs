//! Audio and video merging via external ffmpeg.
//!
//! Media inputs cannot be concatenated byte-wise; each file is first
//! re-encoded to a common profile inside the request workspace, then the
//! normalized parts are joined with ffmpeg's concat demuxer and a plain
//! stream copy.

pub mod audio;
pub mod probe;
pub mod tools;
pub mod video;

pub use audio::AudioMerger;
pub use video::VideoMerger;

/// Output of a media merge: the final container bytes plus the duration
/// ffprobe reported for it, when probing succeeded.
#[derive(Debug)]
pub struct MergedMedia {
    /// Encoded output bytes (MP3 or MP4).
    pub bytes: Vec<u8>,

    /// Duration of the output in seconds.
    pub duration_secs: Option<f64>,
}
