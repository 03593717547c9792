use super::probe::MediaProbe;
use super::{
    MAX_STICKER_BYTES, MAX_STICKER_DURATION, STICKER_BOUNDING_BOX, STICKER_CONTAINER,
    STICKER_VIDEO_CODEC,
};
use std::time::Duration;

/// A sticker requirement the produced file does not meet. Non-fatal: the
/// file is kept and the user decides whether the result is acceptable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum Violation {
    #[error("the file is {size} bytes, which exceeds the 256 KiB sticker limit")]
    Oversized { size: u64 },

    #[error("the duration {duration:?} exceeds the 3 second sticker limit")]
    TooLong { duration: Duration },

    #[error("the frame is {width}x{height}, which exceeds the 512 px bounding box")]
    OutOfBounds { width: u64, height: u64 },

    #[error("the frame is {width}x{height}, but VP9 requires even dimensions")]
    OddDimensions { width: u64, height: u64 },

    #[error("the file contains an audio stream")]
    HasAudio,

    #[error("the video codec is `{codec}`, expected `vp9`")]
    WrongCodec { codec: String },

    #[error("the container is `{container}`, expected webm")]
    WrongContainer { container: String },
}

/// Checks the probe of a produced file against the sticker constraint set.
pub(crate) fn check_sticker(probe: &MediaProbe) -> Vec<Violation> {
    let mut violations = Vec::new();

    if probe.file_size > MAX_STICKER_BYTES {
        violations.push(Violation::Oversized {
            size: probe.file_size,
        });
    }

    if probe.duration > MAX_STICKER_DURATION {
        violations.push(Violation::TooLong {
            duration: probe.duration,
        });
    }

    if probe.width.max(probe.height) > STICKER_BOUNDING_BOX {
        violations.push(Violation::OutOfBounds {
            width: probe.width,
            height: probe.height,
        });
    }

    if probe.width % 2 != 0 || probe.height % 2 != 0 {
        violations.push(Violation::OddDimensions {
            width: probe.width,
            height: probe.height,
        });
    }

    if probe.has_audio {
        violations.push(Violation::HasAudio);
    }

    if probe.codec != STICKER_VIDEO_CODEC {
        violations.push(Violation::WrongCodec {
            codec: probe.codec.clone(),
        });
    }

    // ffprobe reports matroska-family containers as a comma-separated list
    if !probe.container.split(',').any(|name| name == STICKER_CONTAINER) {
        violations.push(Violation::WrongContainer {
            container: probe.container.clone(),
        });
    }

    violations
}
