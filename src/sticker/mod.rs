mod batch;
mod encode;
mod job;
mod plan;
mod probe;
mod validate;

#[cfg(test)]
mod testing;

use crate::util::byte_size::KIB;
use std::time::Duration;

pub(crate) use batch::BatchContext;

/// The limits a webm file must satisfy to be accepted by Telegram
/// as a video sticker.
pub(crate) const MAX_STICKER_BYTES: u64 = 256 * KIB;
pub(crate) const MAX_STICKER_DURATION: Duration = Duration::from_secs(3);
pub(crate) const STICKER_BOUNDING_BOX: u64 = 512;
pub(crate) const MAX_STICKER_FRAME_RATE: u64 = 30;
pub(crate) const STICKER_VIDEO_CODEC: &str = "vp9";
pub(crate) const STICKER_CONTAINER: &str = "webm";

/// Constant quality level for the VP9 encode. Lands well under the size
/// limit for typical sticker-length clips.
pub(crate) const STICKER_CRF: u32 = 32;

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum ScaleFilter {
    Bilinear,
    Neighbor,
}
