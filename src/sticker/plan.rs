use super::probe::MediaProbe;
use super::{ScaleFilter, MAX_STICKER_DURATION, MAX_STICKER_FRAME_RATE, STICKER_BOUNDING_BOX};

/// Output parameters computed from the input probe and the sticker limits.
/// Derived deterministically; inputs that can't satisfy the limits (e.g.
/// over-duration sources) still get a plan and fail validation later.
#[derive(Debug, Clone)]
pub(crate) struct ConversionPlan {
    pub(crate) width: u64,
    pub(crate) height: u64,
    pub(crate) scale_filter: ScaleFilter,
    pub(crate) fps_cap: Option<u64>,
    /// Number of extra times a short GIF input is replayed so that the
    /// sticker isn't over after a single blink
    pub(crate) extra_loops: u64,
}

impl ConversionPlan {
    pub(crate) fn new(probe: &MediaProbe, scale_filter: ScaleFilter) -> Self {
        let (width, height) = fit_into_bounding_box(probe.width, probe.height);

        let fps_cap = (probe.frame_rate > MAX_STICKER_FRAME_RATE as f64)
            .then_some(MAX_STICKER_FRAME_RATE);

        Self {
            width,
            height,
            scale_filter,
            fps_cap,
            extra_loops: extra_loops(probe),
        }
    }

    /// Renders the `-filter:v` argument of the transcoding call.
    pub(crate) fn video_filter(&self) -> String {
        let Self {
            width,
            height,
            scale_filter,
            ..
        } = self;

        let scale = format!("scale={width}:{height}:flags={scale_filter}");

        match self.fps_cap {
            Some(fps) => format!("{scale},fps={fps}"),
            None => scale,
        }
    }
}

fn extra_loops(probe: &MediaProbe) -> u64 {
    if !probe.is_gif() || probe.duration.is_zero() || probe.duration >= MAX_STICKER_DURATION {
        return 0;
    }

    let fits = MAX_STICKER_DURATION.as_secs_f64() / probe.duration.as_secs_f64();

    // The total duration must stay under the limit, so only whole extra
    // replays beyond the first one count
    (fits.floor() as u64).saturating_sub(1)
}

/// Telegram wants the longer side to be exactly the bounding box size and
/// VP9 requires even dimensions, which are floored to keep the bound.
fn fit_into_bounding_box(width: u64, height: u64) -> (u64, u64) {
    let max = STICKER_BOUNDING_BOX;

    let (width, height) = if width >= height {
        (max, height * max / width)
    } else {
        (width * max / height, max)
    };

    (round_to_even(width), round_to_even(height))
}

fn round_to_even(side: u64) -> u64 {
    (side & !1).max(2)
}
