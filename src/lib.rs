mod display;
mod ffmpeg;
mod fs;
mod prelude;
mod sticker;
mod util;

use clap::Parser;
use prelude::*;
use sticker::{BatchContext, ScaleFilter};

/// Convert videos and GIFs into Telegram-compatible webm video stickers
/// using ffmpeg.
///
/// Every input is scaled so that its longer side fits the sticker bounding
/// box, the audio is dropped and the result is encoded as VP9 webm with the
/// two-pass method described in <https://trac.ffmpeg.org/wiki/Encode/VP9>.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Input files or folders. Folders are expanded to the files under them,
    /// recursively. Prompted interactively when omitted
    #[arg(short, long, num_args = 0..)]
    input: Vec<Utf8PathBuf>,

    /// Folder where the converted stickers are put. Created if absent
    #[arg(short, long, default_value = "output")]
    output: Utf8PathBuf,

    /// Use nearest-neighbor scaling instead of the default bilinear.
    /// Pixel art usually survives the downscale better with this flag
    #[arg(short, long, overrides_with = "no_nearest")]
    nearest: bool,

    /// Use bilinear scaling without asking
    #[arg(long, overrides_with = "nearest")]
    no_nearest: bool,

    /// Assume the default answer for every interactive prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

impl Args {
    fn scale_filter(&self) -> Option<ScaleFilter> {
        match (self.nearest, self.no_nearest) {
            (true, _) => Some(ScaleFilter::Neighbor),
            (_, true) => Some(ScaleFilter::Bilinear),
            (false, false) => None,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let scale_filter = args.scale_filter();

    let inputs = if args.input.is_empty() {
        util::input::read_path_list().await?
    } else {
        args.input
    };

    BatchContext::builder()
        .inputs(inputs)
        .output_dir(args.output)
        .and_scale_filter(scale_filter)
        .auto_confirm(args.yes)
        .build()
        .run()
        .await
}
