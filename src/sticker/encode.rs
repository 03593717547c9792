use crate::display;
use crate::ffmpeg::Ffmpeg;
use crate::prelude::*;
use crate::util::iter;
use crate::util::path::PathExt as _;
use buildstructor::buildstructor;
use std::sync::Arc;

/// Runs ffmpeg twice to produce a VP9 webm with the two-pass method from
/// <https://trac.ffmpeg.org/wiki/Encode/VP9>.
pub(crate) struct WebmTwoPass {
    prefix_args: Vec<String>,
    ffmpeg: Arc<dyn Ffmpeg>,
    /// Temp dir where the pass log file and the intermediate output are written
    temp_dir: tempfile::TempDir,
}

#[buildstructor]
impl WebmTwoPass {
    #[builder]
    pub(crate) fn new(
        prefix_args: Vec<String>,
        ffmpeg: Arc<dyn Ffmpeg>,
        temp_dir: tempfile::TempDir,
    ) -> Self {
        Self {
            prefix_args,
            ffmpeg,
            temp_dir,
        }
    }
}

impl WebmTwoPass {
    fn make_args(&self, trailing_args: &[&str]) -> Vec<String> {
        iter::strs(&self.prefix_args)
            .chain(iter::strs(trailing_args))
            .collect()
    }

    pub(crate) async fn run(self) -> Result<Vec<u8>> {
        let start = std::time::Instant::now();

        let null_output = if cfg!(windows) { "NUL" } else { "/dev/null" };

        // First pass only gathers statistics for the log file
        self.ffmpeg
            .ffmpeg(self.make_args(&["-pass", "1", "-f", "null", null_output]))
            .await?;

        let output = self.temp_dir.path().unwrap_utf8().join("output.webm");

        // The second pass goes through a temp file rather than stdout.
        // Piping the webm to stdout produces a file that Telegram Desktop
        // refuses to animate inside text messages for some reason.
        let output = self
            .ffmpeg
            .ffmpeg_with_output_file(self.make_args(&["-pass", "2"]), &output)
            .await?;

        let size = display::human_size(output.len());
        let elapsed = display::elapsed(start);

        debug!("Encoded {size} in {elapsed}");

        Ok(output)
    }
}
