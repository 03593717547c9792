use crate::prelude::*;
use async_trait::async_trait;
use std::fmt;

/// Boundary with the external `ffmpeg`/`ffprobe` binaries. The conversion
/// pipeline talks to them only through this trait so that tests can run the
/// whole thing without the real processes.
#[async_trait]
pub(crate) trait Ffmpeg: fmt::Debug + Send + Sync {
    /// Invoke the ffmpeg process with the given arguments.
    async fn ffmpeg(&self, args: Vec<String>) -> Result<Vec<u8>>;

    /// Invoke the ffprobe process with the given arguments and return its stdout.
    async fn ffprobe(&self, args: Vec<String>) -> Result<Vec<u8>>;

    /// Same as [`Self::ffmpeg`], but automatically appends the output path
    /// to the arguments and returns the contents of the file at that path.
    ///
    /// This is useful for mocking to avoid reading files from disk,
    /// especially when they aren't written by the mock.
    async fn ffmpeg_with_output_file(
        &self,
        args: Vec<String>,
        output_file: &Utf8Path,
    ) -> Result<Vec<u8>> {
        let mut args = args;
        args.push(output_file.to_string());

        self.ffmpeg(args).await?;

        fs::read(output_file).await.err_into()
    }
}

#[derive(Debug)]
pub(crate) struct FfmpegProcess;

#[async_trait]
impl Ffmpeg for FfmpegProcess {
    async fn ffmpeg(&self, args: Vec<String>) -> Result<Vec<u8>> {
        crate::util::cmd::ffmpeg(args).await
    }

    async fn ffprobe(&self, args: Vec<String>) -> Result<Vec<u8>> {
        crate::util::cmd::ffprobe(args).await
    }
}
