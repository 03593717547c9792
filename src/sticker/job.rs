use super::encode::WebmTwoPass;
use super::plan::ConversionPlan;
use super::probe::MediaProbe;
use super::validate::{self, Violation};
use super::{ScaleFilter, MAX_STICKER_DURATION, STICKER_CRF};
use crate::ffmpeg::Ffmpeg;
use crate::prelude::*;
use crate::util::input;
use crate::util::iter;
use crate::util::path::Utf8StemmedPathBuf;
use std::sync::Arc;

/// Flags shared by all jobs of a single run.
#[derive(Debug)]
pub(crate) struct JobOptions {
    /// `None` means the user is asked per file
    pub(crate) scale_filter: Option<ScaleFilter>,
    pub(crate) auto_confirm: bool,
    pub(crate) ffmpeg: Arc<dyn Ffmpeg>,
}

/// One input-to-output conversion attempt.
pub(crate) struct Job {
    pub(crate) options: Arc<JobOptions>,
    pub(crate) input: Utf8StemmedPathBuf,
    pub(crate) output: Utf8PathBuf,
}

#[derive(Debug)]
pub(crate) enum JobOutcome {
    Converted { violations: Vec<Violation> },
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum JobError {
    #[error("input path does not exist: `{path}`")]
    InputNotFound { path: Utf8PathBuf },

    #[error("failed to probe the media file `{path}`")]
    Probe {
        path: Utf8PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to produce the output for `{path}`")]
    Transcode {
        path: Utf8PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read the answer to an interactive prompt")]
    Prompt {
        #[source]
        source: anyhow::Error,
    },
}

impl Job {
    #[instrument(name = "convert", skip_all, fields(input = %self.input.as_path()))]
    pub(crate) async fn run(self) -> Result<JobOutcome, JobError> {
        let probe = MediaProbe::read(&*self.options.ffmpeg, self.input.as_path())
            .await
            .map_err(|source| JobError::Probe {
                path: self.input.as_path().to_owned(),
                source,
            })?;

        debug!(?probe, "Probed the input");

        if probe.duration > MAX_STICKER_DURATION && !self.confirm_over_duration(&probe).await? {
            info!("⏭️ Skipped on user request");
            return Ok(JobOutcome::Skipped);
        }

        let plan = ConversionPlan::new(&probe, self.resolve_scale_filter().await?);

        debug!(?plan, "Computed the conversion plan");

        if !self.confirm_overwrite().await? {
            info!("⏭️ Skipped, the existing output file is left untouched");
            return Ok(JobOutcome::Skipped);
        }

        let bytes = self
            .transcode(&plan)
            .await
            .map_err(|source| JobError::Transcode {
                path: self.input.as_path().to_owned(),
                source,
            })?;

        fs::write(&self.output, &bytes)
            .await
            .context("Failed to write the output file")
            .map_err(|source| JobError::Transcode {
                path: self.output.clone(),
                source,
            })?;

        let out_probe = MediaProbe::read(&*self.options.ffmpeg, &self.output)
            .await
            .map_err(|source| JobError::Probe {
                path: self.output.clone(),
                source,
            })?;

        let violations = validate::check_sticker(&out_probe);

        for violation in &violations {
            warn!("⚠️ The output is not a valid sticker: {violation}");
        }

        let out_file = nu_ansi_term::Color::Magenta.bold().paint(self.output.as_str());

        info!("🔥 Saved the output at {out_file}");

        Ok(JobOutcome::Converted { violations })
    }

    /// The video is never trimmed or sped up automatically, so an
    /// over-duration source produces an output that fails validation.
    /// The user gets a say before the encoding time is spent on it.
    async fn confirm_over_duration(&self, probe: &MediaProbe) -> Result<bool, JobError> {
        let duration = probe.duration;

        let message = format!(
            "The input is {duration:.1?} long, which exceeds the {MAX_STICKER_DURATION:?} \
            sticker limit, and it won't be trimmed automatically. \
            Convert it anyway?"
        );

        input::confirm(&message, true, self.options.auto_confirm)
            .await
            .map_err(|source| JobError::Prompt { source })
    }

    async fn confirm_overwrite(&self) -> Result<bool, JobError> {
        let exists = self
            .output
            .try_exists()
            .with_context(|| format!("Failed to check if the output file exists: `{}`", self.output))
            .map_err(|source| JobError::Transcode {
                path: self.output.clone(),
                source,
            })?;

        if !exists {
            return Ok(true);
        }

        let message = format!("The output file `{}` already exists. Overwrite it?", self.output);

        input::confirm(&message, true, self.options.auto_confirm)
            .await
            .map_err(|source| JobError::Prompt { source })
    }

    async fn resolve_scale_filter(&self) -> Result<ScaleFilter, JobError> {
        if let Some(scale_filter) = self.options.scale_filter {
            return Ok(scale_filter);
        }

        let nearest = input::confirm(
            "Use nearest-neighbor scaling instead of the default bilinear?",
            false,
            self.options.auto_confirm,
        )
        .await
        .map_err(|source| JobError::Prompt { source })?;

        Ok(if nearest {
            ScaleFilter::Neighbor
        } else {
            ScaleFilter::Bilinear
        })
    }

    async fn transcode(&self, plan: &ConversionPlan) -> Result<Vec<u8>> {
        let temp_dir = tempfile::tempdir()?;
        let pass_log_file = temp_dir
            .path()
            .join("ffmpeg2pass")
            .to_string_lossy()
            .into_owned();

        let loop_args = (plan.extra_loops > 0)
            .then(|| ["-stream_loop".to_owned(), plan.extra_loops.to_string()])
            .into_iter()
            .flatten();

        let prefix_args = iter::strs(["-y"])
            .chain(loop_args)
            .chain(iter::strs(["-i", self.input.as_path().as_str()]))
            .chain(iter::strs([
                "-fps_mode",
                "passthrough",
                "-vcodec",
                "libvpx-vp9",
                // Transparency survives the conversion with this pixel format
                "-pix_fmt",
                "yuva420p",
                // From the docs: constant quality 2-pass is invoked by setting
                // -b:v to zero and specifiying a quality level using the -crf switch
                "-b:v",
                "0",
                "-crf",
            ]))
            .chain([STICKER_CRF.to_string()])
            .chain(iter::strs([
                // Audio streams must be removed from the output
                "-an",
                "-filter:v",
            ]))
            .chain([plan.video_filter()])
            .chain(iter::strs(["-passlogfile"]))
            .chain([pass_log_file])
            .collect();

        WebmTwoPass::builder()
            .prefix_args(prefix_args)
            .ffmpeg(self.options.ffmpeg.clone())
            .temp_dir(temp_dir)
            .build()
            .run()
            .await
    }
}
