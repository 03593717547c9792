use super::job::{Job, JobError, JobOptions, JobOutcome};
use super::ScaleFilter;
use crate::ffmpeg::Ffmpeg;
use crate::prelude::*;
use crate::util::path::Utf8StemmedPathBuf;
use buildstructor::buildstructor;
use std::sync::Arc;

/// The whole conversion run: expands the input paths into jobs and processes
/// them sequentially, one external process at a time. A failed job is
/// reported and does not stop the remaining ones.
pub(crate) struct BatchContext {
    inputs: Vec<Utf8PathBuf>,
    output_dir: Utf8PathBuf,
    options: Arc<JobOptions>,
}

#[buildstructor]
impl BatchContext {
    #[builder]
    pub(crate) fn new(
        inputs: Vec<Utf8PathBuf>,
        output_dir: Utf8PathBuf,
        scale_filter: Option<ScaleFilter>,
        auto_confirm: bool,
        ffmpeg: Option<Arc<dyn Ffmpeg>>,
    ) -> Self {
        let options = JobOptions {
            scale_filter,
            auto_confirm,
            ffmpeg: ffmpeg.unwrap_or_else(|| Arc::new(crate::ffmpeg::FfmpegProcess)),
        };

        Self {
            inputs,
            output_dir,
            options: Arc::new(options),
        }
    }
}

impl BatchContext {
    pub(crate) async fn run(self) -> Result {
        ensure!(!self.inputs.is_empty(), "No input paths were specified");

        let (input_files, mut failed) = self.expand_inputs().await?;

        crate::fs::validate_unique_output_names(&input_files)?;

        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| {
                format!("Failed to create the output directory `{}`", self.output_dir)
            })?;

        let jobs: Vec<_> = input_files
            .into_iter()
            .map(|input| {
                let output = self.output_dir.join(format!("{}.webm", input.file_stem()));
                Job {
                    options: self.options.clone(),
                    input,
                    output,
                }
            })
            .collect();

        let total = jobs.len() + failed;
        let mut converted = 0usize;
        let mut skipped = 0usize;

        for (id, job) in jobs.into_iter().enumerate() {
            let result = job.run().instrument(info_span!("job", id = id + 1)).await;

            match result {
                Ok(JobOutcome::Converted { .. }) => converted += 1,
                Ok(JobOutcome::Skipped) => skipped += 1,
                Err(err) => {
                    failed += 1;

                    let err = anyhow::Error::from(err);
                    error!("💥 A job failed...\n{err:?}");
                }
            }
        }

        info!("Converted {converted} of {total} file(s), skipped {skipped}");

        if failed > 0 {
            bail!("{failed} of {total} job(s) failed");
        }

        info!("🎉 All done!");

        Ok(())
    }

    async fn expand_inputs(&self) -> Result<(Vec<Utf8StemmedPathBuf>, usize)> {
        let mut files = Vec::new();
        let mut failed = 0usize;

        for input in &self.inputs {
            let exists = input
                .try_exists()
                .with_context(|| format!("Failed to check if the input path exists: `{input}`"))?;

            if !exists {
                let err = JobError::InputNotFound {
                    path: input.clone(),
                };
                error!("💥 {err}");
                failed += 1;
                continue;
            }

            files.extend(crate::fs::files(input).await?);
        }

        let files = files.into_iter().map(TryInto::try_into).try_collect()?;

        Ok((files, failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticker::testing::{SharedMockFfmpeg, GIF_PROBE_JSON, WEBM_PROBE_JSON};
    use expect_test::expect;

    fn context(
        mock: &Arc<SharedMockFfmpeg>,
        inputs: Vec<Utf8PathBuf>,
        output_dir: &Utf8Path,
    ) -> BatchContext {
        let ffmpeg: Arc<dyn Ffmpeg> = mock.clone();

        BatchContext::builder()
            .inputs(inputs)
            .output_dir(output_dir.to_owned())
            .scale_filter(ScaleFilter::Bilinear)
            .auto_confirm(true)
            .ffmpeg(ffmpeg)
            .build()
    }

    #[test_log::test(tokio::test)]
    async fn continues_after_a_failed_job() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(temp_dir.path()).unwrap();

        let input_dir = root.join("in");
        let output_dir = root.join("out");
        fs::create_dir_all(&input_dir).await.unwrap();
        fs::write(input_dir.join("a.gif"), "a").await.unwrap();
        fs::write(input_dir.join("b.bin"), "b").await.unwrap();

        let mock = SharedMockFfmpeg::new(b"webm".to_vec());
        mock.add_probe(input_dir.join("a.gif").as_str(), GIF_PROBE_JSON);
        mock.add_probe(output_dir.join("a.webm").as_str(), WEBM_PROBE_JSON);
        // No canned probe for `b.bin`, so its job fails

        let err = context(&mock, vec![input_dir], &output_dir)
            .run()
            .await
            .unwrap_err();

        expect!["1 of 2 job(s) failed"].assert_eq(&err.to_string());

        // The convertible file still made it through
        assert_eq!(fs::read(output_dir.join("a.webm")).await.unwrap(), b"webm");
    }

    #[test_log::test(tokio::test)]
    async fn missing_input_is_reported_and_the_rest_proceeds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(temp_dir.path()).unwrap();

        let input = root.join("blob.gif");
        let output_dir = root.join("out");
        fs::write(&input, "gif").await.unwrap();

        let mock = SharedMockFfmpeg::new(b"webm".to_vec());
        mock.add_probe(input.as_str(), GIF_PROBE_JSON);
        mock.add_probe(output_dir.join("blob.webm").as_str(), WEBM_PROBE_JSON);

        let err = context(&mock, vec![root.join("no-such-file.gif"), input], &output_dir)
            .run()
            .await
            .unwrap_err();

        expect!["1 of 2 job(s) failed"].assert_eq(&err.to_string());

        assert_eq!(
            fs::read(output_dir.join("blob.webm")).await.unwrap(),
            b"webm"
        );
    }

    #[test_log::test(tokio::test)]
    async fn colliding_input_names_abort_the_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(temp_dir.path()).unwrap();

        fs::write(root.join("a.gif"), "").await.unwrap();
        fs::write(root.join("a.mp4"), "").await.unwrap();

        let mock = SharedMockFfmpeg::new(vec![]);

        let err = context(
            &mock,
            vec![root.join("a.gif"), root.join("a.mp4")],
            &root.join("out"),
        )
        .run()
        .await
        .unwrap_err();

        assert!(err.to_string().contains("unique file names"));
    }
}
