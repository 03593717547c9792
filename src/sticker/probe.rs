use crate::ffmpeg::Ffmpeg;
use crate::prelude::*;
use crate::util::iter;
use serde::Deserialize;
use std::time::Duration;

/// Read-only facts about a media file, gathered with a single `ffprobe`
/// call. Immutable once read.
#[derive(Debug, Clone)]
pub(crate) struct MediaProbe {
    pub(crate) width: u64,
    pub(crate) height: u64,
    pub(crate) duration: Duration,
    pub(crate) frame_rate: f64,
    pub(crate) has_audio: bool,
    pub(crate) codec: String,
    pub(crate) container: String,
    pub(crate) file_size: u64,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u64>,
    height: Option<u64>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: String,
    duration: Option<String>,
    size: String,
}

impl MediaProbe {
    pub(crate) async fn read(ffmpeg: &dyn Ffmpeg, path: &Utf8Path) -> Result<Self> {
        let args = iter::strs([
            "-show_entries",
            "stream=codec_type,codec_name,width,height,avg_frame_rate,duration\
            :format=format_name,duration,size",
            "-print_format",
            "json",
            "-i",
            path.as_str(),
        ])
        .collect();

        let output = ffmpeg.ffprobe(args).await?;

        let output: FfprobeOutput =
            serde_json::from_slice(&output).context("Failed to parse the ffprobe output")?;

        Self::from_ffprobe(output)
    }

    fn from_ffprobe(output: FfprobeOutput) -> Result<Self> {
        ensure!(!output.streams.is_empty(), "The file has no media streams");

        let video = output
            .streams
            .iter()
            .find(|stream| stream.codec_type == "video")
            .context("The file has no video stream")?;

        let has_audio = output
            .streams
            .iter()
            .any(|stream| stream.codec_type == "audio");

        let width = video.width.context("The video stream reports no width")?;
        let height = video.height.context("The video stream reports no height")?;

        ensure!(width > 0 && height > 0, "The video stream has zero dimensions");

        let frame_rate = video
            .avg_frame_rate
            .as_deref()
            .context("The video stream reports no frame rate")
            .and_then(parse_frame_rate)?;

        // Matroska-like containers report the duration on the format level
        // only, so fall back to it when the stream has none
        let duration = video
            .duration
            .as_deref()
            .or(output.format.duration.as_deref())
            .context("Could not determine the media duration")?
            .parse::<f64>()
            .context("Failed to parse the media duration")?;

        ensure!(
            duration.is_finite() && duration >= 0.,
            "The media duration is out of range: {duration}"
        );

        let file_size = output
            .format
            .size
            .parse()
            .context("Failed to parse the media file size")?;

        Ok(Self {
            width,
            height,
            duration: Duration::from_secs_f64(duration),
            frame_rate,
            has_audio,
            codec: video.codec_name.clone().unwrap_or_default(),
            container: output.format.format_name,
            file_size,
        })
    }

    pub(crate) fn is_gif(&self) -> bool {
        self.codec == "gif"
    }
}

fn parse_frame_rate(arg: &str) -> Result<f64> {
    let (num, den) = arg
        .split_once('/')
        .with_context(|| format!("Unexpected frame rate format: `{arg}`"))?;

    let num: f64 = num.parse().context("Failed to parse the frame rate numerator")?;
    let den: f64 = den.parse().context("Failed to parse the frame rate denominator")?;

    ensure!(den != 0., "The frame rate denominator is zero");

    Ok(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn parse(json: &str) -> Result<MediaProbe> {
        MediaProbe::from_ffprobe(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn parses_a_gif_probe() {
        let probe = parse(
            r#"{
                "streams": [
                    {
                        "codec_type": "video",
                        "codec_name": "gif",
                        "width": 800,
                        "height": 600,
                        "avg_frame_rate": "25/1"
                    }
                ],
                "format": {"format_name": "gif", "duration": "2.000000", "size": "123456"}
            }"#,
        )
        .unwrap();

        expect![[r#"
            MediaProbe {
                width: 800,
                height: 600,
                duration: 2s,
                frame_rate: 25.0,
                has_audio: false,
                codec: "gif",
                container: "gif",
                file_size: 123456,
            }"#]]
        .assert_eq(&format!("{probe:#?}"));

        assert!(probe.is_gif());
    }

    #[test]
    fn detects_an_audio_stream_and_stream_level_duration() {
        let probe = parse(
            r#"{
                "streams": [
                    {
                        "codec_type": "video",
                        "codec_name": "h264",
                        "width": 1920,
                        "height": 1080,
                        "avg_frame_rate": "30000/1001",
                        "duration": "2.500000"
                    },
                    {"codec_type": "audio", "codec_name": "aac"}
                ],
                "format": {
                    "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                    "duration": "2.600000",
                    "size": "1048576"
                }
            }"#,
        )
        .unwrap();

        assert!(probe.has_audio);
        assert_eq!(probe.duration, Duration::from_secs_f64(2.5));
        assert_eq!(probe.frame_rate, 30000. / 1001.);
        assert!(!probe.is_gif());
    }

    #[test]
    fn no_streams_is_an_error() {
        let err = parse(r#"{"streams": [], "format": {"format_name": "gif", "size": "1"}}"#)
            .unwrap_err();

        expect!["The file has no media streams"].assert_eq(&err.to_string());
    }

    #[test]
    fn audio_only_file_is_an_error() {
        let err = parse(
            r#"{
                "streams": [{"codec_type": "audio", "codec_name": "mp3"}],
                "format": {"format_name": "mp3", "duration": "60.0", "size": "1"}
            }"#,
        )
        .unwrap_err();

        expect!["The file has no video stream"].assert_eq(&err.to_string());
    }

    #[test]
    fn frame_rate_formats() {
        assert_eq!(parse_frame_rate("25/1").unwrap(), 25.);
        assert_eq!(parse_frame_rate("30000/1001").unwrap(), 30000. / 1001.);

        parse_frame_rate("0/0").unwrap_err();
        parse_frame_rate("25").unwrap_err();
    }
}
