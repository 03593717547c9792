use super::probe::MediaProbe;
use crate::ffmpeg::Ffmpeg;
use crate::prelude::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A 0.8 second 800x600 GIF at 60 fps.
pub(crate) const GIF_PROBE_JSON: &str = r#"{
    "streams": [
        {
            "codec_type": "video",
            "codec_name": "gif",
            "width": 800,
            "height": 600,
            "avg_frame_rate": "60/1"
        }
    ],
    "format": {"format_name": "gif", "duration": "0.800000", "size": "123456"}
}"#;

/// A 10 second 1920x1080 mp4 with an audio track.
pub(crate) const LONG_MP4_PROBE_JSON: &str = r#"{
    "streams": [
        {
            "codec_type": "video",
            "codec_name": "h264",
            "width": 1920,
            "height": 1080,
            "avg_frame_rate": "30/1"
        },
        {"codec_type": "audio", "codec_name": "aac"}
    ],
    "format": {
        "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
        "duration": "10.000000",
        "size": "2097152"
    }
}"#;

/// A well-formed sticker: VP9 webm, 512x384, 2.4 s, 96 KiB, no audio.
pub(crate) const WEBM_PROBE_JSON: &str = r#"{
    "streams": [
        {
            "codec_type": "video",
            "codec_name": "vp9",
            "width": 512,
            "height": 384,
            "avg_frame_rate": "30/1"
        }
    ],
    "format": {"format_name": "matroska,webm", "duration": "2.400000", "size": "98304"}
}"#;

/// A probe that satisfies every sticker constraint; tests mutate the
/// fields they care about.
pub(crate) fn stub_probe() -> MediaProbe {
    MediaProbe {
        width: 512,
        height: 512,
        duration: Duration::from_secs(2),
        frame_rate: 30.,
        has_audio: false,
        codec: "vp9".to_owned(),
        container: "matroska,webm".to_owned(),
        file_size: 100 * 1024,
    }
}

#[derive(Debug)]
pub(crate) struct SharedMockFfmpeg(Mutex<MockFfmpeg>);

#[derive(Debug)]
pub(crate) struct MockFfmpeg {
    /// Canned ffprobe outputs keyed by the probed path
    pub(crate) probes: HashMap<String, String>,
    /// Bytes the fake second encoding pass produces
    pub(crate) transcode_output: Vec<u8>,
    pub(crate) ffmpeg_args_log: Vec<Vec<String>>,
    pub(crate) ffprobe_args_log: Vec<Vec<String>>,
}

impl SharedMockFfmpeg {
    pub(crate) fn new(transcode_output: Vec<u8>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(MockFfmpeg {
            probes: Default::default(),
            transcode_output,
            ffmpeg_args_log: Default::default(),
            ffprobe_args_log: Default::default(),
        })))
    }

    /// Registers the canned ffprobe output for a path. Probing a path
    /// without a canned output fails, which doubles as the "unsupported
    /// media" case.
    pub(crate) fn add_probe(&self, path: impl Into<String>, json: impl Into<String>) {
        self.0.lock().unwrap().probes.insert(path.into(), json.into());
    }

    pub(crate) fn unwrap(self: Arc<Self>) -> MockFfmpeg {
        Arc::try_unwrap(self).unwrap().0.into_inner().unwrap()
    }
}

#[async_trait]
impl Ffmpeg for SharedMockFfmpeg {
    async fn ffmpeg(&self, args: Vec<String>) -> Result<Vec<u8>> {
        self.0.lock().unwrap().ffmpeg_args_log.push(args);

        Ok(vec![])
    }

    async fn ffprobe(&self, args: Vec<String>) -> Result<Vec<u8>> {
        let mut me = self.0.lock().unwrap();

        let input_pos = args.iter().position(|arg| arg == "-i").unwrap();
        let path = args[input_pos + 1].clone();

        me.ffprobe_args_log.push(args);

        let json = me
            .probes
            .get(&path)
            .with_context(|| format!("No canned probe output for `{path}`"))?;

        Ok(json.clone().into_bytes())
    }

    async fn ffmpeg_with_output_file(
        &self,
        args: Vec<String>,
        output_file: &Utf8Path,
    ) -> Result<Vec<u8>> {
        let mut args = args;
        args.push(output_file.to_string());

        let mut me = self.0.lock().unwrap();
        me.ffmpeg_args_log.push(args);

        Ok(me.transcode_output.clone())
    }
}
