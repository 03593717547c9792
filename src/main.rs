use tracing::error;
use tracing::metadata::LevelFilter;
use tracing_subscriber::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).compact();

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("VIDEO_TO_WEBM_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    if let Err(err) = video_to_webm::run().await {
        error!("Exitting with an error...\n{err:?}");
        std::process::exit(1);
    }
}
