use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lastseen_face::blob::FsBlobStore;
use lastseen_face::extract::RemoteExtractor;
use lastseen_face::service::{FaceService, ImageSource};
use lastseen_face::store::FileStore;
use lastseen_face::{config, http};
use log::info;

#[derive(Parser)]
#[command(name = "lastseen-face")]
#[command(version, about = "Face recognition matching service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve,
    /// Enroll a face from a local image file
    Enroll {
        /// User ID to enroll under
        #[arg(short, long)]
        user: String,
        /// Path to the image
        image: PathBuf,
    },
    /// Identify faces in a local image file
    Recognize {
        /// Path to the image
        image: PathBuf,
    },
    /// Open config file in editor
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(None)?;

    match cli.command {
        Commands::Serve => serve(&cfg).await,
        Commands::Enroll { user, image } => {
            let service = build_service(&cfg)?;
            let data = std::fs::read(&image)
                .with_context(|| format!("reading image {}", image.display()))?;
            let id = service.enroll(&user, ImageSource::Bytes(data)).await?;
            info!("✓ Face enrolled for user {}: {}", user, id);
            Ok(())
        }
        Commands::Recognize { image } => {
            let service = build_service(&cfg)?;
            let data = std::fs::read(&image)
                .with_context(|| format!("reading image {}", image.display()))?;
            let outcome = service.recognize(ImageSource::Bytes(data)).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Commands::Config => open_config(),
    }
}

fn build_service(cfg: &config::Config) -> Result<Arc<FaceService>> {
    let store = FileStore::open(&cfg.data_dir).context("opening enrollment store")?;
    let blobs = FsBlobStore::open(&cfg.data_dir).context("opening blob store")?;
    let extractor = RemoteExtractor::new(cfg.extractor_url.clone());
    Ok(Arc::new(FaceService::new(
        Arc::new(store),
        Arc::new(blobs),
        Arc::new(extractor),
        cfg.threshold,
        Duration::from_secs(cfg.op_timeout_secs),
    )))
}

async fn serve(cfg: &config::Config) -> Result<()> {
    let service = build_service(cfg)?;
    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(&cfg.listen)
        .await
        .with_context(|| format!("binding {}", cfg.listen))?;
    info!("Listening on http://{}", cfg.listen);
    info!("Match threshold: {:.3}", cfg.threshold);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}

fn open_config() -> Result<()> {
    let config_path = config::CONFIG_PATH.as_os_str();
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
