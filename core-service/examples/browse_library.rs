//! Browse a picture directory through the method channel
//!
//! Run with:
//! ```bash
//! # Default picture directory, pretty logs
//! cargo run -p core-service --example browse_library
//!
//! # Explicit directory, JSON logs
//! cargo run -p core-service --example browse_library -- ~/Pictures json
//! ```

use bridge_traits::LogLevel;
use core_runtime::config::BridgeConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use serde_json::{json, Value};
use std::env;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some(_) => LogFormat::Pretty,
        None => LogFormat::default(),
    };
    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )
    .expect("Failed to initialize logging");

    let mut builder = BridgeConfig::builder().auto_grant_consent(true);
    if let Some(root) = args.get(1) {
        builder = builder.library_root(root);
    }
    let config = builder.build().expect("Invalid bridge configuration");

    let channel = match core_service::start_channel(config).await {
        Ok(channel) => channel,
        Err(err) => {
            error!(error = %err, "Could not start photo bridge");
            return;
        }
    };

    let granted = channel
        .invoke_method("initialize", None)
        .await
        .expect("channel closed");
    info!(?granted, "Initialized");

    let albums = channel
        .invoke_method("albums", Some(json!(1)))
        .await
        .expect("channel closed");
    let Ok(albums) = albums else {
        warn!("Album listing failed");
        return;
    };
    for record in albums.into_records().unwrap_or_default() {
        let album: Value = serde_json::from_str(&record).expect("album record");
        info!(
            title = %album["title"],
            images = %album["imageCount"],
            "Album"
        );
    }

    let latest = channel
        .invoke_method("latest_images", Some(json!(5)))
        .await
        .expect("channel closed");
    let records = latest.ok().and_then(|r| r.into_records()).unwrap_or_default();
    let Some(newest) = records.first() else {
        info!("Library has no images");
        return;
    };
    let newest: Value = serde_json::from_str(newest).expect("image record");

    let reply = channel
        .invoke_method(
            "image_bytes",
            Some(json!({"id": newest["id"], "pixelWidth": 256, "pixelHeight": 256})),
        )
        .await
        .expect("channel closed");
    match reply {
        Ok(value) => {
            let len = value.into_bytes().map(|b| b.len()).unwrap_or(0);
            info!(len, "Rendered newest image as JPEG");
        }
        Err(err) => warn!(code = %err.code, message = %err.message, "Render failed"),
    }
}
