//! End-to-end over the desktop bridges

#![cfg(feature = "desktop-shims")]

use core_runtime::config::BridgeConfig;
use core_service::{bootstrap, start_channel, ErrorCode, ImageSummary, ServiceError};
use image::{DynamicImage, ImageFormat};
use serde_json::{json, Value};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

fn write_image(root: &Path, relative: &str, width: u32, height: u32, age_secs: u64) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    DynamicImage::new_rgb8(width, height)
        .save_with_format(&path, ImageFormat::from_path(&path).unwrap())
        .unwrap();
    let modified = UNIX_EPOCH + Duration::from_secs(1_700_000_000 - age_secs);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

fn library() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "Trips/beach.jpg", 400, 300, 300);
    write_image(dir.path(), "Trips/mountain.png", 300, 600, 100);
    write_image(dir.path(), "Trips/city.jpg", 640, 480, 200);
    write_image(dir.path(), "loose.png", 20, 10, 10);
    dir
}

#[tokio::test]
async fn test_trips_scenario_and_byte_fetch() {
    let dir = library();
    let config = BridgeConfig::builder()
        .library_root(dir.path())
        .auto_grant_consent(true)
        .build()
        .unwrap();
    let channel = start_channel(config).await.unwrap();

    let granted = channel.invoke_method("initialize", None).await.unwrap();
    assert_eq!(granted.unwrap().as_bool(), Some(true));

    let albums = channel
        .invoke_method("albums", Some(json!(1)))
        .await
        .unwrap()
        .unwrap()
        .into_records()
        .unwrap();
    assert_eq!(albums.len(), 1);
    let trips: Value = serde_json::from_str(&albums[0]).unwrap();
    assert_eq!(trips["title"], "Trips");
    assert_eq!(trips["imageCount"], 3);
    assert_eq!(trips["coverImg"]["pixelWidth"], 300);
    assert_eq!(trips["coverImg"]["pixelHeight"], 600);

    let id = trips["coverImg"]["id"].as_str().unwrap().to_string();
    let bytes = channel
        .invoke_method(
            "image_bytes",
            Some(json!({"id": id, "pixelWidth": 200, "pixelHeight": 200})),
        )
        .await
        .unwrap()
        .unwrap()
        .into_bytes()
        .unwrap();
    assert!(!bytes.is_empty());
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 200));

    let latest = channel
        .invoke_method("latest_images", Some(json!(2)))
        .await
        .unwrap()
        .unwrap()
        .into_records()
        .unwrap();
    let latest: Vec<ImageSummary> = latest
        .iter()
        .map(|r| serde_json::from_str(r).unwrap())
        .collect();
    assert_eq!(latest.len(), 2);
    assert_eq!((latest[0].pixel_width, latest[0].pixel_height), (20, 10));
    assert_eq!(latest[0].creation_date, "2023-11-14T22:13:10Z");
}

#[tokio::test]
async fn test_unknown_id_over_desktop_bridge() {
    let dir = library();
    let config = BridgeConfig::builder()
        .library_root(dir.path())
        .auto_grant_consent(true)
        .build()
        .unwrap();
    let channel = start_channel(config).await.unwrap();
    channel.invoke_method("initialize", None).await.unwrap().unwrap();

    let reply = channel
        .invoke_method(
            "image_bytes",
            Some(json!({"id": "abc", "pixelWidth": 200, "pixelHeight": 200})),
        )
        .await
        .unwrap();
    assert_eq!(reply.unwrap_err().code, ErrorCode::ImgNotFound);
}

#[tokio::test]
async fn test_denied_consent_is_persisted() {
    let dir = library();
    let state = dir.path().join(".state").join("consent.json");
    let config = BridgeConfig::builder()
        .library_root(dir.path())
        .consent_state_path(&state)
        .build()
        .unwrap();

    let service = bootstrap(config.clone()).await.unwrap();
    assert!(!service.has_permission());
    assert!(service.initialize().await.is_none());
    assert!(state.exists());

    // A fresh bridge reads the stored answer instead of prompting again.
    let granting = BridgeConfig {
        auto_grant_consent: true,
        ..config
    };
    let service = bootstrap(granting).await.unwrap();
    assert!(service.initialize().await.is_none());
}

#[tokio::test]
async fn test_missing_library_root_fails_bootstrap() {
    let config = BridgeConfig::builder()
        .library_root("/definitely/not/a/photo/library")
        .build()
        .unwrap();
    let result = bootstrap(config).await;
    assert!(matches!(result, Err(ServiceError::InitializationFailed(_))));
}
