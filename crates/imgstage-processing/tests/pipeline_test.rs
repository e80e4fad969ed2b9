//! End-to-end pipeline tests against a temporary storage root.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use imgstage_core::{ErrorCode, UploadConfig};
use imgstage_processing::pipeline::{self, PipelineStage};
use imgstage_storage::LocalStorage;
use serde_json::json;
use tempfile::tempdir;

/// PNG-encoded master fixture with distinct quadrant colors.
fn master_png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = RgbaImage::from_pixel(width, height, Rgba([40, 80, 120, 255]));
    for y in 0..height / 2 {
        for x in 0..width / 2 {
            buf.put_pixel(x, y, Rgba([220, 60, 20, 255]));
        }
    }
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(buf)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

fn config(location: &std::path::Path, extra: serde_json::Value) -> UploadConfig {
    let mut overrides = json!({
        "location": location.to_str().unwrap(),
        "fileNameLen": 12,
        "dirFormat": "yyyy/mm",
    });
    overrides
        .as_object_mut()
        .unwrap()
        .extend(extra.as_object().unwrap().clone());
    UploadConfig::resolve(overrides).unwrap()
}

#[tokio::test]
async fn test_happy_path_single_size() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let config = config(
        dir.path(),
        json!({"sizes": [{"suffix": "lg", "width": 100, "height": 100}]}),
    );

    let state = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(master_png(400, 300)),
    )
    .await
    .unwrap();

    // Exactly one output at <dir>/<name>.lg.jpg, master removed
    let variant = state.variant_path("lg", "jpg");
    assert!(variant.exists());
    assert!(!state.path.exists());

    let decoded = image::load_from_memory(&std::fs::read(&variant).unwrap()).unwrap();
    assert_eq!(decoded.dimensions(), (100, 100));
}

#[tokio::test]
async fn test_two_sizes_each_reflect_own_dimensions() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let config = config(
        dir.path(),
        json!({"sizes": [
            {"suffix": "lg", "width": 200, "height": 120},
            {"suffix": "sm", "width": 40, "height": 40},
        ]}),
    );

    let state = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(master_png(400, 300)),
    )
    .await
    .unwrap();

    let lg = image::load_from_memory(&std::fs::read(state.variant_path("lg", "jpg")).unwrap())
        .unwrap();
    let sm = image::load_from_memory(&std::fs::read(state.variant_path("sm", "jpg")).unwrap())
        .unwrap();
    assert_eq!(lg.dimensions(), (200, 120));
    assert_eq!(sm.dimensions(), (40, 40));
    assert!(!state.path.exists());
}

#[tokio::test]
async fn test_unsupported_type_writes_nothing() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let config = config(dir.path(), json!({}));

    let err = pipeline::run(
        &storage,
        &config,
        "image/gif",
        Cursor::new(master_png(50, 50)),
    )
    .await
    .unwrap_err();

    assert_eq!(err.stage, PipelineStage::Uploading);
    assert_eq!(err.error.code(), ErrorCode::FileTypeUnsupported);
    assert_eq!(err.error.field(), Some("gif"));
    // Rejected before any byte reaches storage
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_size_limit_leaves_partial_master() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let config = config(dir.path(), json!({"maxFileSize": "1kb"}));

    let err = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(vec![0u8; 8192]),
    )
    .await
    .unwrap_err();

    assert_eq!(err.stage, PipelineStage::Uploading);
    assert_eq!(err.error.code(), ErrorCode::SizeLimitExceeded);
    // The partially written master is left in place; cleanup only runs
    // after a successful transform stage.
    assert!(std::fs::read_dir(dir.path()).unwrap().count() > 0);
}

#[tokio::test]
async fn test_failed_size_keeps_earlier_outputs_and_master() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    // The extract region fits the 200x200 variant but exceeds the 50x50
    // one, so exactly one size fails.
    let config = config(
        dir.path(),
        json!({
            "sizes": [
                {"suffix": "lg", "width": 200, "height": 200},
                {"suffix": "sm", "width": 50, "height": 50},
            ],
            "extract": {"left": 60, "top": 60, "width": 100, "height": 100},
        }),
    );

    let err = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(master_png(400, 400)),
    )
    .await
    .unwrap_err();

    assert_eq!(err.stage, PipelineStage::Transforming);
    assert_eq!(err.error.code(), ErrorCode::TransformFailed);

    // No rollback: the successful size's output stays, and the master is
    // still on storage because cleanup never ran.
    let bucket = std::fs::read_dir(dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let entries: Vec<_> = std::fs::read_dir(&bucket)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(entries.iter().any(|n| n.ends_with(".lg.jpg")));
    assert!(!entries.iter().any(|n| n.ends_with(".sm.jpg")));
    // Master (extension-less) still present
    assert!(entries.iter().any(|n| !n.contains('.')));
}

#[cfg(unix)]
#[tokio::test]
async fn test_cleanup_failure_keeps_variants_and_master() {
    use std::os::unix::fs::PermissionsExt;

    let out = tempdir().unwrap();
    let locked = tempdir().unwrap();
    let storage = LocalStorage::new(out.path());
    let config = config(
        out.path(),
        json!({"sizes": [{"suffix": "lg", "width": 32, "height": 32}]}),
    );

    // Master staged in a directory that will refuse the delete; variants
    // go to the writable output directory.
    let master = locked.path().join("abcdef123456");
    std::fs::write(&master, master_png(100, 100)).unwrap();
    let state = imgstage_core::UploadState {
        directory: out.path().to_path_buf(),
        path: master.clone(),
        filename: "abcdef123456".to_string(),
    };

    std::fs::set_permissions(locked.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
    if std::fs::write(locked.path().join("w"), b"").is_ok() {
        // Mode bits do not bind a privileged user; the delete cannot be
        // made to fail here.
        return;
    }

    let err = pipeline::finish(&storage, &config, &state).await.unwrap_err();
    std::fs::set_permissions(locked.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(err.stage, PipelineStage::Cleaning);
    assert_eq!(err.error.code(), ErrorCode::CleanupFailed);
    // Every variant was already written and stays valid; the master is
    // left on storage.
    assert!(state.variant_path("lg", "jpg").exists());
    assert!(master.exists());
}

#[tokio::test]
async fn test_repeated_invocations_do_not_collide() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let config = config(
        dir.path(),
        json!({"sizes": [{"suffix": "lg", "width": 32, "height": 32}]}),
    );

    let a = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(master_png(100, 100)),
    )
    .await
    .unwrap();
    let b = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(master_png(100, 100)),
    )
    .await
    .unwrap();

    assert_ne!(a.filename, b.filename);
    assert!(a.variant_path("lg", "jpg").exists());
    assert!(b.variant_path("lg", "jpg").exists());
}

#[tokio::test]
async fn test_webp_output_honors_configured_identifier() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let config = config(
        dir.path(),
        json!({
            "output": "webp",
            "sizes": [{"suffix": "lg", "width": 64, "height": 64}],
        }),
    );

    let state = pipeline::run(
        &storage,
        &config,
        "image/png",
        Cursor::new(master_png(128, 128)),
    )
    .await
    .unwrap();

    let data = std::fs::read(state.variant_path("lg", "webp")).unwrap();
    assert_eq!(&data[..4], b"RIFF");
    assert_eq!(&data[8..12], b"WEBP");
}
