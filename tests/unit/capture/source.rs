use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "photobooth_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, px: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[tokio::test]
async fn pattern_frames_carry_their_order() {
    let source = PatternSource::new(8, 6);
    let handle = source.start_stream(None).await.unwrap();
    for n in 0..3u64 {
        let frame = source.capture_frame(handle).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
        assert_eq!(frame.rgba8()[2], PatternSource::frame_marker(n));
    }
    assert_eq!(source.frames_served(), 3);
}

#[tokio::test]
async fn capture_without_stream_is_no_active_stream() {
    let source = PatternSource::new(4, 4);
    let handle = source.start_stream(None).await.unwrap();
    source.stop_stream(handle).await.unwrap();
    assert!(!source.is_streaming());
    let err = source.capture_frame(handle).unwrap_err();
    assert!(matches!(err, BoothError::NoActiveStream(_)));
    // stopping twice is fine
    source.stop_stream(handle).await.unwrap();
}

#[tokio::test]
async fn stale_handle_is_rejected_after_restart() {
    let source = PatternSource::new(4, 4);
    let first = source.start_stream(None).await.unwrap();
    let second = source.start_stream(Some("pattern-0")).await.unwrap();
    assert_ne!(first, second);
    assert!(source.capture_frame(first).is_err());
    assert!(source.capture_frame(second).is_ok());
}

#[tokio::test]
async fn injected_failures_do_not_consume_frames() {
    let source = PatternSource::new(4, 4);
    let handle = source.start_stream(None).await.unwrap();
    source.fail_next_captures(1);
    let err = source.capture_frame(handle).unwrap_err();
    assert!(matches!(err, BoothError::Capture(_)));
    let frame = source.capture_frame(handle).unwrap();
    assert_eq!(frame.rgba8()[2], PatternSource::frame_marker(0));
}

#[tokio::test]
async fn refused_or_unknown_camera_fails_to_start() {
    let source = PatternSource::new(4, 4);
    assert!(matches!(
        source.start_stream(Some("front")).await.unwrap_err(),
        BoothError::NoActiveStream(_)
    ));
    source.refuse_streams(true);
    assert!(matches!(
        source.start_stream(None).await.unwrap_err(),
        BoothError::NoActiveStream(_)
    ));
    assert_eq!(source.list_devices().await.unwrap().len(), 1);
}

#[tokio::test]
async fn directory_source_cycles_sorted_files() {
    let dir = temp_dir("directory_source_cycles");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("b.png"), [0, 255, 0, 255]);
    write_png(&dir.join("a.png"), [255, 0, 0, 255]);
    std::fs::write(dir.join("notes.txt"), b"skip me").unwrap();

    let source = DirectorySource::open(&dir).unwrap();
    assert_eq!(source.files().len(), 2);
    let handle = source.start_stream(None).await.unwrap();
    let reds: Vec<u8> = (0..3)
        .map(|_| source.capture_frame(handle).unwrap().rgba8()[0])
        .collect();
    assert_eq!(reds, vec![255, 0, 255]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_directory_is_rejected() {
    let dir = temp_dir("directory_source_empty");
    std::fs::create_dir_all(&dir).unwrap();
    assert!(DirectorySource::open(&dir).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
