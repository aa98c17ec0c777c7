use crate::{capture::source::PatternSource, render::encode::OutputFormat};

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

fn booth() -> (SessionController, Arc<PatternSource>) {
    let source = Arc::new(PatternSource::new(32, 24));
    let settings = SessionSettings {
        flash_mode: FlashMode::Off,
        decoration_seed: Some(9),
        encode: EncodeSettings {
            format: OutputFormat::Png,
            quality: 95,
        },
        ..SessionSettings::default()
    };
    let (controller, _events) =
        SessionController::new(source.clone(), Arc::new(Compositor::default()), settings);
    (controller, source)
}

#[tokio::test(start_paused = true)]
async fn full_session_produces_a_result_and_releases_the_camera() {
    let (booth, source) = booth();
    assert_eq!(booth.select_template(TemplateId(4)).unwrap(), 3);
    booth.open().await.unwrap();
    assert!(booth.is_open());

    for _ in 0..2 {
        assert!(matches!(
            booth.capture().await.unwrap(),
            CaptureOutcome::Captured { .. }
        ));
    }
    assert!(booth.result().is_none());
    assert!(matches!(
        booth.capture().await.unwrap(),
        CaptureOutcome::Completed { .. }
    ));

    let result = booth.result().unwrap();
    assert_eq!((result.width, result.height), (1000, 400));
    assert_eq!(result.format, OutputFormat::Png);
    assert_eq!(booth.frames().len(), 3);
    assert!(!booth.is_open());
    assert!(!source.is_streaming());
    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::Ignored);
}

#[tokio::test]
async fn unknown_template_fails_fast() {
    let (booth, _source) = booth();
    let err = booth.select_template(TemplateId(404)).unwrap_err();
    assert!(matches!(err, BoothError::InvalidTemplate(_)));
    assert!(booth.template().is_none());
    assert!(booth.open().await.is_err());
}

#[tokio::test]
async fn camera_that_will_not_stream_is_fatal_for_open() {
    let (booth, source) = booth();
    source.refuse_streams(true);
    booth.select_template(TemplateId(1)).unwrap();
    let err = booth.open().await.unwrap_err();
    assert!(matches!(err, BoothError::NoActiveStream(_)));
    assert!(!err.is_recoverable());
    assert!(!booth.is_open());
}

#[tokio::test(start_paused = true)]
async fn template_cannot_change_while_open() {
    let (booth, _source) = booth();
    booth.select_template(TemplateId(17)).unwrap();
    booth.open().await.unwrap();
    assert!(booth.select_template(TemplateId(1)).is_err());
    assert_eq!(booth.template().unwrap().id, TemplateId(17));
}

#[tokio::test(start_paused = true)]
async fn recomposite_replaces_result_without_recapture() {
    let (booth, source) = booth();
    booth.select_template(TemplateId(1)).unwrap();
    booth.open().await.unwrap();
    for _ in 0..3 {
        booth.capture().await.unwrap();
    }
    let first = booth.result().unwrap();
    let served = source.frames_served();

    let again = booth
        .recomposite(CompositeOverrides {
            background: Some(Rgba8::rgb(0, 0, 255)),
            filter: Some(FilterSpec::IDENTITY.with_sepia(100.0)),
        })
        .await
        .unwrap();
    assert_ne!(first.bytes, again.bytes);
    assert_eq!(booth.result().unwrap(), again);
    assert_eq!(source.frames_served(), served);

    let corner = again.decode().unwrap().rgba8()[0..3].to_vec();
    assert_eq!(corner, vec![0, 0, 255]);
}

#[tokio::test(start_paused = true)]
async fn close_mid_session_discards_frames() {
    let (booth, source) = booth();
    booth.select_template(TemplateId(2)).unwrap();
    booth.open().await.unwrap();
    booth.capture().await.unwrap();
    booth.close().await.unwrap();

    assert!(!source.is_streaming());
    assert!(booth.frames().is_empty());
    assert!(booth.result().is_none());
    assert!(booth.template().is_none());
    assert!(booth.recomposite(CompositeOverrides::default()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn start_over_resets_to_idle() {
    let (booth, _source) = booth();
    booth.select_template(TemplateId(17)).unwrap();
    booth.open().await.unwrap();
    booth.capture().await.unwrap();
    assert!(booth.result().is_some());

    booth.start_over().await.unwrap();
    assert!(booth.result().is_none());
    assert!(booth.frames().is_empty());
    assert!(booth.template().is_none());
    assert_eq!(booth.phase(), SequencerPhase::Idle);

    assert_eq!(booth.select_template(TemplateId(2)).unwrap(), 4);
}

#[tokio::test(start_paused = true)]
async fn edit_and_export_write_the_live_result() {
    let (booth, _source) = booth();
    booth.select_template(TemplateId(17)).unwrap();
    booth.open().await.unwrap();
    booth.capture().await.unwrap();
    let before = booth.result().unwrap();

    let settings = EditorSettings {
        preset: crate::filter::spec::Preset::Noir,
        ..EditorSettings::default()
    };
    let edited = booth.edit(settings).await.unwrap();
    assert_ne!(before.bytes, edited.bytes);
    assert_eq!((edited.width, edited.height), (800, 1000));

    let dir = temp_dir("controller_export");
    let sink = DirectorySink::new(&dir);
    let name = booth.export(&sink).unwrap();
    assert!(name.starts_with("photobooth-") && name.ends_with(".png"));
    let written = std::fs::read(sink.path_for(&name)).unwrap();
    assert_eq!(&written[..], &edited.bytes[..]);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn composite_outside_a_session() {
    let (booth, _source) = booth();
    let frame = StillFrame::from_rgba8(2, 2, vec![255; 16]).unwrap();
    let out = booth
        .composite(
            TemplateId(5),
            vec![frame.into()],
            CompositeOverrides::default(),
        )
        .await
        .unwrap();
    assert_eq!((out.width, out.height), (400, 1000));
}

#[tokio::test(start_paused = true)]
async fn session_background_defaults_to_black() {
    let (booth, _source) = booth();
    booth.select_template(TemplateId(1)).unwrap();
    booth.open().await.unwrap();
    for _ in 0..3 {
        booth.capture().await.unwrap();
    }
    let result = booth.result().unwrap();
    let corner = result.decode().unwrap().rgba8()[0..3].to_vec();
    assert_eq!(corner, vec![0, 0, 0]);

    let frame = StillFrame::from_rgba8(2, 2, vec![255; 16]).unwrap();
    let out = booth
        .composite(TemplateId(1), vec![frame.into()], CompositeOverrides::default())
        .await
        .unwrap();
    assert_eq!(out.decode().unwrap().rgba8()[0..3].to_vec(), vec![0, 0, 0]);
}

#[tokio::test]
async fn unset_session_background_keeps_template_color() {
    let settings = SessionSettings {
        background: None,
        decoration_seed: Some(9),
        encode: EncodeSettings {
            format: OutputFormat::Png,
            quality: 95,
        },
        ..SessionSettings::default()
    };
    let source = Arc::new(PatternSource::new(32, 24));
    let (booth, _events) =
        SessionController::new(source, Arc::new(Compositor::default()), settings);
    let frame = StillFrame::from_rgba8(2, 2, vec![255; 16]).unwrap();
    let out = booth
        .composite(TemplateId(1), vec![frame.into()], CompositeOverrides::default())
        .await
        .unwrap();
    assert_eq!(out.decode().unwrap().rgba8()[0..3].to_vec(), vec![0xFF, 0x57, 0x33]);
}

#[tokio::test(start_paused = true)]
async fn camera_that_will_not_stop_keeps_one_stream() {
    let (booth, source) = booth();
    booth.select_template(TemplateId(4)).unwrap();
    booth.open().await.unwrap();
    booth.capture().await.unwrap();
    source.fail_next_stops(1);

    let err = booth.start_over().await.unwrap_err();
    assert!(matches!(err, BoothError::Capture(_)));
    assert!(booth.template().is_none());
    assert!(booth.frames().is_empty());
    assert_eq!(booth.phase(), SequencerPhase::Idle);
    assert!(source.is_streaming());
    assert!(booth.is_open());

    assert!(booth.select_template(TemplateId(1)).is_err());
    booth.close().await.unwrap();
    assert!(!source.is_streaming());
    assert!(!booth.is_open());

    booth.select_template(TemplateId(1)).unwrap();
    booth.open().await.unwrap();
    assert!(source.is_streaming());
}
