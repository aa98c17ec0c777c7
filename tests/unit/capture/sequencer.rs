use crate::capture::source::PatternSource;

use super::*;

async fn setup(
    required: usize,
    timer: u32,
    flash: FlashMode,
) -> (
    CaptureSequencer,
    mpsc::UnboundedReceiver<SequencerEvent>,
    Arc<PatternSource>,
) {
    let source = Arc::new(PatternSource::new(4, 4));
    let (seq, rx) = CaptureSequencer::new(
        source.clone(),
        SequencerSettings {
            seed: Some(7),
            ..SequencerSettings::default()
        },
    );
    let handle = source.start_stream(None).await.unwrap();
    seq.begin(CaptureSession::new(required, timer, flash).unwrap(), handle);
    (seq, rx, source)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<SequencerEvent>) -> Vec<SequencerEvent> {
    let mut out = Vec::new();
    while let Ok(e) = rx.try_recv() {
        out.push(e);
    }
    out
}

fn markers(frames: &[StillFrame]) -> Vec<u8> {
    frames.iter().map(|f| f.rgba8()[2]).collect()
}

#[tokio::test(start_paused = true)]
async fn three_captures_without_timer_complete_once() {
    let (seq, mut rx, _source) = setup(3, 0, FlashMode::Off).await;

    assert_eq!(
        seq.request_capture().await.unwrap(),
        CaptureOutcome::Captured {
            index: 0,
            remaining: 2
        }
    );
    assert_eq!(
        seq.request_capture().await.unwrap(),
        CaptureOutcome::Captured {
            index: 1,
            remaining: 1
        }
    );
    let CaptureOutcome::Completed { frames } = seq.request_capture().await.unwrap() else {
        panic!("third capture should complete the session");
    };
    assert_eq!(markers(&frames), vec![0, 40, 80]);
    assert_eq!(seq.phase(), SequencerPhase::Committed);

    assert_eq!(seq.request_capture().await.unwrap(), CaptureOutcome::Ignored);
    assert_eq!(seq.frame_count(), 3);

    let completed = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, SequencerEvent::Completed { .. }))
        .count();
    assert_eq!(completed, 1);
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_down_and_ignores_double_click() {
    let (seq, mut rx, _source) = setup(3, 3, FlashMode::On).await;
    let start = tokio::time::Instant::now();

    let (first, second) = tokio::join!(seq.request_capture(), async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(seq.phase(), SequencerPhase::Armed { remaining: 2 });
        seq.request_capture().await
    });

    assert_eq!(
        first.unwrap(),
        CaptureOutcome::Captured {
            index: 0,
            remaining: 2
        }
    );
    assert_eq!(second.unwrap(), CaptureOutcome::Ignored);
    assert!(start.elapsed() >= Duration::from_millis(3150));
    assert_eq!(seq.frame_count(), 1);

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            SequencerEvent::Started { required: 3 },
            SequencerEvent::CountdownTick { remaining: 3 },
            SequencerEvent::CountdownTick { remaining: 2 },
            SequencerEvent::CountdownTick { remaining: 1 },
            SequencerEvent::Flash,
            SequencerEvent::FrameCaptured {
                index: 0,
                remaining: 2
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn timed_frames_keep_capture_order() {
    let (seq, _rx, _source) = setup(2, 1, FlashMode::Off).await;
    seq.request_capture().await.unwrap();
    let CaptureOutcome::Completed { frames } = seq.request_capture().await.unwrap() else {
        panic!("second capture should complete");
    };
    assert_eq!(markers(&frames), vec![0, 40]);
}

#[tokio::test(start_paused = true)]
async fn failed_grab_leaves_count_and_allows_retry() {
    let (seq, mut rx, source) = setup(2, 0, FlashMode::Off).await;
    source.fail_next_captures(1);

    let err = seq.request_capture().await.unwrap_err();
    assert!(matches!(err, BoothError::Capture(_)));
    assert_eq!(seq.frame_count(), 0);
    assert_eq!(seq.phase(), SequencerPhase::Idle);
    assert!(
        drain(&mut rx)
            .iter()
            .any(|e| matches!(e, SequencerEvent::CaptureFailed { .. }))
    );

    assert_eq!(
        seq.request_capture().await.unwrap(),
        CaptureOutcome::Captured {
            index: 0,
            remaining: 1
        }
    );
}

#[tokio::test(start_paused = true)]
async fn closing_mid_countdown_cancels_and_stops_stream() {
    let (seq, _rx, source) = setup(3, 5, FlashMode::On).await;

    let (outcome, closed) = tokio::join!(seq.request_capture(), async {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        seq.close().await
    });

    assert_eq!(outcome.unwrap(), CaptureOutcome::Cancelled);
    closed.unwrap();
    assert_eq!(seq.phase(), SequencerPhase::Closed);
    assert!(seq.session().is_none());
    assert!(!source.is_streaming());
    assert_eq!(source.frames_served(), 0);
    assert_eq!(seq.request_capture().await.unwrap(), CaptureOutcome::Ignored);
}

#[tokio::test(start_paused = true)]
async fn reset_during_shutter_never_appends_to_new_session() {
    let (seq, _rx, source) = setup(2, 0, FlashMode::On).await;

    let (outcome, ()) = tokio::join!(seq.request_capture(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        seq.reset();
    });

    assert_eq!(outcome.unwrap(), CaptureOutcome::Cancelled);
    assert_eq!(seq.frame_count(), 0);
    assert_eq!(seq.phase(), SequencerPhase::Idle);
    assert_eq!(source.frames_served(), 0);
    assert_eq!(seq.session().unwrap().required_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn removing_a_frame_reopens_the_slot() {
    let (seq, _rx, _source) = setup(3, 0, FlashMode::Off).await;
    seq.request_capture().await.unwrap();
    seq.request_capture().await.unwrap();

    let removed = seq.remove_frame(0).unwrap();
    assert_eq!(removed.rgba8()[2], 0);
    assert!(seq.remove_frame(9).is_err());

    seq.request_capture().await.unwrap();
    let CaptureOutcome::Completed { frames } = seq.request_capture().await.unwrap() else {
        panic!("fourth request should complete after a removal");
    };
    assert_eq!(markers(&frames), vec![40, 80, 120]);
    assert!(seq.remove_frame(0).is_err());
}

#[tokio::test(start_paused = true)]
async fn auto_flash_follows_probability() {
    for (p, expect_flash) in [(1.0, true), (0.0, false)] {
        let source = Arc::new(PatternSource::new(2, 2));
        let (seq, mut rx) = CaptureSequencer::new(
            source.clone(),
            SequencerSettings {
                auto_flash_probability: p,
                seed: Some(1),
                ..SequencerSettings::default()
            },
        );
        let handle = source.start_stream(None).await.unwrap();
        seq.begin(CaptureSession::new(1, 0, FlashMode::Auto).unwrap(), handle);
        seq.request_capture().await.unwrap();
        let flashed = drain(&mut rx).contains(&SequencerEvent::Flash);
        assert_eq!(flashed, expect_flash);
    }
}

#[tokio::test]
async fn capture_before_begin_is_ignored() {
    let source = Arc::new(PatternSource::new(2, 2));
    let (seq, _rx) = CaptureSequencer::new(source, SequencerSettings::default());
    assert_eq!(seq.phase(), SequencerPhase::Closed);
    assert_eq!(seq.request_capture().await.unwrap(), CaptureOutcome::Ignored);
    assert!(seq.set_timer(3).is_err());
}

#[tokio::test(start_paused = true)]
async fn failed_stop_keeps_the_stream_handle() {
    let (seq, _rx, source) = setup(2, 0, FlashMode::Off).await;
    let handle = seq.stream().unwrap();
    source.fail_next_stops(1);

    assert!(seq.close().await.is_err());
    assert_eq!(seq.phase(), SequencerPhase::Closed);
    assert_eq!(seq.stream(), Some(handle));
    assert!(source.is_streaming());

    seq.close().await.unwrap();
    assert_eq!(seq.stream(), None);
    assert!(!source.is_streaming());
}
