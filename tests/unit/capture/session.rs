use super::*;

fn frame(tag: u8) -> StillFrame {
    StillFrame::from_rgba8(1, 1, vec![tag, 0, 0, 255]).unwrap()
}

#[test]
fn zero_photo_session_is_rejected() {
    assert!(CaptureSession::new(0, 0, FlashMode::On).is_err());
}

#[test]
fn push_stops_at_required_count() {
    let mut s = CaptureSession::new(2, 0, FlashMode::Off).unwrap();
    assert_eq!(s.push(frame(1)).unwrap(), 0);
    assert!(!s.is_complete());
    assert_eq!(s.push(frame(2)).unwrap(), 1);
    assert!(s.is_complete());
    assert!(s.push(frame(3)).is_err());
    assert_eq!(s.len(), 2);
    assert_eq!(s.remaining(), 0);
}

#[test]
fn remove_keeps_relative_order() {
    let mut s = CaptureSession::new(3, 0, FlashMode::Off).unwrap();
    for t in [10, 20, 30] {
        s.push(frame(t)).unwrap();
    }
    let removed = s.remove(1).unwrap();
    assert_eq!(removed.rgba8()[0], 20);
    let tags: Vec<u8> = s.frames().iter().map(|f| f.rgba8()[0]).collect();
    assert_eq!(tags, vec![10, 30]);
    assert!(s.remove(5).is_err());
}

#[test]
fn fresh_keeps_settings_and_drops_frames() {
    let mut s = CaptureSession::new(4, 3, FlashMode::Auto).unwrap();
    s.push(frame(1)).unwrap();
    let f = s.fresh();
    assert!(f.is_empty());
    assert_eq!(f.required_count(), 4);
    assert!(f.timer_armed());
    assert_eq!(f.flash_mode(), FlashMode::Auto);
}

#[test]
fn flash_mode_parses_case_insensitively() {
    assert_eq!(FlashMode::parse("AUTO").unwrap(), FlashMode::Auto);
    assert_eq!(FlashMode::parse(" off ").unwrap(), FlashMode::Off);
    assert!(FlashMode::parse("sometimes").is_err());
}
