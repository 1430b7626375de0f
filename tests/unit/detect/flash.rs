use super::*;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PixelBuffer {
    PixelBuffer::filled(w, h, rgba).unwrap()
}

fn with_pixels(w: u32, h: u32, base: [u8; 4], set: &[(usize, [u8; 4])]) -> PixelBuffer {
    let mut bytes = solid(w, h, base).into_bytes();
    for &(i, rgba) in set {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&rgba);
    }
    PixelBuffer::new(w, h, bytes).unwrap()
}

fn stride1() -> ThresholdConfig {
    ThresholdConfig {
        sample_stride: 1,
        ..ThresholdConfig::default()
    }
}

#[test]
fn first_frame_is_not_a_flash() {
    let curr = solid(2, 2, WHITE);
    let got = FlashDetector::detect(None, &curr, &ThresholdConfig::default(), 0).unwrap();
    assert_eq!(got, None);
}

#[test]
fn identical_frames_never_flash() {
    let mut bytes = Vec::new();
    for i in 0..64u32 {
        bytes.extend_from_slice(&[(i * 7) as u8, (i * 13) as u8, (i * 29) as u8, 255]);
    }
    let a = PixelBuffer::new(8, 8, bytes).unwrap();
    let b = a.clone();
    assert_eq!(FlashDetector::detect(Some(&a), &b, &stride1(), 10).unwrap(), None);
}

#[test]
fn black_to_white_flags_sampled_pixel() {
    let prev = solid(2, 2, BLACK);
    let curr = solid(2, 2, WHITE);
    let ev = FlashDetector::detect(Some(&prev), &curr, &ThresholdConfig::default(), 42)
        .unwrap()
        .unwrap();
    // 4 pixels at stride 4: only pixel 0 is sampled, extrapolated to 4 px.
    assert_eq!(ev.timestamp_ms, 42);
    assert_eq!(ev.flash_area_px, 4);
    assert!((ev.luminance_delta - 255.0).abs() < 1e-9);
    assert!(!ev.is_red_flash);
}

#[test]
fn white_to_black_is_symmetric() {
    let a = solid(2, 2, BLACK);
    let b = solid(2, 2, WHITE);
    let cfg = ThresholdConfig::default();
    let up = FlashDetector::detect(Some(&a), &b, &cfg, 0).unwrap().unwrap();
    let down = FlashDetector::detect(Some(&b), &a, &cfg, 0).unwrap().unwrap();
    assert_eq!(up.luminance_delta, down.luminance_delta);
    assert_eq!(up.flash_area_px, down.flash_area_px);
}

#[test]
fn area_extrapolates_by_stride() {
    // 40 px wide, stride 4: samples 0, 4, .., 36 are all flagged.
    let prev = solid(40, 1, BLACK);
    let curr = solid(40, 1, WHITE);
    let ev = FlashDetector::detect(Some(&prev), &curr, &ThresholdConfig::default(), 0)
        .unwrap()
        .unwrap();
    assert_eq!(ev.flash_area_px, 40);

    let ev = FlashDetector::detect(Some(&prev), &curr, &stride1(), 0)
        .unwrap()
        .unwrap();
    assert_eq!(ev.flash_area_px, 40);
}

#[test]
fn unsampled_pixels_are_ignored() {
    let prev = solid(4, 1, BLACK);
    // Only pixel 1 changes; stride 4 samples pixel 0 only.
    let curr = with_pixels(4, 1, BLACK, &[(1, WHITE)]);
    let got = FlashDetector::detect(Some(&prev), &curr, &ThresholdConfig::default(), 0).unwrap();
    assert_eq!(got, None);
}

#[test]
fn small_luminance_change_is_not_a_flash() {
    let prev = solid(2, 2, [100, 100, 100, 255]);
    let curr = solid(2, 2, [104, 104, 104, 255]);
    assert_eq!(
        FlashDetector::detect(Some(&prev), &curr, &stride1(), 0).unwrap(),
        None
    );
}

#[test]
fn saturated_red_marks_event() {
    let prev = solid(1, 1, BLACK);
    let curr = solid(1, 1, [255, 0, 0, 255]);
    let ev = FlashDetector::detect(Some(&prev), &curr, &stride1(), 0)
        .unwrap()
        .unwrap();
    assert!(ev.is_red_flash);
}

#[test]
fn desaturated_red_does_not_mark_event() {
    let prev = solid(1, 1, BLACK);
    let curr = solid(1, 1, [255, 200, 200, 255]);
    let ev = FlashDetector::detect(Some(&prev), &curr, &stride1(), 0)
        .unwrap()
        .unwrap();
    assert!(!ev.is_red_flash);
}

#[test]
fn single_red_sample_marks_whole_event() {
    let prev = solid(8, 1, BLACK);
    let curr = with_pixels(8, 1, WHITE, &[(7, [255, 0, 0, 255])]);
    let ev = FlashDetector::detect(Some(&prev), &curr, &stride1(), 0)
        .unwrap()
        .unwrap();
    assert_eq!(ev.flash_area_px, 8);
    assert!(ev.is_red_flash);
}

#[test]
fn shape_mismatch_is_an_error() {
    let prev = solid(2, 2, BLACK);
    let curr = solid(4, 1, WHITE);
    let err = FlashDetector::detect(Some(&prev), &curr, &ThresholdConfig::default(), 0)
        .unwrap_err();
    assert!(matches!(
        err,
        FlashguardError::ShapeMismatch {
            prev_width: 2,
            prev_height: 2,
            curr_width: 4,
            curr_height: 1
        }
    ));
}

#[test]
fn flash_pixel_trigger_is_strict() {
    let prev = solid(40, 1, BLACK);
    let curr = solid(40, 1, WHITE);
    let mut cfg = ThresholdConfig {
        flash_pixel_trigger: 40,
        ..ThresholdConfig::default()
    };
    assert_eq!(FlashDetector::detect(Some(&prev), &curr, &cfg, 0).unwrap(), None);
    cfg.flash_pixel_trigger = 39;
    assert!(FlashDetector::detect(Some(&prev), &curr, &cfg, 0).unwrap().is_some());
}

#[test]
fn analysis_size_is_enforced_on_every_frame() {
    let cfg = ThresholdConfig {
        analysis_size: Some([4, 4]),
        ..ThresholdConfig::default()
    };
    let curr = solid(2, 2, WHITE);
    let err = FlashDetector::detect(None, &curr, &cfg, 0).unwrap_err();
    assert!(matches!(err, FlashguardError::InvalidBuffer(_)));
}

#[test]
fn detect_runs_inside_its_tracing_span() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
    let ev = FlashDetector::detect(
        Some(&solid(2, 2, BLACK)),
        &solid(2, 2, WHITE),
        &stride1(),
        42,
    )
    .unwrap()
    .unwrap();
    assert_eq!(ev.timestamp_ms, 42);
    assert_eq!(ev.flash_area_px, 4);
}
