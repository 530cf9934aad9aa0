use gemcut::{
    clock::ManualClock,
    presets,
    raster::{DrawCall, RecordingBackend},
    AnimationDriver, FrameOutcome, GemConfig, GemSequence, PillarCode,
};

fn chart() -> GemSequence {
    GemSequence::chart(
        PillarCode::parse("甲子").unwrap(),
        PillarCode::parse("丙寅").unwrap(),
        PillarCode::parse("戊辰").unwrap(),
        PillarCode::parse("壬戌").unwrap(),
    )
}

fn frame_until(
    driver: &mut AnimationDriver<ManualClock>,
    backend: &mut RecordingBackend,
    done: impl Fn(&AnimationDriver<ManualClock>, FrameOutcome) -> bool,
) -> usize {
    for frames in 1..=200 {
        backend.calls.clear();
        let outcome = driver.frame(backend);
        if done(driver, outcome) {
            return frames;
        }
    }
    panic!("condition not reached in 200 frames");
}

#[test]
fn one_morph_interval_advances_by_one() {
    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(GemConfig::default(), chart(), clock.clone());
    let mut backend = RecordingBackend::new(400.0);

    clock.advance_ms(3001);
    let fade_out = frame_until(&mut driver, &mut backend, |_, outcome| {
        matches!(outcome, FrameOutcome::Rendered { morphed: true, .. })
    });
    assert!((19..=21).contains(&fade_out), "{fade_out} frames");
    assert_eq!(driver.state().index, 1);
    assert_eq!(driver.state().opacity, 0.0);

    // the swap frame is drawn fully transparent
    assert!(backend.calls.iter().all(|call| match call {
        DrawCall::Fill { alpha, .. } | DrawCall::Stroke { alpha, .. } | DrawCall::Glow { alpha, .. } => {
            *alpha == 0.0
        }
        _ => true,
    }));

    frame_until(&mut driver, &mut backend, |driver, _| driver.state().opacity >= 1.0);
    assert_eq!(driver.state().index, 1);
    assert_eq!(driver.state().opacity, 1.0);
}

#[test]
fn sequence_wraps_around() {
    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(GemConfig::default(), chart(), clock.clone());
    let mut backend = RecordingBackend::new(400.0);

    for expected in [1, 2, 3, 0] {
        clock.advance_ms(3001);
        frame_until(&mut driver, &mut backend, |_, outcome| {
            matches!(outcome, FrameOutcome::Rendered { morphed: true, .. })
        });
        assert_eq!(driver.state().index, expected);
    }
}

#[test]
fn cancel_stops_every_later_frame() {
    let clock = ManualClock::new();
    let mut driver = AnimationDriver::new(GemConfig::default(), chart(), clock.clone());
    let mut backend = RecordingBackend::new(400.0);

    assert!(matches!(driver.frame(&mut backend), FrameOutcome::Rendered { .. }));
    let time = driver.state().time;

    let handle = driver.cancel_handle();
    let queued = handle.clone();
    handle.cancel();
    queued.cancel();
    assert!(handle.is_cancelled());

    backend.calls.clear();
    for _ in 0..3 {
        clock.advance_ms(5000);
        assert_eq!(driver.frame(&mut backend), FrameOutcome::Cancelled);
    }
    assert!(backend.calls.is_empty());
    assert_eq!(driver.state().time, time);
}

#[test]
fn forge_frames_are_wireframes() {
    let clock = ManualClock::new();
    let config = GemConfig {
        canvas_size: presets::FORGE_CANVAS_SIZE,
        ..Default::default()
    };
    let mut driver = AnimationDriver::new(config, presets::forge_sequence(), clock.clone());
    let mut backend = RecordingBackend::new(config.canvas_size as f32);

    for _ in 0..presets::forge_sequence().len() {
        clock.advance_ms(3001);
        frame_until(&mut driver, &mut backend, |_, outcome| match outcome {
            FrameOutcome::Rendered { stats, morphed } => {
                assert!(stats.wireframe);
                morphed
            }
            FrameOutcome::Cancelled => false,
        });
    }
    assert_eq!(driver.state().index, 0);
}
