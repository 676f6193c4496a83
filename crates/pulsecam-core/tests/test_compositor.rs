mod common;

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;

use pulsecam_core::error::PulsecamError;
use pulsecam_core::frame::PixelBuffer;
use pulsecam_core::model::{ApertureDial, ApertureModel};
use pulsecam_core::pipeline::config::PulsecamConfig;
use pulsecam_core::pipeline::{
    develop, CompositeStage, Compositor, PreviewRenderer, ProgressReporter, RenderSession,
};
use pulsecam_core::schedule::{Clock, ManualScheduler, Scheduler};
use pulsecam_core::source::{capture_plain, FrameSequence, StillSource};
use pulsecam_core::stack::accumulate::mean_stack;

use common::{pattern_frame, FlakySource};

fn developed(frame: &PixelBuffer, config: &PulsecamConfig, f: f64) -> PixelBuffer {
    let model = ApertureModel::new(config.aperture.clone());
    let mut out = frame.clone();
    develop(&mut out, &model.look(model.aperture(f)));
    out
}

// ---------------------------------------------------------------------------
// Exposure simulation
// ---------------------------------------------------------------------------

#[test]
fn test_still_scene_composites_to_developed_frame() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let frame = pattern_frame(32, 24);
    let mut scheduler = ManualScheduler::new();

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(4.0);
    let result = compositor
        .composite(&mut scheduler, StillSource::new(frame.clone()), 60.0, aperture)
        .unwrap();
    assert_eq!(result, developed(&frame, &config, 4.0));
}

#[test]
fn test_moving_scene_composites_to_mean() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let frames: Vec<PixelBuffer> = (0..3u8)
        .map(|i| PixelBuffer::filled(6, 4, [i * 60, 100, 200 - i * 30, 255]))
        .collect();
    let mut scheduler = ManualScheduler::new();

    // 1000 bpm clamps to 0.1 s, three frames.
    let aperture = ApertureModel::new(config.aperture.clone()).aperture(32.0);
    let result = compositor
        .composite(
            &mut scheduler,
            FrameSequence::new(frames.clone()),
            1000.0,
            aperture,
        )
        .unwrap();

    let mut expected = mean_stack(&frames).unwrap();
    let model = ApertureModel::new(config.aperture.clone());
    develop(&mut expected, &model.look(aperture));
    assert_eq!(result, expected);
}

#[test]
fn test_composite_paces_draws_at_frame_rate() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let source = Rc::new(FrameSequence::new(vec![pattern_frame(8, 8)]));
    let mut scheduler = ManualScheduler::new();

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(8.0);
    let job = compositor
        .start(&mut scheduler, Rc::clone(&source), 60.0, aperture)
        .unwrap();
    assert_eq!(job.plan().exposure.frame_count, 30);
    assert_eq!(job.frames_drawn(), 1, "first frame is drawn immediately");

    scheduler.advance(110.0);
    assert_eq!(job.frames_drawn(), 4);

    job.wait(&mut scheduler).unwrap();
    assert_eq!(source.captures(), 30);
    assert_abs_diff_eq!(scheduler.now_ms(), 29.0 * 1000.0 / 30.0, epsilon = 1e-6);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_composite_leaves_other_tasks_running() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let mut scheduler = ManualScheduler::new();
    let ticks = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&ticks);
    scheduler.schedule_repeating(
        100.0,
        Box::new(move |_now: f64| {
            *counter.borrow_mut() += 1;
            pulsecam_core::schedule::TaskStatus::Continue
        }),
    );

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(8.0);
    compositor
        .composite(&mut scheduler, StillSource::new(pattern_frame(8, 8)), 60.0, aperture)
        .unwrap();
    assert_eq!(*ticks.borrow(), 9);
}

#[test]
fn test_capture_downscales_to_max_dimension() {
    let mut config = PulsecamConfig::default();
    config.render.capture_max_dimension = Some(16);
    let compositor = Compositor::new(&config);
    let mut scheduler = ManualScheduler::new();

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(16.0);
    let result = compositor
        .composite(&mut scheduler, StillSource::new(pattern_frame(32, 24)), 200.0, aperture)
        .unwrap();
    assert_eq!((result.width(), result.height()), (16, 12));
}

// ---------------------------------------------------------------------------
// Aperture snapshot
// ---------------------------------------------------------------------------

#[test]
fn test_dial_change_does_not_affect_running_capture() {
    let config = PulsecamConfig::default();
    let frame = pattern_frame(24, 16);
    let dial = ApertureDial::new(1.2, config.aperture.clone());
    let session = RenderSession::new(&config, Rc::new(StillSource::new(frame.clone())), dial);
    let mut scheduler = ManualScheduler::new();

    let job = session.capture(&mut scheduler, 60.0).unwrap();
    scheduler.advance(300.0);
    session.dial().set(16.0);
    let result = job.wait(&mut scheduler).unwrap();

    assert_eq!(result, developed(&frame, &config, 1.2));
    assert_ne!(result, developed(&frame, &config, 16.0));
}

#[test]
fn test_plan_uses_model_outputs() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let model = ApertureModel::new(config.aperture.clone());
    let plan = compositor.plan(120.0, model.aperture(1.2));
    assert_abs_diff_eq!(plan.exposure.duration_sec, 0.5, epsilon = 1e-12);
    assert_eq!(plan.exposure.frame_count, 15);
    assert_eq!(plan.look.blur_radius, 6);
    assert_eq!(plan.look, model.look(model.aperture(1.2)));
}

// ---------------------------------------------------------------------------
// Source failures and cancellation
// ---------------------------------------------------------------------------

#[test]
fn test_unavailable_source_fails_at_start() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let mut scheduler = ManualScheduler::new();
    let source = FlakySource::new(pattern_frame(4, 4), 0);

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(8.0);
    let err = compositor
        .start(&mut scheduler, source, 60.0, aperture)
        .err()
        .unwrap();
    assert!(matches!(err, PulsecamError::SourceUnavailable { .. }));
    assert_eq!(scheduler.pending(), 0, "nothing scheduled on failure");
}

#[test]
fn test_source_lost_mid_composite() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let mut scheduler = ManualScheduler::new();
    let source = Rc::new(FlakySource::new(pattern_frame(4, 4), 5));

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(8.0);
    let err = compositor
        .composite(&mut scheduler, Rc::clone(&source), 60.0, aperture)
        .unwrap_err();
    assert!(matches!(err, PulsecamError::SourceUnavailable { .. }));
    assert_eq!(source.calls(), 6);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_plain_capture_fallback() {
    let frame = pattern_frame(4, 4);
    let good = FlakySource::new(frame.clone(), 1);
    assert_eq!(capture_plain(&good), Some(frame));
    assert_eq!(capture_plain(&good), None);
}

#[test]
fn test_cancel_stops_drawing() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let mut scheduler = ManualScheduler::new();
    let source = Rc::new(FrameSequence::new(vec![pattern_frame(4, 4)]));

    let aperture = ApertureModel::new(config.aperture.clone()).aperture(8.0);
    let mut job = compositor
        .start(&mut scheduler, Rc::clone(&source), 60.0, aperture)
        .unwrap();
    scheduler.advance(200.0);
    let drawn = job.frames_drawn();
    job.cancel(&mut scheduler);
    scheduler.advance(2000.0);

    assert!(job.is_finished());
    assert_eq!(job.frames_drawn(), drawn);
    assert_eq!(source.captures(), drawn);
    assert!(matches!(job.take_result(), Some(Err(PulsecamError::Cancelled))));
    assert!(job.take_result().is_none());
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingReporter {
    events: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: CompositeStage, total_items: Option<usize>) {
        self.events
            .borrow_mut()
            .push(format!("begin {stage:?} {total_items:?}"));
    }

    fn advance(&self, items_done: usize) {
        self.events.borrow_mut().push(format!("advance {items_done}"));
    }

    fn finish_stage(&self) {
        self.events.borrow_mut().push("finish".to_string());
    }
}

#[test]
fn test_progress_reporter_sees_every_stage() {
    let config = PulsecamConfig::default();
    let compositor = Compositor::new(&config);
    let mut scheduler = ManualScheduler::new();
    let reporter = Rc::new(RecordingReporter::default());

    // 300 bpm -> 0.2 s -> 6 frames.
    let aperture = ApertureModel::new(config.aperture.clone()).aperture(8.0);
    compositor
        .start_reported(
            &mut scheduler,
            StillSource::new(pattern_frame(4, 4)),
            300.0,
            aperture,
            reporter.clone(),
        )
        .unwrap()
        .wait(&mut scheduler)
        .unwrap();

    let events = reporter.events.borrow();
    assert_eq!(events.first().unwrap(), "begin Accumulating Some(6)");
    assert_eq!(events.iter().filter(|e| e.starts_with("advance")).count(), 6);
    assert_eq!(
        &events[events.len() - 3..],
        &[
            "finish".to_string(),
            "begin Developing None".to_string(),
            "finish".to_string()
        ]
    );
}

// ---------------------------------------------------------------------------
// Preview parity
// ---------------------------------------------------------------------------

#[test]
fn test_preview_matches_capture_of_still_scene() {
    let config = PulsecamConfig::default();
    let frame = pattern_frame(40, 30);
    let model = ApertureModel::new(config.aperture.clone());

    for f in [1.2, 2.8, 5.6, 11.0, 32.0] {
        let aperture = model.aperture(f);
        let preview = PreviewRenderer::new(&config).develop_frame(&frame, aperture);
        let mut scheduler = ManualScheduler::new();
        let capture = Compositor::new(&config)
            .composite(&mut scheduler, StillSource::new(frame.clone()), 90.0, aperture)
            .unwrap();
        assert_eq!(preview, capture, "preview and capture differ at {aperture}");
    }
}
