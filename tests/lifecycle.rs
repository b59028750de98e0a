//! Construction, frame delivery and teardown as seen by a host.

use std::collections::HashMap;

use cellfield::{
    FieldConfig, FieldState, FrameHandle, GradientBackground, GradientConfig, ManualScheduler,
    ParticleField, RecordingSurface, SequenceRandom, Vec2,
};

type Field = ParticleField<RecordingSurface, ManualScheduler, SequenceRandom>;

fn page_with(id: &str, container: Vec2) -> (HashMap<String, RecordingSurface>, RecordingSurface) {
    let surface = RecordingSurface::new(container);
    let surfaces = HashMap::from([(id.to_string(), surface.clone())]);
    (surfaces, surface)
}

#[test]
fn test_locates_surface_by_id() {
    let (mut surfaces, surface) = page_with("cell-animation", Vec2::new(900.0, 500.0));
    let scheduler = ManualScheduler::new();

    let field: Field = ParticleField::new(
        &mut surfaces,
        "cell-animation",
        scheduler.clone(),
        SequenceRandom::new([0.3, 0.6, 0.9]),
        FieldConfig::default(),
    );

    assert_eq!(field.state(), FieldState::Running);
    assert_eq!(field.particles().len(), 30);
    assert_eq!(surface.size(), Vec2::new(900.0, 500.0));
    assert_eq!(scheduler.requested(), 1);
    // The field owns the surface now
    assert!(surfaces.is_empty());
}

#[test]
fn test_unknown_id_stays_inert() {
    let (mut surfaces, surface) = page_with("cell-animation", Vec2::new(900.0, 500.0));
    let scheduler = ManualScheduler::new();

    let mut field: Field = ParticleField::new(
        &mut surfaces,
        "hero-canvas",
        scheduler.clone(),
        SequenceRandom::constant(0.5),
        FieldConfig::default(),
    );

    assert_eq!(field.state(), FieldState::Uninitialized);
    field.on_surface_resize();
    field.on_pointer_move(Vec2::new(10.0, 10.0));
    assert!(!field.advance_frame(FrameHandle(1)));
    field.destroy();

    assert_eq!(field.state(), FieldState::Uninitialized);
    assert_eq!(field.size(), Vec2::ZERO);
    assert_eq!(scheduler.requested(), 0);
    assert!(scheduler.cancelled().is_empty());
    assert!(surface.commands().is_empty());
    assert_eq!(surface.size(), Vec2::ZERO);
}

#[test]
fn test_frames_self_rearm() {
    let (mut surfaces, surface) = page_with("cells", Vec2::new(400.0, 400.0));
    let scheduler = ManualScheduler::new();
    let mut field: Field = ParticleField::new(
        &mut surfaces,
        "cells",
        scheduler.clone(),
        SequenceRandom::new([0.15, 0.85, 0.4, 0.65]),
        FieldConfig::default(),
    );

    for frame in 1..=10 {
        let handle = scheduler.take_next().unwrap();
        assert!(field.advance_frame(handle));
        assert_eq!(field.frame_count(), frame);
        // Exactly one request outstanding at any time
        assert_eq!(scheduler.peek(), field.pending_frame());
        assert_eq!(scheduler.requested(), frame + 1);
    }
    assert_eq!(surface.frames(), 10);
}

#[test]
fn test_replayed_handle_draws_once() {
    let (mut surfaces, surface) = page_with("cells", Vec2::new(400.0, 400.0));
    let scheduler = ManualScheduler::new();
    let mut field: Field = ParticleField::new(
        &mut surfaces,
        "cells",
        scheduler.clone(),
        SequenceRandom::constant(0.25),
        FieldConfig::default(),
    );

    let handle = scheduler.take_next().unwrap();
    assert!(field.advance_frame(handle));
    assert!(!field.advance_frame(handle));
    assert_eq!(surface.frames(), 1);
}

#[test]
fn test_destroy_beats_in_flight_frame() {
    let (mut surfaces, surface) = page_with("cells", Vec2::new(640.0, 480.0));
    let scheduler = ManualScheduler::new();
    let mut field: Field = ParticleField::new(
        &mut surfaces,
        "cells",
        scheduler.clone(),
        SequenceRandom::new([0.2, 0.4, 0.6, 0.8]),
        FieldConfig::default(),
    );
    field.advance_frame(scheduler.take_next().unwrap());
    surface.take_commands();

    // The host already dequeued the callback when destroy() runs
    let in_flight = scheduler.take_next().unwrap();
    field.destroy();

    assert!(!field.advance_frame(in_flight));
    assert!(surface.commands().is_empty());
    assert_eq!(field.state(), FieldState::Stopped);
    assert_eq!(scheduler.cancelled(), vec![in_flight]);
    assert_eq!(scheduler.peek(), None);

    // Stopped ignores everything else too
    field.on_pointer_move(Vec2::new(5.0, 5.0));
    field.on_surface_resize();
    assert_eq!(field.pointer(), None);
    assert_eq!(scheduler.requested(), 2);
}

#[test]
fn test_backdrop_lifecycle() {
    let surface = RecordingSurface::new(Vec2::new(1280.0, 720.0));
    let scheduler = ManualScheduler::new();
    let mut backdrop = GradientBackground::new(
        surface.clone(),
        scheduler.clone(),
        &mut SequenceRandom::new([0.1, 0.9, 0.5, 0.3, 0.7]),
        GradientConfig::default(),
    );

    for _ in 0..5 {
        assert!(backdrop.advance_frame(scheduler.take_next().unwrap()));
    }
    assert_eq!(surface.frames(), 5);
    // Base fill plus one gradient per blob, every frame
    assert_eq!(surface.commands().len(), 5 * 5);

    let pending = backdrop.pending_frame().unwrap();
    backdrop.destroy();
    backdrop.destroy();
    assert_eq!(scheduler.cancelled(), vec![pending]);
    assert!(!backdrop.advance_frame(pending));
    assert_eq!(surface.frames(), 5);
}
