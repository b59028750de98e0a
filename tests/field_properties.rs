//! Behavioral properties of the particle field, observed through the
//! recording surface.

use cellfield::{
    DrawCommand, EntropyRandom, FieldConfig, ManualScheduler, Paint, Particle, ParticleField,
    RandomSource, RecordingSurface, Rect, SequenceRandom, Vec2,
};

fn field_with<R: RandomSource>(
    container: Vec2,
    rng: R,
    config: FieldConfig,
) -> (ParticleField<RecordingSurface, ManualScheduler, R>, RecordingSurface, ManualScheduler) {
    let surface = RecordingSurface::new(container);
    let scheduler = ManualScheduler::new();
    let field = ParticleField::attach(Some(surface.clone()), scheduler.clone(), rng, config);
    (field, surface, scheduler)
}

/// Fire the outstanding frame, as the host would.
fn step<R: RandomSource>(
    field: &mut ParticleField<RecordingSurface, ManualScheduler, R>,
    scheduler: &ManualScheduler,
) {
    let handle = scheduler.take_next().expect("a frame should be pending");
    assert!(field.advance_frame(handle));
}

#[test]
fn test_particle_count_follows_area() {
    let sizes = [
        (0u32, 0u32),
        (1, 1),
        (122, 123),
        (150, 100),
        (300, 300),
        (600, 300),
        (1280, 720),
        (1920, 1080),
        (2560, 1440),
    ];
    for (w, h) in sizes {
        let (field, _, _) = field_with(
            Vec2::new(w as f32, h as f32),
            SequenceRandom::constant(0.5),
            FieldConfig::default(),
        );
        let expected = (w as u64 * h as u64 / 15_000) as usize;
        assert_eq!(field.particles().len(), expected, "{}x{}", w, h);
    }
}

#[test]
fn test_particles_stay_in_bounds() {
    let mut config = FieldConfig::default();
    config.max_speed = 40.0;
    let (mut field, _, scheduler) =
        field_with(Vec2::new(400.0, 300.0), EntropyRandom::seeded(3), config);
    assert_eq!(field.particles().len(), 8);

    for _ in 0..2_000 {
        step(&mut field, &scheduler);
        for p in field.particles() {
            assert!((0.0..=400.0).contains(&p.position.x), "x = {}", p.position.x);
            assert!((0.0..=300.0).contains(&p.position.y), "y = {}", p.position.y);
        }
    }
}

#[test]
fn test_velocity_flips_once_per_crossing() {
    let size = Vec2::new(50.0, 20.0);
    let mut rng = EntropyRandom::seeded(5);
    let mut config = FieldConfig::default();
    config.max_speed = 7.0;

    for _ in 0..20 {
        let mut p = Particle::spawn(&mut rng, size, &config);
        let speed = p.velocity.abs();

        for _ in 0..500 {
            let next = p.position + p.velocity;
            let crosses_x = next.x < 0.0 || next.x > size.x;
            let crosses_y = next.y < 0.0 || next.y > size.y;
            let before = p.velocity;

            p.advance(size);

            assert_eq!(p.velocity.x == -before.x && before.x != 0.0, crosses_x);
            assert_eq!(p.velocity.y == -before.y && before.y != 0.0, crosses_y);
            assert_eq!(p.velocity.abs(), speed);
        }
    }
}

#[test]
fn test_link_opacity_curve() {
    let links = FieldConfig::default().links;

    assert!((links.opacity_at(0.0).unwrap() - 0.12).abs() < 1e-6);
    assert!((links.opacity_at(100.0).unwrap() - 0.04).abs() < 1e-4);
    assert_eq!(links.opacity_at(150.0), None);
    assert_eq!(links.opacity_at(400.0), None);

    let mut last = f32::INFINITY;
    for d in 0..150 {
        let opacity = links.opacity_at(d as f32).unwrap();
        assert!(opacity > 0.0 && opacity < last);
        last = opacity;
    }
}

#[test]
fn test_two_particles_hundred_apart() {
    // 200x150 holds exactly two particles; zero velocity keeps them put
    let rng = SequenceRandom::new([
        0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, // (0, 0)
        0.5, 0.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, // (100, 0)
    ]);
    let (mut field, surface, scheduler) =
        field_with(Vec2::new(200.0, 150.0), rng, FieldConfig::default());
    assert_eq!(field.particles()[0].position, Vec2::new(0.0, 0.0));
    assert_eq!(field.particles()[1].position, Vec2::new(100.0, 0.0));

    step(&mut field, &scheduler);

    let lines: Vec<_> = surface.commands().into_iter().filter(DrawCommand::is_stroke).collect();
    assert_eq!(lines.len(), 1);
    match &lines[0] {
        DrawCommand::StrokeLine { from, to, width, color } => {
            assert_eq!((*from, *to), (Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)));
            assert_eq!(*width, 0.6);
            assert_eq!((color.r, color.g, color.b), (34, 211, 238));
            assert!((color.a - 0.04).abs() < 1e-4);
        }
        other => panic!("expected a line, got {:?}", other),
    }
}

#[test]
fn test_no_pointer_lines_without_pointer() {
    let pointer_width = FieldConfig::default().pointer_links.width;
    let (mut field, surface, scheduler) =
        field_with(Vec2::new(600.0, 400.0), EntropyRandom::seeded(9), FieldConfig::default());

    let has_pointer_line = |commands: &[DrawCommand]| {
        commands
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokeLine { width, .. } if *width == pointer_width))
    };

    for _ in 0..30 {
        step(&mut field, &scheduler);
    }
    assert!(!has_pointer_line(&surface.take_commands()[..]));

    // Pointer right on top of a particle always links to it
    let target = field.particles()[0].position;
    field.on_pointer_move(target);
    step(&mut field, &scheduler);
    assert!(has_pointer_line(&surface.take_commands()[..]));

    field.on_pointer_leave();
    for _ in 0..30 {
        step(&mut field, &scheduler);
    }
    assert!(!has_pointer_line(&surface.take_commands()[..]));
}

#[test]
fn test_pointer_lines_start_at_pointer() {
    let (mut field, surface, scheduler) =
        field_with(Vec2::new(600.0, 400.0), EntropyRandom::seeded(21), FieldConfig::default());
    let pointer = Vec2::new(300.0, 200.0);
    field.on_pointer_move(pointer);
    step(&mut field, &scheduler);

    let pointer_links = FieldConfig::default().pointer_links;
    for command in surface.commands() {
        if let DrawCommand::StrokeLine { from, to, width, color } = command {
            if width == pointer_links.width {
                assert_eq!(from, pointer);
                let expected = pointer_links.opacity_at(from.distance(to)).unwrap();
                assert!((color.a - expected).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn test_empty_field_only_paints_background() {
    let config = FieldConfig::default().with_area_per_particle(100_000.0);
    let trail = config.trail;
    let (mut field, surface, scheduler) =
        field_with(Vec2::new(300.0, 300.0), SequenceRandom::constant(0.5), config);
    assert!(field.particles().is_empty());

    field.on_pointer_move(Vec2::new(150.0, 150.0));
    step(&mut field, &scheduler);

    assert_eq!(
        surface.commands(),
        vec![DrawCommand::FillRect {
            rect: Rect::from_size(Vec2::new(300.0, 300.0)),
            paint: Paint::Solid(trail),
        }]
    );
}
