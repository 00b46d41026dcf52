//! Headless flight-integrator runs: force balance, command response and
//! ground handling over real fixed ticks.

use bevy::prelude::*;

use drone_fleet::controls::ControlCommand;
use drone_fleet::fleet::Authority;
use drone_fleet::flight::{FlightConfig, FlightState, Velocity};
use drone_fleet::headless_app;

/// A bare authoritative drone with a frozen command; no input source is
/// attached, so the command is exactly what the test sets.
fn spawn_drone(app: &mut App, position: Vec3, axes: [f32; 4]) -> Entity {
    let mut command = ControlCommand::default();
    command.publish(axes);
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            command,
            FlightState::default(),
            Velocity::default(),
            Authority,
        ))
        .id()
}

fn run(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        app.update();
    }
}

#[test]
fn idle_drone_hovers_in_place() {
    let mut app = headless_app(1);
    let start = Vec3::new(0.0, 10.0, 0.0);
    let drone = spawn_drone(&mut app, start, [0.0; 4]);
    run(&mut app, 120);

    // Lift exactly compensates gravity, so nothing moves.
    let transform = app.world().get::<Transform>(drone).unwrap();
    assert!(
        transform.translation.distance(start) < 1e-3,
        "drifted to {}",
        transform.translation
    );
}

#[test]
fn full_lift_climbs() {
    let mut app = headless_app(1);
    let drone = spawn_drone(&mut app, Vec3::new(0.0, 5.0, 0.0), [0.0, 0.0, 0.0, 1.0]);
    run(&mut app, 120);

    let transform = app.world().get::<Transform>(drone).unwrap();
    assert!(transform.translation.y > 10.0, "y = {}", transform.translation.y);
}

#[test]
fn forward_pitch_moves_forward_and_tilts() {
    let mut app = headless_app(1);
    let drone = spawn_drone(&mut app, Vec3::new(0.0, 10.0, 0.0), [1.0, 0.0, 0.0, 0.0]);
    run(&mut app, 120);

    let transform = app.world().get::<Transform>(drone).unwrap();
    let state = app.world().get::<FlightState>(drone).unwrap();
    // Default facing is -Z.
    assert!(transform.translation.z < -5.0, "z = {}", transform.translation.z);
    assert!(state.current_pitch > 20.0, "pitch = {}", state.current_pitch);
    // Altitude is held while translating.
    assert!(
        (transform.translation.y - 10.0).abs() < 0.5,
        "y = {}",
        transform.translation.y
    );
}

#[test]
fn yaw_accumulates_per_tick() {
    let mut app = headless_app(1);
    let drone = spawn_drone(&mut app, Vec3::new(0.0, 10.0, 0.0), [0.0, 0.0, 1.0, 0.0]);
    run(&mut app, 90);

    // 4 degrees of heading per tick at full yaw.
    let state = app.world().get::<FlightState>(drone).unwrap();
    assert!((state.yaw - 360.0).abs() < 1e-3, "yaw = {}", state.yaw);
}

#[test]
fn pitch_respects_rotation_limits() {
    let mut app = headless_app(1);
    let drone = spawn_drone(&mut app, Vec3::new(0.0, 10.0, 0.0), [1.0, 0.0, 0.0, 0.0]);
    run(&mut app, 600);

    let cfg = app.world().resource::<FlightConfig>().clone();
    let state = app.world().get::<FlightState>(drone).unwrap();
    assert!(state.current_pitch <= cfg.pitch_limit.y + 1e-3);
}

#[test]
fn gravity_when_idle_free_falls() {
    let mut app = headless_app(1);
    app.insert_resource(FlightConfig {
        gravity_when_idle: true,
        ..FlightConfig::default()
    });
    let drone = spawn_drone(&mut app, Vec3::new(0.0, 10.0, 0.0), [0.0; 4]);
    run(&mut app, 60);

    // No gravity-compensation term: zero lift means falling.
    let transform = app.world().get::<Transform>(drone).unwrap();
    let velocity = app.world().get::<Velocity>(drone).unwrap();
    assert!(transform.translation.y < 9.0, "y = {}", transform.translation.y);
    assert!(velocity.linear.y < 0.0, "vy = {}", velocity.linear.y);
}

#[test]
fn hover_bob_oscillates_around_the_hold_altitude() {
    let mut app = headless_app(1);
    app.insert_resource(FlightConfig {
        hover: true,
        ..FlightConfig::default()
    });
    let start = 10.0;
    let drone = spawn_drone(&mut app, Vec3::new(0.0, start, 0.0), [0.0; 4]);

    let mut min_y = start;
    let mut max_y = start;
    // 10 s covers several periods of the bob sine.
    for _ in 0..600 {
        app.update();
        let y = app.world().get::<Transform>(drone).unwrap().translation.y;
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    assert!(max_y > start + 0.05, "never rose above hold: {max_y}");
    assert!(min_y < start - 0.05, "never dipped below hold: {min_y}");
    assert!(max_y - min_y < 3.0, "bob out of bounds: {min_y}..{max_y}");
}

#[test]
fn grounded_deceleration_shrinks_speed_monotonically() {
    let mut app = headless_app(1);
    app.insert_resource(FlightConfig {
        decelerate_on_ground: true,
        ..FlightConfig::default()
    });
    let drone = spawn_drone(&mut app, Vec3::ZERO, [0.0; 4]);
    app.world_mut().get_mut::<Velocity>(drone).unwrap().linear = Vec3::new(10.0, 0.0, 0.0);

    let mut last = 10.0_f32;
    for _ in 0..120 {
        app.update();
        let velocity = app.world().get::<Velocity>(drone).unwrap();
        let speed = velocity.linear.length();
        assert!(speed <= last + 1e-6, "speed grew: {last} -> {speed}");
        // Shrinks toward zero without reversing direction.
        assert!(velocity.linear.x >= 0.0, "reversed: {}", velocity.linear.x);
        last = speed;
    }
    assert!(last < 2.0, "still moving at {last}");
}

#[test]
fn drone_never_sinks_below_the_ground() {
    let mut app = headless_app(1);
    // Full negative lift, straight down.
    let drone = spawn_drone(&mut app, Vec3::new(0.0, 3.0, 0.0), [0.0, 0.0, 0.0, -1.0]);
    run(&mut app, 300);

    let transform = app.world().get::<Transform>(drone).unwrap();
    let state = app.world().get::<FlightState>(drone).unwrap();
    assert!(transform.translation.y >= 0.0, "y = {}", transform.translation.y);
    assert!(state.grounded);
}
