//! Autopilot runs through the full stack: waypoint seeking, avoidance,
//! fleet message flow and seeded determinism.

use bevy::prelude::*;

use drone_fleet::autopilot::{Autopilot, Obstacle, SteeringMode};
use drone_fleet::controls::ControlCommand;
use drone_fleet::fleet::{Authority, ClientId, DroneStatus, FleetRegistry, PilotJoined, PilotLeft};
use drone_fleet::flight::{FlightState, Velocity};
use drone_fleet::headless_app;

fn spawn_pilot(app: &mut App, position: Vec3, pilot: Autopilot) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            ControlCommand::default(),
            FlightState::default(),
            Velocity::default(),
            Authority,
            pilot,
        ))
        .id()
}

fn run(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        app.update();
    }
}

#[test]
fn seeks_a_waypoint_and_holds_there() {
    let mut app = headless_app(1);
    let waypoint = Vec3::new(0.0, 2.0, -5.0);
    let drone = spawn_pilot(
        &mut app,
        Vec3::new(0.0, 2.0, 0.0),
        Autopilot::patrol(vec![waypoint]),
    );

    // A couple of ticks of steering push pitch positive: the waypoint sits
    // dead ahead of the default -Z facing.
    run(&mut app, 2);
    let command = app.world().get::<ControlCommand>(drone).unwrap();
    assert!(command.pitch > 0.0, "pitch = {}", command.pitch);

    // Let it fly out, overshoot and settle.
    let mut closest = f32::MAX;
    for _ in 0..1800 {
        app.update();
        let transform = app.world().get::<Transform>(drone).unwrap();
        closest = closest.min(transform.translation.distance(waypoint));
    }
    assert!(closest < 1.0, "never reached the waypoint, closest = {closest}");

    // A single-point circuit wraps onto itself; the drone orbits tightly.
    let pilot = app.world().get::<Autopilot>(drone).unwrap();
    assert_eq!(pilot.waypoint_index(), 0);
    let stop = pilot.stop_distance;
    let mut farthest = 0.0_f32;
    for _ in 0..300 {
        app.update();
        let transform = app.world().get::<Transform>(drone).unwrap();
        farthest = farthest.max(transform.translation.distance(waypoint));
    }
    // The seek never parks: the direction stays unit length however close
    // the target is, so the settled motion is a small orbit around the
    // point, a few stop distances across at most.
    assert!(farthest < 4.0 * stop, "wandered off to {farthest}");
}

#[test]
fn circuit_indices_advance_in_order() {
    let mut app = headless_app(1);
    let circuit = vec![Vec3::new(0.0, 2.0, -5.0), Vec3::new(5.0, 2.0, -5.0)];
    let drone = spawn_pilot(
        &mut app,
        Vec3::new(0.0, 2.0, 0.0),
        Autopilot::patrol(circuit),
    );

    // Visiting the first point moves the cursor to the second.
    let mut advanced = false;
    for _ in 0..1800 {
        app.update();
        if app.world().get::<Autopilot>(drone).unwrap().waypoint_index() == 1 {
            advanced = true;
            break;
        }
    }
    assert!(advanced, "never advanced past the first waypoint");
}

#[test]
fn obstacle_on_the_path_deflects_the_track() {
    let clear_track = track_through(None);
    let blocked_track = track_through(Some(Vec3::new(0.0, 2.0, -10.0)));
    // With a pillar mid-path the drone swings wide of the straight line.
    assert!(
        blocked_track > clear_track + 0.5,
        "clear = {clear_track}, blocked = {blocked_track}"
    );
}

/// Max |x| the drone reaches while flying 20 units straight down -Z,
/// optionally past an obstacle.
fn track_through(obstacle: Option<Vec3>) -> f32 {
    let mut app = headless_app(1);
    if let Some(center) = obstacle {
        app.world_mut()
            .spawn((Transform::from_translation(center), Obstacle { radius: 1.0 }));
    }
    let drone = spawn_pilot(
        &mut app,
        Vec3::new(0.0, 2.0, 0.0),
        Autopilot::patrol(vec![Vec3::new(0.0, 2.0, -20.0)]),
    );
    let mut max_lateral = 0.0_f32;
    for _ in 0..600 {
        app.update();
        max_lateral = max_lateral.max(app.world().get::<Transform>(drone).unwrap().translation.x.abs());
    }
    max_lateral
}

#[test]
fn same_seed_replays_the_same_wander() {
    let first = wander_positions(9);
    let second = wander_positions(9);
    assert_eq!(first, second, "seeded wander runs diverged");
}

fn wander_positions(seed: u64) -> Vec<[u32; 3]> {
    let mut app = headless_app(seed);
    let mut drones = Vec::new();
    for i in 0..3 {
        drones.push(spawn_pilot(
            &mut app,
            Vec3::new(i as f32 * 4.0, 5.0, 0.0),
            Autopilot::with_mode(SteeringMode::Wander),
        ));
    }
    run(&mut app, 600);
    // Bit-exact comparison.
    drones
        .iter()
        .map(|&drone| {
            let p = app.world().get::<Transform>(drone).unwrap().translation;
            [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
        })
        .collect()
}

#[test]
fn join_spawns_and_leave_despawns() {
    let mut app = headless_app(1);
    let client = ClientId(7);
    app.world_mut().write_message(PilotJoined {
        client,
        position: Vec3::new(0.0, 5.0, 0.0),
    });
    app.update();

    let drone = app
        .world()
        .resource::<FleetRegistry>()
        .get(client)
        .expect("join should register a drone");
    assert!(app.world().get::<Authority>(drone).is_some());
    assert!(app.world().get::<Autopilot>(drone).is_some());

    app.world_mut().write_message(PilotLeft { client });
    app.update();
    assert!(app.world().resource::<FleetRegistry>().get(client).is_none());
    assert!(app.world().get_entity(drone).is_err());
}

#[test]
fn status_is_broadcast_each_tick() {
    let mut app = headless_app(1);
    let client = ClientId(3);
    app.world_mut().write_message(PilotJoined {
        client,
        position: Vec3::new(1.0, 5.0, 2.0),
    });
    app.update();
    app.update();

    let statuses: Vec<DroneStatus> = app
        .world_mut()
        .resource_mut::<Messages<DroneStatus>>()
        .drain()
        .collect();
    assert!(!statuses.is_empty(), "no status emitted");
    let status = statuses.last().unwrap();
    assert_eq!(status.client, client);
    assert!(!status.grounded);
}
