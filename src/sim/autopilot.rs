//! Idle/demo steering
//!
//! Produces control input that sails the boat toward a target point. Used by
//! the headless demo binary and by end-to-end tests.

use glam::Vec2;

use super::kinematics::ControlInput;
use super::state::{Boat, Match};
use crate::consts::ROTATION_SPEED;
use crate::{heading_towards, normalize_angle};

/// Steer toward `target`, thrusting once roughly lined up
pub fn steer_towards(boat: &Boat, target: Vec2) -> ControlInput {
    let desired = heading_towards(boat.pos, target);
    let error = normalize_angle(desired - boat.heading);
    let deadband = ROTATION_SPEED / 2.0;

    ControlInput {
        forward: error.abs() < std::f32::consts::FRAC_PI_2,
        backward: false,
        left: error > deadband,
        right: error < -deadband,
        boost: false,
    }
}

/// Sail for the treasure island (or hold still if there is none)
pub fn seek_treasure(run: &Match) -> ControlInput {
    match run.board.treasure_island() {
        Some(island) => steer_towards(&run.boat, island.pos),
        None => ControlInput::default(),
    }
}
