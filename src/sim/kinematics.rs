//! Per-tick boat and mine integration
//!
//! Arcade handling, not physically exact: drag sets the top speed, turning
//! does not depend on speed, and boost only raises the speed cap.

use glam::Vec2;

use super::board::Mine;
use super::state::Boat;
use crate::consts::*;
use crate::heading_to_dir;

/// Held input intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

/// Current speed cap for the boost state
#[inline]
pub fn speed_cap(boost: bool) -> f32 {
    if boost {
        MAX_SPEED * BOOST_MULTIPLIER
    } else {
        MAX_SPEED
    }
}

/// Bounds the boat may occupy: (min, max) corners in the plane
#[inline]
pub fn boat_bounds() -> (Vec2, Vec2) {
    (
        Vec2::new(-WORLD_SIZE, ISLAND_Z - BOUNDARY_MARGIN),
        Vec2::new(WORLD_SIZE, DOCK_Z + BOUNDARY_MARGIN),
    )
}

/// Advance the boat by one tick
pub fn step_boat(boat: &mut Boat, input: &ControlInput, speed_mult: f32) {
    if input.left {
        boat.heading += ROTATION_SPEED;
    }
    if input.right {
        boat.heading -= ROTATION_SPEED;
    }
    boat.heading = crate::normalize_angle(boat.heading);

    let mut accel = 0.0;
    if input.forward {
        accel = ACCELERATION * speed_mult;
    }
    if input.backward {
        accel = -ACCELERATION * REVERSE_FACTOR * speed_mult;
    }

    let vel = boat.vel * DECELERATION + heading_to_dir(boat.heading) * accel;
    let cap = speed_cap(input.boost);
    boat.vel = if vel.length() > cap {
        vel.normalize_or_zero() * cap
    } else {
        vel
    };

    let (min, max) = boat_bounds();
    boat.pos = (boat.pos + boat.vel).clamp(min, max);
}

/// Advance drifting mines by one tick, bouncing off the field edges
pub fn drift_mines(mines: &mut [Mine]) {
    let half_width = WORLD_SIZE / 2.0;
    for mine in mines.iter_mut() {
        let Some(vel) = mine.vel.as_mut() else {
            continue;
        };
        mine.pos += *vel;

        // Only flip when heading further out, so a mine past the edge
        // does not jitter back and forth
        if mine.pos.x.abs() > half_width && mine.pos.x * vel.x > 0.0 {
            vel.x = -vel.x;
        }
        if (mine.pos.y < ISLAND_Z && vel.y < 0.0) || (mine.pos.y > DOCK_Z && vel.y > 0.0) {
            vel.y = -vel.y;
        }
    }
}
