//! Treasure Run - a boat arcade game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, kinematics, abilities, collisions, timers)
//! - `game`: Screen state machine and fixed-step match loop
//! - `progression`: Rewards, phase unlocks and the shop
//! - `catalog`: Phase/ship/ability tables
//! - `profile` / `persistence`: Player profile and keyed blob storage
//! - `settings`: Runtime configuration

pub mod catalog;
pub mod game;
pub mod persistence;
pub mod profile;
pub mod progression;
pub mod settings;
pub mod sim;

pub use catalog::{Ability, AbilityKind, Catalog, Phase, Role, Ship};
pub use game::{Frame, Game, Screen};
pub use profile::PlayerProfile;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second of game time)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame we integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play-field dimensions (x is lateral, z is depth)
    pub const WORLD_SIZE: f32 = 100.0;
    /// Depth of the island row (far side of the board)
    pub const ISLAND_Z: f32 = -40.0;
    /// Depth of the dock line where the boat launches
    pub const DOCK_Z: f32 = 40.0;
    /// How far past the island row / dock line the boat may travel
    pub const BOUNDARY_MARGIN: f32 = 10.0;

    /// Boat handling (per tick)
    pub const ACCELERATION: f32 = 0.015;
    pub const DECELERATION: f32 = 0.96;
    pub const MAX_SPEED: f32 = 0.35;
    pub const ROTATION_SPEED: f32 = 0.08;
    pub const BOOST_MULTIPLIER: f32 = 1.8;
    pub const REVERSE_FACTOR: f32 = 0.5;

    /// Proximity radii
    pub const MINE_HIT_RADIUS: f32 = 3.0;
    pub const DOCK_RADIUS: f32 = 12.0;

    /// Board generation
    pub const ISLAND_SLOTS_X: [f32; 3] = [-33.0, 0.0, 33.0];
    pub const MINE_SPACING: f32 = 8.0;
    pub const ISLAND_CLEARANCE: f32 = 15.0;
    pub const DOCK_CLEARANCE: f32 = 15.0;
    pub const MINE_PLACEMENT_ATTEMPTS: u32 = 50;
    /// Lateral spread of mines as a fraction of WORLD_SIZE
    pub const MINE_SPREAD: f32 = 0.8;
    /// First phase whose mines drift
    pub const DRIFT_START_PHASE: u32 = 6;
    /// Maximum drift speed (per tick)
    pub const MAX_DRIFT_SPEED: f32 = 0.05;
}

/// Convert seconds of game time to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::TICK_RATE as f32).round().max(0.0) as u64
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit direction for a heading. Heading 0 points toward +z (the dock).
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), heading.cos())
}

/// Heading that points from `from` toward `to`
#[inline]
pub fn heading_towards(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(d.y)
}
