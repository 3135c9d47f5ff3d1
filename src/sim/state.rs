//! Match state and core simulation types
//!
//! Everything the simulation mutates during one attack run lives here. The
//! boat position in this struct is authoritative; renderers only read it.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::catalog::AbilityKind;
use crate::consts::DOCK_Z;

/// Terminal result of an attack run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Win,
    LossMine,
    LossWrongIsland,
    LossTimeout,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

/// The player's boat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub pos: Vec2,
    /// Radians; 0 faces +z (toward the dock)
    pub heading: f32,
    pub vel: Vec2,
}

impl Default for Boat {
    fn default() -> Self {
        Self {
            pos: Vec2::new(0.0, DOCK_Z),
            // Face the island row
            heading: std::f32::consts::PI,
            vel: Vec2::ZERO,
        }
    }
}

impl Boat {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Abilities currently in effect, keyed to the activation that started them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveAbilities {
    active: BTreeMap<AbilityKind, u64>,
    next_token: u64,
}

impl ActiveAbilities {
    pub fn is_active(&self, kind: AbilityKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Mark `kind` active and return the activation token
    pub fn activate(&mut self, kind: AbilityKind) -> u64 {
        self.next_token += 1;
        self.active.insert(kind, self.next_token);
        self.next_token
    }

    /// Deactivate regardless of which activation is live
    pub fn deactivate(&mut self, kind: AbilityKind) -> bool {
        self.active.remove(&kind).is_some()
    }

    /// Deactivate only if `token` is still the live activation
    pub fn expire(&mut self, kind: AbilityKind, token: u64) -> bool {
        if self.active.get(&kind) == Some(&token) {
            self.active.remove(&kind);
            true
        } else {
            false
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = AbilityKind> + '_ {
        self.active.keys().copied()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// One attack run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Match instance id; timers tagged with another generation are stale
    pub generation: u64,
    /// Phase the board was generated for
    pub phase_id: u32,
    pub board: Board,
    pub boat: Boat,
    /// Ship speed multiplier, fixed at match start
    pub speed_mult: f32,
    pub abilities: ActiveAbilities,
    /// Mine ids currently visible to the player
    pub revealed_mines: BTreeSet<u32>,
    /// Island ids marked as wrong by the volcano
    pub foggy_islands: BTreeSet<u32>,
    /// Whole seconds left on the countdown
    pub time_remaining: u32,
    pub outcome: Option<Outcome>,
    /// Simulation ticks elapsed in this run
    pub ticks: u64,
}

impl Match {
    pub fn new(generation: u64, phase_id: u32, board: Board, speed_mult: f32, time_limit: u32) -> Self {
        Self {
            generation,
            phase_id,
            board,
            boat: Boat::default(),
            speed_mult,
            abilities: ActiveAbilities::default(),
            revealed_mines: BTreeSet::new(),
            foggy_islands: BTreeSet::new(),
            time_remaining: time_limit,
            outcome: None,
            ticks: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record the outcome unless one is already set. Returns true if latched.
    pub fn latch(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        log::info!("Match {} outcome: {:?}", self.generation, outcome);
        self.outcome = Some(outcome);
        true
    }

    /// Advance the countdown by one second, latching a timeout at zero
    pub fn countdown_tick(&mut self) {
        if self.is_over() {
            return;
        }
        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            self.latch(Outcome::LossTimeout);
        } else {
            self.time_remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_latches_once() {
        let mut m = Match::new(1, 1, Board::empty(), 1.0, 25);
        assert!(m.latch(Outcome::LossMine));
        assert!(!m.latch(Outcome::Win));
        assert_eq!(m.outcome, Some(Outcome::LossMine));
    }

    #[test]
    fn test_countdown_times_out() {
        let mut m = Match::new(1, 1, Board::empty(), 1.0, 2);
        m.countdown_tick();
        assert_eq!(m.time_remaining, 1);
        assert!(m.outcome.is_none());
        m.countdown_tick();
        assert_eq!(m.time_remaining, 0);
        assert_eq!(m.outcome, Some(Outcome::LossTimeout));
    }

    #[test]
    fn test_countdown_inert_after_outcome() {
        let mut m = Match::new(1, 1, Board::empty(), 1.0, 10);
        m.latch(Outcome::Win);
        m.countdown_tick();
        assert_eq!(m.time_remaining, 10);
        assert_eq!(m.outcome, Some(Outcome::Win));
    }

    #[test]
    fn test_stale_expiry_keeps_new_activation() {
        let mut set = ActiveAbilities::default();
        let first = set.activate(AbilityKind::Shield);
        assert!(set.deactivate(AbilityKind::Shield));
        let second = set.activate(AbilityKind::Shield);
        assert!(!set.expire(AbilityKind::Shield, first));
        assert!(set.is_active(AbilityKind::Shield));
        assert!(set.expire(AbilityKind::Shield, second));
        assert!(set.is_empty());
    }

    #[test]
    fn test_outcome_serializes_like_tag() {
        let json = serde_json::to_string(&Outcome::LossWrongIsland).unwrap();
        assert_eq!(json, "\"LOSS_WRONG_ISLAND\"");
    }
}
