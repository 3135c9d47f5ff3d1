//! Board layout: islands, mines and their generation
//!
//! Positions are planar: `x` is lateral, `y` holds the world z (depth).

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Phase;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Island {
    pub id: u32,
    pub pos: Vec2,
    pub has_treasure: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mine {
    pub id: u32,
    pub pos: Vec2,
    /// Drift per tick (moving-mine phases only)
    pub vel: Option<Vec2>,
    /// Fake mine placed by a defender; never detonates
    #[serde(default)]
    pub decoy: bool,
}

/// Lift a planar position into the renderer's 3D space (y up)
#[inline]
pub fn to_world(pos: Vec2) -> Vec3 {
    Vec3::new(pos.x, 0.0, pos.y)
}

/// Per-match arrangement of islands and mines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub islands: Vec<Island>,
    /// Kept sorted by id
    pub mines: Vec<Mine>,
    next_mine_id: u32,
}

impl Board {
    /// Empty board (defender setup starts here)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Board with the first `count` island slots and treasure on `treasure_idx`
    pub fn with_islands(count: usize, treasure_idx: usize) -> Self {
        let islands = ISLAND_SLOTS_X
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, &x)| Island {
                id: i as u32,
                pos: Vec2::new(x, ISLAND_Z),
                has_treasure: i == treasure_idx,
            })
            .collect();
        Self {
            islands,
            mines: Vec::new(),
            next_mine_id: 0,
        }
    }

    /// Add a mine and return its id
    pub fn add_mine(&mut self, pos: Vec2, vel: Option<Vec2>, decoy: bool) -> u32 {
        self.next_mine_id += 1;
        let id = self.next_mine_id;
        self.mines.push(Mine { id, pos, vel, decoy });
        id
    }

    /// Remove a mine by id. Returns false if it was not on the board.
    pub fn remove_mine(&mut self, id: u32) -> bool {
        let before = self.mines.len();
        self.mines.retain(|m| m.id != id);
        self.mines.len() != before
    }

    pub fn treasure_island(&self) -> Option<&Island> {
        self.islands.iter().find(|i| i.has_treasure)
    }

    /// Whether `pos` satisfies the spacing rules against everything placed so far
    pub fn is_clear_for_mine(&self, pos: Vec2) -> bool {
        let far_from_mines = self
            .mines
            .iter()
            .all(|m| m.pos.distance(pos) > MINE_SPACING);
        let far_from_islands = self
            .islands
            .iter()
            .all(|i| i.pos.distance(pos) > ISLAND_CLEARANCE);
        let far_from_dock = (pos.y - DOCK_Z).abs() > DOCK_CLEARANCE;

        far_from_mines && far_from_islands && far_from_dock
    }
}

/// Generate a random board for `phase`
///
/// Mines that cannot be placed within the attempt budget are dropped, so the
/// board may hold fewer mines than rolled.
pub fn generate<R: Rng>(phase: &Phase, rng: &mut R) -> Board {
    let island_count = phase.islands.clamp(1, ISLAND_SLOTS_X.len());
    let treasure_idx = rng.random_range(0..island_count);
    let mut board = Board::with_islands(island_count, treasure_idx);

    let min = phase.min_mines.min(phase.max_mines);
    let mine_count = rng.random_range(min..=phase.max_mines);
    let half_spread = WORLD_SIZE * MINE_SPREAD / 2.0;
    let drifting = phase.id >= DRIFT_START_PHASE;
    let mut dropped = 0;

    for _ in 0..mine_count {
        let mut placed = false;
        for _ in 0..MINE_PLACEMENT_ATTEMPTS {
            let pos = Vec2::new(
                rng.random_range(-half_spread..half_spread),
                rng.random_range(ISLAND_Z..DOCK_Z),
            );
            if !board.is_clear_for_mine(pos) {
                continue;
            }

            // Each component in [-MAX/2, MAX/2) keeps |v| under MAX_DRIFT_SPEED
            let vel = drifting.then(|| {
                let half = MAX_DRIFT_SPEED / 2.0;
                Vec2::new(rng.random_range(-half..half), rng.random_range(-half..half))
            });
            board.add_mine(pos, vel, false);
            placed = true;
            break;
        }
        if !placed {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::debug!(
            "Phase {}: dropped {} of {} mines (no room)",
            phase.id,
            dropped,
            mine_count
        );
    }
    log::info!(
        "Generated board for phase {}: {} islands, {} mines",
        phase.id,
        board.islands.len(),
        board.mines.len()
    );

    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_phase_one_board() {
        let catalog = Catalog::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let board = generate(catalog.phase_or_first(1), &mut rng);

        assert_eq!(board.islands.len(), 1);
        assert!(board.islands[0].has_treasure);
        assert!((2..=3).contains(&board.mines.len()));
        assert!(board.mines.iter().all(|m| m.vel.is_none()));
    }

    #[test]
    fn test_drifting_mines_from_phase_six() {
        let catalog = Catalog::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let board = generate(catalog.phase_or_first(6), &mut rng);
        assert!(!board.mines.is_empty());
        for mine in &board.mines {
            let vel = mine.vel.expect("phase 6 mines drift");
            assert!(vel.length() <= MAX_DRIFT_SPEED);
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let catalog = Catalog::default();
        let phase = catalog.phase_or_first(3);
        let a = generate(phase, &mut Pcg32::seed_from_u64(9));
        let b = generate(phase, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_crowded_phase_drops_mines_quietly() {
        let mut phase = Catalog::default().phases[2].clone();
        phase.min_mines = 200;
        phase.max_mines = 200;
        let board = generate(&phase, &mut Pcg32::seed_from_u64(1));
        assert!(board.mines.len() < 200);
        assert!(!board.mines.is_empty());
    }

    #[test]
    fn test_mine_ids_increase() {
        let mut board = Board::empty();
        let a = board.add_mine(Vec2::ZERO, None, false);
        let b = board.add_mine(Vec2::ONE, None, true);
        assert!(b > a);
        assert!(board.remove_mine(a));
        assert!(!board.remove_mine(a));
        assert_eq!(board.mines.len(), 1);
    }

    #[test]
    fn test_to_world() {
        assert_eq!(to_world(Vec2::new(3.0, -40.0)), Vec3::new(3.0, 0.0, -40.0));
    }
}
