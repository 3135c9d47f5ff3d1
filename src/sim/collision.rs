//! Proximity checks and outcome resolution
//!
//! Runs on the resolver poll, not every tick. Reads only the authoritative
//! boat position held in the match state.

use glam::Vec2;

use super::state::{Match, Outcome};
use crate::catalog::AbilityKind;
use crate::consts::{DOCK_RADIUS, MINE_HIT_RADIUS};

/// What a resolver pass did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolveReport {
    /// Mines removed by the shield this pass
    pub absorbed: Vec<u32>,
    /// Mines passed through under ghost ship
    pub ghosted: Vec<u32>,
    /// Outcome latched by this pass
    pub outcome: Option<Outcome>,
}

#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Check the boat against every mine and island.
///
/// Mines are checked in ascending id order, so when several are in range the
/// lowest id resolves first. A shield absorbs exactly one hit; any later mine
/// in range during the same pass is checked as if no shield were up.
pub fn resolve(run: &mut Match) -> ResolveReport {
    let mut report = ResolveReport::default();
    if run.is_over() {
        return report;
    }
    let boat = run.boat.pos;

    let mut hits: Vec<u32> = run
        .board
        .mines
        .iter()
        .filter(|m| !m.decoy && within(boat, m.pos, MINE_HIT_RADIUS))
        .map(|m| m.id)
        .collect();
    hits.sort_unstable();

    for id in hits {
        if run.abilities.deactivate(AbilityKind::Shield) {
            run.board.remove_mine(id);
            run.revealed_mines.remove(&id);
            log::info!("Shield absorbed mine {}", id);
            report.absorbed.push(id);
        } else if run.abilities.is_active(AbilityKind::GhostShip) {
            report.ghosted.push(id);
        } else {
            run.latch(Outcome::LossMine);
            report.outcome = run.outcome;
            return report;
        }
    }

    let docked = run
        .board
        .islands
        .iter()
        .find(|i| within(boat, i.pos, DOCK_RADIUS))
        .map(|i| i.has_treasure);
    if let Some(has_treasure) = docked {
        let outcome = if has_treasure {
            Outcome::Win
        } else {
            Outcome::LossWrongIsland
        };
        run.latch(outcome);
        report.outcome = run.outcome;
    }

    report
}
