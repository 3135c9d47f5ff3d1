//! Ability activation and expiry
//!
//! Each ability kind is idle or active. Activation checks every precondition
//! before touching any state, so a rejected request changes nothing. Timed
//! effects schedule an expiry tagged with the match generation and the
//! activation token; an expiry for a superseded activation is a no-op.

use serde::{Deserialize, Serialize};

use super::scheduler::{Scheduler, TimerEvent};
use super::state::Match;
use crate::catalog::{AbilityEffect, AbilityKind, Catalog, Role};
use crate::consts::DOCK_RADIUS;
use crate::profile::PlayerProfile;

/// Everything an activation may touch
pub struct AbilityContext<'a> {
    pub run: &'a mut Match,
    pub profile: &'a mut PlayerProfile,
    pub catalog: &'a Catalog,
    pub scheduler: &'a mut Scheduler,
    /// Current simulation clock
    pub now: u64,
}

/// Which way the treasure lies from the boat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureHint {
    Left,
    Ahead,
    Right,
}

/// Why an activation request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MatchOver,
    NotInCatalog,
    WrongRole,
    Locked,
    AlreadyActive,
    InsufficientCoins,
    NoEffect,
    NoTarget,
}

/// First island that is neither the treasure nor already fogged
fn volcano_target(run: &Match) -> Option<u32> {
    run.board
        .islands
        .iter()
        .find(|i| !i.has_treasure && !run.foggy_islands.contains(&i.id))
        .map(|i| i.id)
}

fn check(kind: AbilityKind, ctx: &AbilityContext<'_>) -> Result<u32, Rejection> {
    if ctx.run.is_over() {
        return Err(Rejection::MatchOver);
    }
    let ability = ctx.catalog.ability(kind).ok_or(Rejection::NotInCatalog)?;
    if ability.role != Role::Attacker {
        return Err(Rejection::WrongRole);
    }
    if !ctx.profile.has_ability(kind) {
        return Err(Rejection::Locked);
    }
    if ctx.run.abilities.is_active(kind) {
        return Err(Rejection::AlreadyActive);
    }
    if ctx.profile.coins < ability.use_cost {
        return Err(Rejection::InsufficientCoins);
    }
    match kind.effect() {
        AbilityEffect::Inert => return Err(Rejection::NoEffect),
        AbilityEffect::MarkWrongIsland if volcano_target(ctx.run).is_none() => {
            return Err(Rejection::NoTarget);
        }
        _ => {}
    }
    Ok(ability.use_cost)
}

/// Try to activate `kind`. Returns true if it took effect.
pub fn activate(kind: AbilityKind, ctx: AbilityContext<'_>) -> bool {
    let cost = match check(kind, &ctx) {
        Ok(cost) => cost,
        Err(reason) => {
            log::debug!("Ability {} rejected: {:?}", kind.id(), reason);
            return false;
        }
    };
    if !ctx.profile.try_spend(cost) {
        return false;
    }

    let run = ctx.run;
    let effect = kind.effect();
    match effect {
        AbilityEffect::Sonar { radius, .. } => {
            let boat = run.boat.pos;
            run.revealed_mines.extend(
                run.board
                    .mines
                    .iter()
                    .filter(|m| m.pos.distance(boat) < radius)
                    .map(|m| m.id),
            );
        }
        AbilityEffect::RevealAll { .. } => {
            run.revealed_mines
                .extend(run.board.mines.iter().map(|m| m.id));
        }
        AbilityEffect::MarkWrongIsland => {
            if let Some(id) = volcano_target(run) {
                run.foggy_islands.insert(id);
            }
        }
        AbilityEffect::Anchor => {
            run.boat.vel = glam::Vec2::ZERO;
        }
        AbilityEffect::Shield { .. }
        | AbilityEffect::Ghost { .. }
        | AbilityEffect::Hint { .. }
        | AbilityEffect::Inert => {}
    }

    if let Some(secs) = effect.duration_secs() {
        let token = run.abilities.activate(kind);
        ctx.scheduler.schedule_once(
            ctx.now,
            crate::secs_to_ticks(secs),
            run.generation,
            TimerEvent::AbilityExpired { kind, token },
        );
    }

    log::info!(
        "Ability {} used ({} coins, {} left)",
        kind.id(),
        cost,
        ctx.profile.coins
    );
    true
}

/// Handle an expiry timer. Returns true if the ability was switched off.
pub fn expire(run: &mut Match, kind: AbilityKind, token: u64) -> bool {
    if !run.abilities.expire(kind, token) {
        log::debug!("Ignoring stale expiry for {}", kind.id());
        return false;
    }
    if matches!(kind.effect(), AbilityEffect::RevealAll { .. }) {
        run.revealed_mines.clear();
    }
    log::debug!("Ability {} expired", kind.id());
    true
}

/// Compass reading while the compass is active
pub fn treasure_hint(run: &Match) -> Option<TreasureHint> {
    if !run.abilities.is_active(AbilityKind::Compass) {
        return None;
    }
    let treasure = run.board.treasure_island()?;
    let dx = treasure.pos.x - run.boat.pos.x;
    Some(if dx.abs() < DOCK_RADIUS {
        TreasureHint::Ahead
    } else if dx < 0.0 {
        TreasureHint::Left
    } else {
        TreasureHint::Right
    })
}
