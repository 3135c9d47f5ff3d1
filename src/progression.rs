//! Rewards, phase unlocks and shop purchases
//!
//! These are the only functions that change a profile's coins or unlocks.
//! Every rejected purchase leaves the profile untouched.

use crate::catalog::{AbilityKind, Catalog};
use crate::profile::PlayerProfile;
use crate::sim::Outcome;

/// Result of settling a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub reward: u32,
    /// Phase the profile moved to, if it advanced
    pub unlocked_phase: Option<u32>,
}

/// Apply a run's outcome to the profile.
///
/// `phase_id` is the phase the run was played on. The profile advances at
/// most one phase per call and never moves backwards.
pub fn settle(
    profile: &mut PlayerProfile,
    catalog: &Catalog,
    phase_id: u32,
    outcome: Outcome,
    consolation_reward: u32,
) -> Settlement {
    let reward = if outcome.is_win() {
        catalog.phase_or_first(phase_id).win_reward
    } else {
        consolation_reward
    };

    profile.coins = profile.coins.saturating_add(reward);
    if outcome.is_win() {
        profile.wins += 1;
    }

    let unlocked_phase = catalog
        .phase(profile.phase + 1)
        .filter(|next| profile.wins >= next.unlock_wins || profile.coins >= next.unlock_cost)
        .map(|next| next.id);
    if let Some(id) = unlocked_phase {
        log::info!("Unlocked phase {}", id);
        profile.phase = id;
    }

    log::info!(
        "Settled {:?}: +{} coins ({} total, {} wins)",
        outcome,
        reward,
        profile.coins,
        profile.wins
    );
    Settlement {
        reward,
        unlocked_phase,
    }
}

/// Buy an ability. Requires the ability's phase and enough coins.
pub fn buy_ability(profile: &mut PlayerProfile, catalog: &Catalog, kind: AbilityKind) -> bool {
    let Some(ability) = catalog.ability(kind) else {
        return false;
    };
    if profile.has_ability(kind) || ability.phase > profile.phase {
        return false;
    }
    if !profile.try_spend(ability.buy_cost) {
        return false;
    }
    profile.unlocked_abilities.insert(kind);
    log::info!("Bought ability {} for {}", kind.id(), ability.buy_cost);
    true
}

/// Buy a ship. Requires its phase, its win count and enough coins.
pub fn buy_ship(profile: &mut PlayerProfile, catalog: &Catalog, ship_id: &str) -> bool {
    let Some(ship) = catalog.ship(ship_id) else {
        return false;
    };
    if profile.owned_ships.contains(ship_id)
        || ship.unlock_phase > profile.phase
        || ship.unlock_wins > profile.wins
    {
        return false;
    }
    if !profile.try_spend(ship.cost) {
        return false;
    }
    profile.owned_ships.insert(ship.id.clone());
    log::info!("Bought ship {} for {}", ship.id, ship.cost);
    true
}

/// Make an owned ship the active one
pub fn select_ship(profile: &mut PlayerProfile, ship_id: &str) -> bool {
    if !profile.owned_ships.contains(ship_id) || profile.active_ship == ship_id {
        return false;
    }
    profile.active_ship = ship_id.to_string();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn profile(coins: u32, wins: u32, phase: u32) -> PlayerProfile {
        let mut p = PlayerProfile::new_random(&mut Pcg32::seed_from_u64(5), coins);
        p.wins = wins;
        p.phase = phase;
        p
    }

    #[test]
    fn test_win_pays_phase_reward() {
        let catalog = Catalog::default();
        let mut p = profile(0, 0, 1);
        let s = settle(&mut p, &catalog, 1, Outcome::Win, 10);
        assert_eq!(s.reward, 50);
        assert_eq!(p.coins, 50);
        assert_eq!(p.wins, 1);
    }

    #[test]
    fn test_loss_pays_consolation() {
        let catalog = Catalog::default();
        let mut p = profile(100, 2, 2);
        let s = settle(&mut p, &catalog, 2, Outcome::LossMine, 10);
        assert_eq!(s.reward, 10);
        assert_eq!(p.coins, 110);
        assert_eq!(p.wins, 2);
        assert_eq!(p.phase, 2);
    }

    #[test]
    fn test_unlock_by_coins() {
        let catalog = Catalog::default();
        // Phase 2 opens at 500 coins or 5 wins
        let mut p = profile(450, 0, 1);
        let s = settle(&mut p, &catalog, 1, Outcome::Win, 10);
        assert_eq!(p.coins, 500);
        assert_eq!(s.unlocked_phase, Some(2));
        assert_eq!(p.phase, 2);
    }

    #[test]
    fn test_thresholds_come_from_next_phase() {
        let catalog = Catalog::default();
        // 525 coins clears phase 2's bar but not phase 3's (1500 or 15 wins)
        let mut p = profile(450, 0, 2);
        let s = settle(&mut p, &catalog, 2, Outcome::Win, 10);
        assert_eq!(p.coins, 525);
        assert_eq!(s.unlocked_phase, None);
        assert_eq!(p.phase, 2);

        let mut p = profile(1425, 0, 2);
        let s = settle(&mut p, &catalog, 2, Outcome::Win, 10);
        assert_eq!(p.coins, 1500);
        assert_eq!(s.unlocked_phase, Some(3));
    }

    #[test]
    fn test_unlock_by_wins() {
        let catalog = Catalog::default();
        let mut p = profile(0, 4, 1);
        settle(&mut p, &catalog, 1, Outcome::Win, 10);
        assert_eq!(p.phase, 2);
    }

    #[test]
    fn test_advances_one_phase_at_most() {
        let catalog = Catalog::default();
        let mut p = profile(100_000, 500, 1);
        settle(&mut p, &catalog, 1, Outcome::LossTimeout, 10);
        assert_eq!(p.phase, 2);
    }

    #[test]
    fn test_last_phase_stays() {
        let catalog = Catalog::default();
        let mut p = profile(100_000, 500, 8);
        let s = settle(&mut p, &catalog, 8, Outcome::Win, 10);
        assert_eq!(s.unlocked_phase, None);
        assert_eq!(p.phase, 8);
    }

    #[test]
    fn test_buy_ability() {
        let catalog = Catalog::default();
        let mut p = profile(400, 0, 2);
        assert!(!buy_ability(&mut p, &catalog, AbilityKind::Spyglass)); // phase 5
        assert!(buy_ability(&mut p, &catalog, AbilityKind::Shield));
        assert_eq!(p.coins, 100);
        assert!(!buy_ability(&mut p, &catalog, AbilityKind::Shield)); // owned
        assert!(!buy_ability(&mut p, &catalog, AbilityKind::Compass)); // too expensive
        assert_eq!(p.coins, 100);
    }

    #[test]
    fn test_buy_and_select_ship() {
        let catalog = Catalog::default();
        let mut p = profile(1000, 0, 2);
        assert!(!select_ship(&mut p, "sloop"));
        assert!(!buy_ship(&mut p, &catalog, "brigantine")); // phase 3
        assert!(buy_ship(&mut p, &catalog, "sloop"));
        assert_eq!(p.coins, 700);
        assert!(select_ship(&mut p, "sloop"));
        assert_eq!(p.active_ship, "sloop");
        assert!(!buy_ship(&mut p, &catalog, "sloop"));
    }

    #[test]
    fn test_ship_win_gate() {
        let catalog = Catalog::default();
        let mut p = profile(20_000, 10, 5);
        assert!(!buy_ship(&mut p, &catalog, "manowar"));
        p.wins = 50;
        assert!(buy_ship(&mut p, &catalog, "manowar"));
    }
}
