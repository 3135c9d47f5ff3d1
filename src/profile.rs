//! Persistent player profile
//!
//! One record per installation, stored as JSON under a single key.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::AbilityKind;
use crate::persistence::Storage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    /// Highest unlocked phase (1-based)
    pub phase: u32,
    pub coins: u32,
    pub wins: u32,
    #[serde(deserialize_with = "known_abilities")]
    pub unlocked_abilities: BTreeSet<AbilityKind>,
    pub owned_ships: BTreeSet<String>,
    pub active_ship: String,
    #[serde(default)]
    pub total_deliveries: u32,
    #[serde(default)]
    pub pirate_rank: u32,
}

pub const STARTER_SHIP: &str = "dinghy";

/// Read ability ids, dropping any this build does not know
fn known_abilities<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<AbilityKind>, D::Error> {
    let ids = Vec::<String>::deserialize(d)?;
    Ok(ids
        .iter()
        .filter_map(|id| {
            let kind = AbilityKind::from_id(id);
            if kind.is_none() {
                log::warn!("Ignoring unknown ability {:?} in stored profile", id);
            }
            kind
        })
        .collect())
}

impl PlayerProfile {
    /// Storage key for the profile record
    pub const STORAGE_KEY: &'static str = "treasure_player";

    /// Fresh profile with a random `p-xxxxx` id
    pub fn new_random<R: Rng>(rng: &mut R, starting_coins: u32) -> Self {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let suffix: String = (0..5)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();

        Self {
            id: format!("p-{suffix}"),
            name: "Pirate".to_string(),
            phase: 1,
            coins: starting_coins,
            wins: 0,
            unlocked_abilities: BTreeSet::new(),
            owned_ships: BTreeSet::from([STARTER_SHIP.to_string()]),
            active_ship: STARTER_SHIP.to_string(),
            total_deliveries: 0,
            pirate_rank: 0,
        }
    }

    /// Debit coins if the balance covers `amount`
    pub fn try_spend(&mut self, amount: u32) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }

    pub fn has_ability(&self, kind: AbilityKind) -> bool {
        self.unlocked_abilities.contains(&kind)
    }

    /// Load the stored profile, or create a fresh one if absent or malformed
    pub fn load<R: Rng>(storage: &dyn Storage, rng: &mut R, starting_coins: u32) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<PlayerProfile>(&json) {
                Ok(profile) => {
                    log::info!(
                        "Loaded profile {} (phase {}, {} coins)",
                        profile.id,
                        profile.phase,
                        profile.coins
                    );
                    return profile;
                }
                Err(e) => log::warn!("Stored profile is malformed, starting fresh: {}", e),
            },
            Ok(None) => log::info!("No stored profile, starting fresh"),
            Err(e) => log::warn!("Could not read profile, starting fresh: {}", e),
        }
        Self::new_random(rng, starting_coins)
    }

    /// Write the profile; failures are logged and otherwise ignored
    pub fn save(&self, storage: &mut dyn Storage) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize profile: {}", e);
                return;
            }
        };
        match storage.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::debug!("Profile saved ({} coins)", self.coins),
            Err(e) => log::warn!("Could not save profile: {}", e),
        }
    }
}
