//! Static content tables: phases, ships and abilities
//!
//! The built-in tables are used unless the host supplies its own JSON.

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// Which side of a match an ability serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Attacker,
    Defender,
}

/// Every ability the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Compass,
    Shield,
    Volcano,
    SonarPing,
    SonarSweep,
    Anchor,
    Spyglass,
    GhostShip,
    FogRevealer,
    Decoy,
    Whirlpool,
    Kraken,
}

/// What an ability does when activated during a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    /// Reveal mines within `radius` of the boat (additive)
    Sonar { radius: f32, duration_secs: f32 },
    /// Reveal every mine; reveals are cleared on expiry
    RevealAll { duration_secs: f32 },
    /// Absorb the first mine hit
    Shield { duration_secs: f32 },
    /// Pass through mines without triggering them
    Ghost { duration_secs: f32 },
    /// Mark one wrong island as foggy (instant)
    MarkWrongIsland,
    /// Point toward the treasure side
    Hint { duration_secs: f32 },
    /// Kill the boat's velocity (instant)
    Anchor,
    /// Not usable during an attack run
    Inert,
}

impl AbilityEffect {
    /// Timed effects return their lifetime; instant/inert effects return None
    pub fn duration_secs(&self) -> Option<f32> {
        match *self {
            AbilityEffect::Sonar { duration_secs, .. }
            | AbilityEffect::RevealAll { duration_secs }
            | AbilityEffect::Shield { duration_secs }
            | AbilityEffect::Ghost { duration_secs }
            | AbilityEffect::Hint { duration_secs } => Some(duration_secs),
            AbilityEffect::MarkWrongIsland | AbilityEffect::Anchor | AbilityEffect::Inert => None,
        }
    }
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 12] = [
        AbilityKind::Compass,
        AbilityKind::Shield,
        AbilityKind::Volcano,
        AbilityKind::SonarPing,
        AbilityKind::SonarSweep,
        AbilityKind::Anchor,
        AbilityKind::Spyglass,
        AbilityKind::GhostShip,
        AbilityKind::FogRevealer,
        AbilityKind::Decoy,
        AbilityKind::Whirlpool,
        AbilityKind::Kraken,
    ];

    /// Stable identifier (matches the persisted profile)
    pub fn id(&self) -> &'static str {
        match self {
            AbilityKind::Compass => "compass",
            AbilityKind::Shield => "shield",
            AbilityKind::Volcano => "volcano",
            AbilityKind::SonarPing => "sonar_ping",
            AbilityKind::SonarSweep => "sonar_sweep",
            AbilityKind::Anchor => "anchor",
            AbilityKind::Spyglass => "spyglass",
            AbilityKind::GhostShip => "ghost_ship",
            AbilityKind::FogRevealer => "fog_revealer",
            AbilityKind::Decoy => "decoy",
            AbilityKind::Whirlpool => "whirlpool",
            AbilityKind::Kraken => "kraken",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == s)
    }

    /// Effect handler table
    pub fn effect(&self) -> AbilityEffect {
        match self {
            AbilityKind::SonarPing => AbilityEffect::Sonar {
                radius: 25.0,
                duration_secs: 3.0,
            },
            AbilityKind::SonarSweep => AbilityEffect::Sonar {
                radius: 45.0,
                duration_secs: 3.0,
            },
            AbilityKind::Spyglass => AbilityEffect::RevealAll { duration_secs: 3.0 },
            AbilityKind::Shield => AbilityEffect::Shield {
                duration_secs: 10.0,
            },
            AbilityKind::GhostShip => AbilityEffect::Ghost { duration_secs: 3.0 },
            AbilityKind::Volcano => AbilityEffect::MarkWrongIsland,
            AbilityKind::Compass => AbilityEffect::Hint { duration_secs: 2.0 },
            AbilityKind::Anchor => AbilityEffect::Anchor,
            // No fog-of-war layer on the board, so nothing to clear
            AbilityKind::FogRevealer
            | AbilityKind::Decoy
            | AbilityKind::Whirlpool
            | AbilityKind::Kraken => AbilityEffect::Inert,
        }
    }
}

/// A difficulty tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: u32,
    pub name: String,
    /// Number of island slots in use
    pub islands: usize,
    pub min_mines: u32,
    pub max_mines: u32,
    pub win_reward: u32,
    /// Coins that unlock this phase
    pub unlock_cost: u32,
    /// Wins that unlock this phase
    pub unlock_wins: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A purchasable boat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub unlock_phase: u32,
    pub unlock_wins: u32,
    pub speed_mult: f32,
    /// Flavour perk shown in the shop
    #[serde(default)]
    pub perk: Option<String>,
}

/// A purchasable ability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    pub name: String,
    pub role: Role,
    /// Phase at which the ability appears in the shop
    pub phase: u32,
    pub buy_cost: u32,
    pub use_cost: u32,
    #[serde(default)]
    pub description: String,
}

/// All static tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub phases: Vec<Phase>,
    pub ships: Vec<Ship>,
    pub abilities: Vec<Ability>,
}

impl Catalog {
    /// Parse a catalog from JSON, rejecting tables the game cannot run on
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the tables hold at least one phase and ship and are well formed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.is_empty() {
            return Err(ConfigError::Invalid("catalog has no phases".into()));
        }
        for (i, phase) in self.phases.iter().enumerate() {
            if phase.id != i as u32 + 1 {
                return Err(ConfigError::Invalid(format!(
                    "phase ids must be consecutive from 1, found {} at position {}",
                    phase.id, i
                )));
            }
            if phase.islands == 0 || phase.islands > crate::consts::ISLAND_SLOTS_X.len() {
                return Err(ConfigError::Invalid(format!(
                    "phase {} has {} islands",
                    phase.id, phase.islands
                )));
            }
            if phase.min_mines > phase.max_mines {
                return Err(ConfigError::Invalid(format!(
                    "phase {} mine range {}..={} is empty",
                    phase.id, phase.min_mines, phase.max_mines
                )));
            }
        }
        if self.ships.is_empty() {
            return Err(ConfigError::Invalid("catalog has no ships".into()));
        }
        Ok(())
    }

    pub fn phase(&self, id: u32) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Phase the player is on, falling back to the first one
    pub fn phase_or_first(&self, id: u32) -> &Phase {
        self.phase(id).unwrap_or(&self.phases[0])
    }

    pub fn ship(&self, id: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Ship by id, falling back to the starter boat
    pub fn ship_or_starter(&self, id: &str) -> &Ship {
        self.ship(id).unwrap_or(&self.ships[0])
    }

    pub fn ability(&self, kind: AbilityKind) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.kind == kind)
    }

    pub fn abilities_for(&self, role: Role) -> impl Iterator<Item = &Ability> {
        self.abilities.iter().filter(move |a| a.role == role)
    }
}

#[allow(clippy::too_many_arguments)]
fn phase(
    id: u32,
    name: &str,
    islands: usize,
    mines: (u32, u32),
    win_reward: u32,
    unlock_cost: u32,
    unlock_wins: u32,
    features: &[&str],
) -> Phase {
    Phase {
        id,
        name: name.to_string(),
        islands,
        min_mines: mines.0,
        max_mines: mines.1,
        win_reward,
        unlock_cost,
        unlock_wins,
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

fn ship(id: &str, name: &str, cost: u32, unlock: (u32, u32), speed_mult: f32, perk: &str) -> Ship {
    Ship {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        unlock_phase: unlock.0,
        unlock_wins: unlock.1,
        speed_mult,
        perk: (!perk.is_empty()).then(|| perk.to_string()),
    }
}

fn ability(
    kind: AbilityKind,
    name: &str,
    role: Role,
    phase: u32,
    costs: (u32, u32),
    description: &str,
) -> Ability {
    Ability {
        kind,
        name: name.to_string(),
        role,
        phase,
        buy_cost: costs.0,
        use_cost: costs.1,
        description: description.to_string(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        use AbilityKind::*;
        use Role::*;

        Self {
            phases: vec![
                phase(1, "The Lone Island", 1, (2, 3), 50, 0, 0, &["Tutorial", "Single Island"]),
                phase(2, "The Fork", 2, (3, 4), 75, 500, 5, &["Compass Hint", "Shield", "Volcano Warning"]),
                phase(3, "The Trident", 3, (4, 5), 100, 1500, 15, &["Sonar", "Decoy Mines", "Collectibles"]),
                phase(4, "Treacherous Waters", 3, (5, 6), 125, 3000, 30, &["Ocean Currents", "Anchor Drop", "Whirlpool"]),
                phase(5, "Master Pirate", 3, (6, 7), 150, 5000, 50, &["Fog of War", "Spyglass", "Ghost Ship"]),
                phase(6, "Shifting Tides", 3, (5, 7), 175, 8000, 70, &["Moving Mines"]),
                phase(7, "Bermuda Triangle", 3, (6, 8), 200, 12000, 90, &["Teleport Zones"]),
                phase(8, "Davy Jones' Locker", 3, (6, 8), 250, 18000, 120, &["Shrinking Boundaries"]),
            ],
            ships: vec![
                ship("dinghy", "Dinghy", 0, (1, 0), 1.0, ""),
                ship("sloop", "Sloop", 300, (2, 0), 1.1, "Quick Turn"),
                ship("brigantine", "Brigantine", 800, (3, 0), 1.15, "Reinforced Hull"),
                ship("frigate", "Frigate", 2000, (4, 0), 1.05, "Broadside"),
                ship("galleon", "Galleon", 5000, (5, 0), 0.95, "Treasure Magnet"),
                ship("manowar", "Man-o'-War", 10000, (5, 50), 1.0, "War Drums"),
            ],
            abilities: vec![
                ability(Compass, "Compass Hint", Attacker, 2, (500, 50), "Shows correct island side for 2s"),
                ability(Shield, "Defense Shield", Attacker, 2, (300, 40), "Survive one mine hit"),
                ability(Volcano, "Volcano Warning", Attacker, 2, (75, 10), "Marks one wrong island"),
                ability(SonarPing, "Sonar Ping", Attacker, 3, (150, 20), "Reveals mines nearby"),
                ability(SonarSweep, "Sonar Sweep", Attacker, 3, (250, 35), "Pulsing mine reveal"),
                ability(Anchor, "Anchor Drop", Attacker, 4, (200, 25), "Stop all movement"),
                ability(Spyglass, "Spyglass", Attacker, 5, (250, 35), "Reveal map for 3s"),
                ability(GhostShip, "Ghost Ship", Attacker, 5, (300, 40), "Invulnerability for 3s"),
                ability(FogRevealer, "Fog Revealer", Attacker, 5, (200, 30), "Clears fog nearby"),
                ability(Decoy, "Decoy Mine", Defender, 3, (100, 15), "Fake mine"),
                ability(Whirlpool, "Whirlpool", Defender, 4, (200, 25), "Pulling hazard"),
                ability(Kraken, "Kraken Reach", Defender, 5, (250, 35), "Wrong choice penalty x2"),
            ],
        }
    }
}
