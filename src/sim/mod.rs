//! Attack-run simulation
//!
//! Board layout, boat handling, abilities, collision resolution and timers.
//! Everything here advances on the fixed tick and draws randomness only from
//! a caller-supplied seeded RNG; mines and islands are always walked in id
//! order. Nothing in this module knows about screens, storage or rendering.

pub mod abilities;
pub mod autopilot;
pub mod board;
pub mod collision;
pub mod kinematics;
pub mod scheduler;
pub mod state;

pub use abilities::{AbilityContext, TreasureHint};
pub use board::{Board, Island, Mine, generate};
pub use collision::{ResolveReport, resolve};
pub use kinematics::{ControlInput, drift_mines, speed_cap, step_boat};
pub use scheduler::{Fired, Scheduler, TimerEvent, TimerId};
pub use state::{ActiveAbilities, Boat, Match, Outcome};
