//! Match orchestration
//!
//! `Game` owns the profile, the live match, the simulation clock and the
//! single scheduler. Hosts feed it frame deltas and input snapshots, send it
//! requests (start, stop, activate, place, buy) and read back a `Frame`.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::catalog::{Ability, AbilityKind, Catalog, Role};
use crate::consts::*;
use crate::persistence::Storage;
use crate::profile::PlayerProfile;
use crate::progression::{self, Settlement};
use crate::settings::Settings;
use crate::sim::abilities::{self, AbilityContext, TreasureHint};
use crate::sim::board::{self, Board, to_world};
use crate::sim::kinematics::{ControlInput, drift_mines, step_boat};
use crate::sim::scheduler::{Scheduler, TimerEvent, TimerId};
use crate::sim::state::{Match, Outcome};
use crate::sim::collision;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    MainMenu,
    Matchmaking,
    AttackerRun,
    DefenderSetup,
    ResolutionReveal,
    Results,
    Shop,
    DeliverySelect,
    DeliveryRun,
    ArenaLobby,
    ArenaRun,
}

impl Screen {
    /// Modes that exist in the menu but have no gameplay yet
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Screen::Matchmaking
                | Screen::ResolutionReveal
                | Screen::DeliverySelect
                | Screen::DeliveryRun
                | Screen::ArenaLobby
                | Screen::ArenaRun
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoatView {
    pub position: Vec3,
    pub heading: f32,
    pub shielded: bool,
    pub ghosted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MineView {
    pub id: u32,
    pub position: Vec3,
    pub revealed: bool,
    /// Drawn translucent (defender placement preview)
    pub ghost: bool,
    pub decoy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IslandView {
    pub id: u32,
    pub position: Vec3,
    pub has_treasure: bool,
    pub foggy: bool,
}

/// Read-only snapshot for the renderer/HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub screen: Screen,
    pub boat: Option<BoatView>,
    pub mines: Vec<MineView>,
    pub islands: Vec<IslandView>,
    pub active_abilities: Vec<AbilityKind>,
    pub time_remaining: u32,
    pub coins: u32,
    pub phase: u32,
    pub outcome: Option<Outcome>,
    pub hint: Option<TreasureHint>,
}

pub struct Game {
    catalog: Catalog,
    settings: Settings,
    storage: Box<dyn Storage>,
    rng: Pcg32,
    profile: PlayerProfile,
    screen: Screen,
    /// Live run, or the finished one while on the results screen
    run: Option<Match>,
    /// Board being edited in defender setup
    defense: Board,
    saved_defense: Option<Board>,
    scheduler: Scheduler,
    /// Simulation ticks since the game was created
    clock: u64,
    /// Bumped on every run start and end
    generation: u64,
    countdown: Option<TimerId>,
    poll: Option<TimerId>,
    accumulator: f32,
    last_settlement: Option<Settlement>,
}

impl Game {
    /// Storage key for the last saved defender board
    pub const DEFENSE_KEY: &'static str = "treasure_defense";

    pub fn new(catalog: Catalog, settings: Settings, storage: Box<dyn Storage>) -> Self {
        let catalog = match catalog.validate() {
            Ok(()) => catalog,
            Err(e) => {
                log::warn!("Unusable catalog ({}), falling back to built-in tables", e);
                Catalog::default()
            }
        };
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        log::info!("Game initialized with seed: {}", seed);

        let profile = PlayerProfile::load(storage.as_ref(), &mut rng, settings.starting_coins);
        let saved_defense = match storage.get(Self::DEFENSE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json)
                .inspect_err(|e| log::warn!("Discarding malformed defense board: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read defense board: {}", e);
                None
            }
        };

        let mut game = Self {
            catalog,
            settings,
            storage,
            rng,
            profile,
            screen: Screen::MainMenu,
            run: None,
            defense: Board::empty(),
            saved_defense,
            scheduler: Scheduler::new(),
            clock: 0,
            generation: 0,
            countdown: None,
            poll: None,
            accumulator: 0.0,
            last_settlement: None,
        };
        game.persist();
        game
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.run.as_ref()
    }

    /// Mutable access to the live match (scripted scenarios, debugging)
    pub fn current_match_mut(&mut self) -> Option<&mut Match> {
        self.run.as_mut()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.run.as_ref().and_then(|r| r.outcome)
    }

    pub fn last_settlement(&self) -> Option<Settlement> {
        self.last_settlement
    }

    pub fn saved_defense(&self) -> Option<&Board> {
        self.saved_defense.as_ref()
    }

    pub fn defense_board(&self) -> &Board {
        &self.defense
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn countdown_timer(&self) -> Option<TimerId> {
        self.countdown
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    fn persist(&mut self) {
        self.profile.save(self.storage.as_mut());
    }

    // ---- Attack runs ----

    /// Start a run on a freshly generated board for the profile's phase
    pub fn start_attack(&mut self) -> bool {
        if self.screen != Screen::MainMenu {
            return false;
        }
        let phase = self.catalog.phase_or_first(self.profile.phase).clone();
        let board = board::generate(&phase, &mut self.rng);
        self.begin_run(phase.id, board);
        true
    }

    /// Start a run on a prepared board (saved defenses, scripted scenarios).
    /// The board must hold exactly one treasure island.
    pub fn start_attack_with_board(&mut self, board: Board) -> bool {
        if self.screen != Screen::MainMenu {
            return false;
        }
        let treasures = board.islands.iter().filter(|i| i.has_treasure).count();
        if treasures != 1 {
            log::warn!("Refusing board with {} treasure islands", treasures);
            return false;
        }
        let phase_id = self.catalog.phase_or_first(self.profile.phase).id;
        self.begin_run(phase_id, board);
        true
    }

    fn begin_run(&mut self, phase_id: u32, board: Board) {
        self.retire_timers();
        self.generation += 1;

        let speed_mult = self.catalog.ship_or_starter(&self.profile.active_ship).speed_mult;
        let run = Match::new(
            self.generation,
            phase_id,
            board,
            speed_mult,
            self.settings.time_limit_secs,
        );

        self.countdown = Some(self.scheduler.schedule_repeating(
            self.clock,
            crate::secs_to_ticks(1.0),
            self.generation,
            TimerEvent::Countdown,
        ));
        self.poll = Some(self.scheduler.schedule_repeating(
            self.clock,
            self.settings.resolver_poll_ticks(),
            self.generation,
            TimerEvent::ResolverPoll,
        ));

        log::info!(
            "Run {} started on phase {} ({} mines)",
            self.generation,
            phase_id,
            run.board.mines.len()
        );
        self.run = Some(run);
        self.last_settlement = None;
        self.accumulator = 0.0;
        self.screen = Screen::AttackerRun;
    }

    /// Cancel the run's timers. Each handle is taken, so it is cancelled once.
    fn retire_timers(&mut self) {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.poll.take() {
            self.scheduler.cancel(id);
        }
        let dropped = self.scheduler.cancel_generation(self.generation);
        if dropped > 0 {
            log::debug!("Dropped {} pending timers of run {}", dropped, self.generation);
        }
    }

    /// Attack the last saved defense. Records saved without an island row
    /// get one for the profile's phase.
    pub fn attack_saved_defense(&mut self) -> bool {
        if self.screen != Screen::MainMenu {
            return false;
        }
        let Some(mut board) = self.saved_defense.clone() else {
            return false;
        };
        if board.islands.is_empty() {
            board.islands = self.island_row().islands;
        }
        self.start_attack_with_board(board)
    }

    /// Abandon the live run without an outcome
    pub fn stop_attack(&mut self) -> bool {
        if self.screen != Screen::AttackerRun {
            return false;
        }
        self.retire_timers();
        self.generation += 1;
        self.run = None;
        self.screen = Screen::MainMenu;
        log::info!("Run abandoned");
        true
    }

    pub fn activate_ability(&mut self, kind: AbilityKind) -> bool {
        if self.screen != Screen::AttackerRun {
            return false;
        }
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let activated = abilities::activate(
            kind,
            AbilityContext {
                run,
                profile: &mut self.profile,
                catalog: &self.catalog,
                scheduler: &mut self.scheduler,
                now: self.clock,
            },
        );
        if activated {
            self.persist();
        }
        activated
    }

    /// Feed a host frame; runs as many fixed ticks as the time covers.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32, input: &ControlInput) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self, input: &ControlInput) {
        self.clock += 1;

        if self.screen == Screen::AttackerRun {
            if let Some(run) = self.run.as_mut().filter(|r| !r.is_over()) {
                step_boat(&mut run.boat, input, run.speed_mult);
                drift_mines(&mut run.board.mines);
                run.ticks += 1;
            }
        }

        for fired in self.scheduler.poll(self.clock) {
            let Some(run) = self
                .run
                .as_mut()
                .filter(|r| r.generation == fired.generation && !r.is_over())
            else {
                log::debug!("Ignoring stale {:?} from run {}", fired.event, fired.generation);
                continue;
            };
            match fired.event {
                TimerEvent::Countdown => run.countdown_tick(),
                TimerEvent::ResolverPoll => {
                    collision::resolve(run);
                }
                TimerEvent::AbilityExpired { kind, token } => {
                    abilities::expire(run, kind, token);
                }
            }
        }

        if self.screen == Screen::AttackerRun && self.outcome().is_some() {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        let Some((phase_id, outcome)) = self
            .run
            .as_ref()
            .and_then(|r| r.outcome.map(|o| (r.phase_id, o)))
        else {
            return;
        };
        self.retire_timers();
        self.generation += 1;

        let settlement = progression::settle(
            &mut self.profile,
            &self.catalog,
            phase_id,
            outcome,
            self.settings.consolation_reward,
        );
        self.last_settlement = Some(settlement);
        self.persist();
        self.screen = Screen::Results;
    }

    /// Leave the results screen
    pub fn continue_from_results(&mut self) -> bool {
        if self.screen != Screen::Results {
            return false;
        }
        self.run = None;
        self.screen = Screen::MainMenu;
        true
    }

    // ---- Defender setup ----

    pub fn start_defense(&mut self) -> bool {
        if self.screen != Screen::MainMenu {
            return false;
        }
        self.defense = self.island_row();
        self.screen = Screen::DefenderSetup;
        true
    }

    /// Islands for the profile's phase with a random treasure, no mines
    fn island_row(&mut self) -> Board {
        let count = self.catalog.phase_or_first(self.profile.phase).islands;
        let treasure = self.rng.random_range(0..count);
        Board::with_islands(count, treasure)
    }

    fn in_field(pos: Vec2) -> bool {
        pos.x.abs() <= WORLD_SIZE && pos.y >= ISLAND_Z - BOUNDARY_MARGIN && pos.y <= DOCK_Z + BOUNDARY_MARGIN
    }

    /// Place a live mine during setup. Returns the new mine id.
    pub fn place_mine(&mut self, pos: Vec2) -> Option<u32> {
        if self.screen != Screen::DefenderSetup || !Self::in_field(pos) {
            return None;
        }
        Some(self.defense.add_mine(pos, None, false))
    }

    /// Place a decoy mine; needs the decoy ability and its use cost
    pub fn place_decoy(&mut self, pos: Vec2) -> Option<u32> {
        if self.screen != Screen::DefenderSetup || !Self::in_field(pos) {
            return None;
        }
        if !self.profile.has_ability(AbilityKind::Decoy) {
            return None;
        }
        let cost = self.catalog.ability(AbilityKind::Decoy)?.use_cost;
        if !self.profile.try_spend(cost) {
            return None;
        }
        self.persist();
        Some(self.defense.add_mine(pos, None, true))
    }

    pub fn save_defense(&mut self) -> bool {
        if self.screen != Screen::DefenderSetup {
            return false;
        }
        let board = std::mem::take(&mut self.defense);
        match serde_json::to_string(&board) {
            Ok(json) => {
                if let Err(e) = self.storage.set(Self::DEFENSE_KEY, &json) {
                    log::warn!("Could not save defense board: {}", e);
                }
            }
            Err(e) => log::warn!("Could not serialize defense board: {}", e),
        }
        log::info!("Saved defense with {} mines", board.mines.len());
        self.saved_defense = Some(board);
        self.screen = Screen::MainMenu;
        true
    }

    pub fn cancel_defense(&mut self) -> bool {
        if self.screen != Screen::DefenderSetup {
            return false;
        }
        self.defense = Board::empty();
        self.screen = Screen::MainMenu;
        true
    }

    // ---- Shop ----

    pub fn open_shop(&mut self) -> bool {
        if self.screen != Screen::MainMenu {
            return false;
        }
        self.screen = Screen::Shop;
        true
    }

    pub fn close_shop(&mut self) -> bool {
        if self.screen != Screen::Shop {
            return false;
        }
        self.screen = Screen::MainMenu;
        true
    }

    /// Abilities of `role` on sale at the profile's phase that it does not own yet
    pub fn shop_abilities(&self, role: Role) -> Vec<&Ability> {
        self.catalog
            .abilities_for(role)
            .filter(|a| a.phase <= self.profile.phase && !self.profile.has_ability(a.kind))
            .collect()
    }

    pub fn buy_ability(&mut self, kind: AbilityKind) -> bool {
        if self.screen != Screen::Shop {
            return false;
        }
        let bought = progression::buy_ability(&mut self.profile, &self.catalog, kind);
        if bought {
            self.persist();
        }
        bought
    }

    pub fn buy_ship(&mut self, ship_id: &str) -> bool {
        if self.screen != Screen::Shop {
            return false;
        }
        let bought = progression::buy_ship(&mut self.profile, &self.catalog, ship_id);
        if bought {
            self.persist();
        }
        bought
    }

    pub fn select_ship(&mut self, ship_id: &str) -> bool {
        if self.screen != Screen::Shop {
            return false;
        }
        let selected = progression::select_ship(&mut self.profile, ship_id);
        if selected {
            self.persist();
        }
        selected
    }

    // ---- Placeholder modes ----

    /// Enter a mode that has no gameplay yet. It only leads back to the menu.
    pub fn open_placeholder(&mut self, screen: Screen) -> bool {
        if self.screen != Screen::MainMenu || !screen.is_placeholder() {
            return false;
        }
        log::info!("{:?} is not available yet", screen);
        self.screen = screen;
        true
    }

    pub fn leave_placeholder(&mut self) -> bool {
        if !self.screen.is_placeholder() {
            return false;
        }
        self.screen = Screen::MainMenu;
        true
    }

    // ---- Rendering boundary ----

    pub fn frame(&self) -> Frame {
        let mut frame = Frame {
            screen: self.screen,
            boat: None,
            mines: Vec::new(),
            islands: Vec::new(),
            active_abilities: Vec::new(),
            time_remaining: 0,
            coins: self.profile.coins,
            phase: self.profile.phase,
            outcome: None,
            hint: None,
        };

        match self.screen {
            Screen::AttackerRun | Screen::Results => {
                let Some(run) = self.run.as_ref() else {
                    return frame;
                };
                let over = run.is_over();
                frame.boat = Some(BoatView {
                    position: to_world(run.boat.pos),
                    heading: run.boat.heading,
                    shielded: run.abilities.is_active(AbilityKind::Shield),
                    ghosted: run.abilities.is_active(AbilityKind::GhostShip),
                });
                frame.mines = run
                    .board
                    .mines
                    .iter()
                    .map(|m| MineView {
                        id: m.id,
                        position: to_world(m.pos),
                        revealed: over || run.revealed_mines.contains(&m.id),
                        ghost: false,
                        decoy: m.decoy,
                    })
                    .collect();
                frame.islands = run
                    .board
                    .islands
                    .iter()
                    .map(|i| IslandView {
                        id: i.id,
                        position: to_world(i.pos),
                        has_treasure: i.has_treasure,
                        foggy: run.foggy_islands.contains(&i.id),
                    })
                    .collect();
                frame.active_abilities = run.abilities.kinds().collect();
                frame.time_remaining = run.time_remaining;
                frame.outcome = run.outcome;
                frame.hint = abilities::treasure_hint(run);
            }
            Screen::DefenderSetup => {
                frame.mines = self
                    .defense
                    .mines
                    .iter()
                    .map(|m| MineView {
                        id: m.id,
                        position: to_world(m.pos),
                        revealed: true,
                        ghost: true,
                        decoy: m.decoy,
                    })
                    .collect();
                frame.islands = self
                    .defense
                    .islands
                    .iter()
                    .map(|i| IslandView {
                        id: i.id,
                        position: to_world(i.pos),
                        has_treasure: i.has_treasure,
                        foggy: false,
                    })
                    .collect();
            }
            _ => {}
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn game() -> Game {
        let settings = Settings {
            seed: Some(1234),
            ..Default::default()
        };
        Game::new(Catalog::default(), settings, Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_new_game_persists_profile() {
        let g = game();
        assert_eq!(g.screen(), Screen::MainMenu);
        assert!(g.storage().get(PlayerProfile::STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_start_attack_sets_up_run() {
        let mut g = game();
        assert!(g.start_attack());
        assert_eq!(g.screen(), Screen::AttackerRun);
        let run = g.current_match().unwrap();
        assert_eq!(run.time_remaining, 25);
        assert_eq!(run.board.islands.len(), 1);
        assert!(g.countdown_timer().is_some());
        assert_eq!(g.pending_timers(), 2);
        // Only from the main menu
        assert!(!g.start_attack());
    }

    #[test]
    fn test_countdown_ticks_each_second() {
        let mut g = game();
        g.start_attack_with_board(Board::with_islands(1, 0));
        for _ in 0..60 {
            g.step(&ControlInput::default());
        }
        assert_eq!(g.current_match().unwrap().time_remaining, 24);
    }

    #[test]
    fn test_stop_attack_cancels_timers() {
        let mut g = game();
        g.start_attack();
        assert!(g.stop_attack());
        assert_eq!(g.screen(), Screen::MainMenu);
        assert!(g.countdown_timer().is_none());
        assert_eq!(g.pending_timers(), 0);
        assert!(g.current_match().is_none());
    }

    #[test]
    fn test_rejects_board_without_single_treasure() {
        let mut g = game();
        let mut board = Board::with_islands(2, 0);
        board.islands[1].has_treasure = true;
        assert!(!g.start_attack_with_board(board));
        assert!(!g.start_attack_with_board(Board::empty()));
        assert_eq!(g.screen(), Screen::MainMenu);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut g = game();
        g.start_attack();
        assert_eq!(g.advance(1.0 / 60.0 + 1e-4, &ControlInput::default()), 1);
        assert_eq!(g.advance(5.0, &ControlInput::default()), MAX_SUBSTEPS.min(6));
    }

    #[test]
    fn test_defender_setup_flow() {
        let mut g = game();
        assert!(g.start_defense());
        assert_eq!(g.place_mine(Vec2::new(0.0, 0.0)), Some(1));
        assert_eq!(g.place_mine(Vec2::new(500.0, 0.0)), None);
        // Decoys need the ability
        assert_eq!(g.place_decoy(Vec2::new(10.0, 0.0)), None);
        let frame = g.frame();
        assert_eq!(frame.mines.len(), 1);
        assert!(frame.mines[0].ghost);

        assert!(g.save_defense());
        assert_eq!(g.screen(), Screen::MainMenu);
        assert_eq!(g.saved_defense().unwrap().mines.len(), 1);
        assert!(g.storage().get(Game::DEFENSE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_saved_defense_can_be_attacked() {
        let mut g = game();
        g.start_defense();
        assert_eq!(g.defense_board().islands.len(), 1);
        assert!(g.defense_board().treasure_island().is_some());
        g.place_mine(Vec2::new(0.0, 0.0));
        assert_eq!(g.frame().islands.len(), 1);
        g.save_defense();

        assert!(g.attack_saved_defense());
        assert_eq!(g.screen(), Screen::AttackerRun);
        let run = g.current_match().unwrap();
        assert_eq!(run.board.mines.len(), 1);
        assert_eq!(run.board.islands.iter().filter(|i| i.has_treasure).count(), 1);
    }

    #[test]
    fn test_islandless_saved_defense_gets_island_row() {
        let mut g = game();
        assert!(!g.attack_saved_defense());
        let mut board = Board::empty();
        board.add_mine(Vec2::new(5.0, 0.0), None, false);
        g.saved_defense = Some(board);

        assert!(g.attack_saved_defense());
        let run = g.current_match().unwrap();
        assert_eq!(run.board.islands.len(), 1);
        assert!(run.board.treasure_island().is_some());
    }

    #[test]
    fn test_empty_catalog_falls_back_to_builtin() {
        let catalog = Catalog {
            phases: Vec::new(),
            ships: Vec::new(),
            abilities: Vec::new(),
        };
        let mut g = Game::new(catalog, Settings::default(), Box::new(MemoryStorage::new()));
        assert_eq!(g.catalog().phases.len(), 8);
        assert!(g.start_attack());
    }

    #[test]
    fn test_cancel_defense_discards() {
        let mut g = game();
        g.start_defense();
        g.place_mine(Vec2::ZERO);
        assert!(g.cancel_defense());
        assert!(g.saved_defense().is_none());
    }

    #[test]
    fn test_decoy_placement_costs_coins() {
        let mut g = game();
        g.open_shop();
        // Decoy is a phase 3 item
        assert!(!g.buy_ability(AbilityKind::Decoy));
        g.close_shop();
        g.profile.phase = 3;
        g.open_shop();
        assert!(g.buy_ability(AbilityKind::Decoy));
        g.close_shop();
        let coins = g.profile().coins;
        g.start_defense();
        assert!(g.place_decoy(Vec2::new(0.0, 0.0)).is_some());
        assert_eq!(g.profile().coins, coins - 15);
        assert!(g.defense_board().mines[0].decoy);
    }

    #[test]
    fn test_shop_only_from_shop_screen() {
        let mut g = game();
        g.profile.phase = 2;
        assert!(!g.buy_ability(AbilityKind::Volcano));
        assert!(g.open_shop());
        assert!(g.buy_ability(AbilityKind::Volcano));
        assert!(g.close_shop());
        assert_eq!(g.screen(), Screen::MainMenu);
    }

    #[test]
    fn test_shop_lists_unowned_abilities_for_phase() {
        let mut g = game();
        assert!(g.shop_abilities(Role::Attacker).is_empty());
        g.profile.phase = 2;
        let kinds: Vec<_> = g.shop_abilities(Role::Attacker).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AbilityKind::Compass, AbilityKind::Shield, AbilityKind::Volcano]);
        assert!(g.shop_abilities(Role::Defender).is_empty());

        g.open_shop();
        g.buy_ability(AbilityKind::Volcano);
        assert_eq!(g.shop_abilities(Role::Attacker).len(), 2);
    }

    #[test]
    fn test_placeholders_are_inert() {
        let mut g = game();
        assert!(!g.open_placeholder(Screen::Shop));
        assert!(g.open_placeholder(Screen::DeliverySelect));
        assert!(!g.start_attack());
        g.step(&ControlInput::default());
        assert_eq!(g.screen(), Screen::DeliverySelect);
        assert!(g.leave_placeholder());
        assert_eq!(g.screen(), Screen::MainMenu);
    }
}
