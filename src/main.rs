//! Treasure Run entry point
//!
//! Native builds run headless autopilot attacks against the simulation core
//! and print each result. Usage: `treasure-run [settings.json] [runs]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use treasure_run::persistence::FileStorage;
    use treasure_run::sim::autopilot::seek_treasure;
    use treasure_run::{Catalog, Game, Screen, Settings};

    env_logger::init();
    log::info!("Treasure Run (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let runs: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    let mut game = Game::new(Catalog::default(), settings, Box::new(FileStorage::new("save")));
    log::info!(
        "Captain {} on phase {} with {} coins",
        game.profile().name,
        game.profile().phase,
        game.profile().coins
    );

    // Generous cap: the timer alone ends a run well before this
    let max_ticks = (game.settings().time_limit_secs as u64 + 5) * treasure_run::consts::TICK_RATE as u64;

    for run in 1..=runs {
        if !game.start_attack() {
            log::error!("Could not start run {}", run);
            break;
        }
        let mut ticks = 0;
        while game.screen() == Screen::AttackerRun && ticks < max_ticks {
            let input = match game.current_match() {
                Some(m) => seek_treasure(m),
                None => break,
            };
            game.step(&input);
            ticks += 1;
        }

        match (game.outcome(), game.last_settlement()) {
            (Some(outcome), Some(settlement)) => {
                println!(
                    "Run {}: {:?} after {} ticks, +{} coins (total {}){}",
                    run,
                    outcome,
                    ticks,
                    settlement.reward,
                    game.profile().coins,
                    settlement
                        .unlocked_phase
                        .map(|p| format!(", unlocked phase {}", p))
                        .unwrap_or_default()
                );
            }
            _ => {
                println!("Run {}: no outcome after {} ticks", run, ticks);
                game.stop_attack();
            }
        }
        game.continue_from_results();
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Game` directly through the library
}
