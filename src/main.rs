//! Flea Buster headless driver
//!
//! Stands in for a windowed front end: runs a short scripted round at the
//! front end's refresh rate and logs what happens.
//!
//! Usage: `flea-buster [settings.json]` (log level via `RUST_LOG`)

use std::path::Path;
use std::thread;
use std::time::Duration;

use flea_buster::consts::TICK_MS;
use flea_buster::{FileScoreStore, Game, Settings};

/// Length of the scripted round, in ticks (10 seconds at 50 Hz)
const DEMO_TICKS: u32 = 500;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flea Buster (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(Path::new(&path)),
        None => Settings::default(),
    };

    let store = FileScoreStore::new(&settings.high_score_path);
    let mut game = Game::new(&settings, Box::new(store));

    for _ in 0..4 {
        game.spawn_normal();
    }
    game.spawn_mutant();

    let (width, height) = (settings.field_width, settings.field_height);
    for tick in 0..DEMO_TICKS {
        if !game.is_active() {
            break;
        }

        // Sweep the pointer across the field in a slow figure-eight
        let t = tick as f32 * 0.02;
        let x = (width as f32 * (0.5 + 0.4 * t.sin())) as i32;
        let y = (height as f32 * (0.5 + 0.4 * (2.0 * t).sin())) as i32;
        game.on_pointer_move(x, y);
        game.on_tick();

        // Shoot at whatever flea is nearest the pointer every half second
        if tick % 25 == 0 {
            if let Some(target) = nearest_center(&game, x, y) {
                let kills = game.fire_at(target.0, target.1);
                log::debug!("Shot at {:?}: {} kill(s)", target, kills);
            }
        }
        if tick % 150 == 149 {
            let kills = game.fire_area();
            log::info!("Missile away: {} kill(s), score {}", kills, game.score());
        }
        if tick % 200 == 100 {
            game.jump_all();
        }

        thread::sleep(Duration::from_millis(TICK_MS));
    }

    if game.is_active() {
        game.stop();
    }

    match game.last_round() {
        Some(round) if round.new_record => {
            log::info!("Final score {} - new high score!", round.score)
        }
        Some(round) => log::info!("Final score {} (high score {})", round.score, round.high_score),
        None => log::info!("No round played"),
    }
}

fn nearest_center(game: &Game, x: i32, y: i32) -> Option<(i32, i32)> {
    game.snapshot()
        .iter()
        .map(|f| {
            let c = f.rect().center();
            (c.x as i32, c.y as i32)
        })
        .min_by_key(|&(cx, cy)| (cx - x).pow(2) + (cy - y).pow(2))
}
