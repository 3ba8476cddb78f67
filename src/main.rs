//! Quad Tap entry point
//!
//! Headless demo runner: seeds an engine, steps it at the fixed timestep,
//! and lets a reactive auto-player tap highlights until the session ends.
//!
//! Usage: quad-tap [seed] [seconds] [tuning.json]

use std::time::{SystemTime, UNIX_EPOCH};

use quad_tap::consts::{MAX_SUBSTEPS, SIM_DT};
use quad_tap::sim::{CellId, GameEngine, GameObserver, Highlight};
use quad_tap::Tuning;

/// How long the auto-player stares at a highlight before tapping it
const REACTION_DELAY: f32 = 0.45;

/// Observer that tracks live highlights for the auto-player and tallies
/// the session.
#[derive(Debug, Default)]
struct DemoPlayer {
    /// Highlighted cells and how long they have been lit
    pending: Vec<(CellId, f32)>,
    highlights: u64,
    splits: u64,
    merges: u64,
    game_over: Option<CellId>,
}

impl GameObserver for DemoPlayer {
    fn on_highlight(&mut self, cell: CellId, kind: Highlight) {
        log::info!("highlight {cell} ({kind:?})");
        self.pending.push((cell, 0.0));
        self.highlights += 1;
    }

    fn on_dehighlight(&mut self, cell: CellId) {
        self.pending.retain(|(id, _)| *id != cell);
    }

    fn on_split(&mut self, cell: CellId, _children: [CellId; 4]) {
        log::info!("split {cell}");
        self.splits += 1;
    }

    fn on_will_merge(&mut self, cell: CellId, is_merge_root: bool) {
        if is_merge_root {
            log::info!("merge {cell}");
            self.merges += 1;
        }
    }

    fn on_game_over(&mut self, cell: CellId) {
        log::info!("game over at {cell}");
        self.game_over = Some(cell);
    }
}

impl DemoPlayer {
    /// Age pending highlights and return the ones ripe for a tap.
    fn ripe_taps(&mut self, dt: f32) -> Vec<CellId> {
        let mut ripe = Vec::new();
        self.pending.retain_mut(|(id, age)| {
            *age += dt;
            if *age >= REACTION_DELAY {
                ripe.push(*id);
                false
            } else {
                true
            }
        });
        ripe
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1)
        });
    let seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60.0);
    let tuning = match args.get(3) {
        Some(path) => match Tuning::from_path(std::path::Path::new(path)) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Quad Tap demo starting (seed {seed}, {seconds}s)");

    let mut engine = GameEngine::with_tuning(seed, tuning);
    engine.set_paused(false);

    let mut player = DemoPlayer::default();
    let mut accumulator = 0.0f32;
    let mut elapsed = 0.0f32;

    while elapsed < seconds && player.game_over.is_none() {
        // Fixed-timestep stepping, demo frames arrive at the nominal rate
        accumulator += SIM_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            engine.tick(SIM_DT, &mut player);
            for cell in player.ripe_taps(SIM_DT) {
                engine.cell_tapped(cell, &mut player);
            }
            accumulator -= SIM_DT;
            substeps += 1;
            elapsed += SIM_DT;
        }
    }

    let outcome = if player.game_over.is_some() {
        "game over"
    } else {
        "survived"
    };
    println!(
        "{outcome} after {elapsed:.1}s: {} highlights, {} splits, {} merges, {} cells left",
        player.highlights,
        player.splits,
        player.merges,
        engine.tree().len()
    );
}
