//! Class Builder entry point
//!
//! On the web the library is loaded directly (see `web`). Natively this runs a
//! headless session on the built-in catalog with a scripted player that
//! misses a few answers, logging every transition.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use class_builder::Game;
    use class_builder::consts::SIM_DT;
    use class_builder::sim::{Card, GamePhase};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Class Builder (native) starting...");

    let mut game = Game::new(1200.0, 700.0);
    let mut answered = 0;

    while game.state().phase() != GamePhase::Complete {
        // Let the entrance animation finish so clicks land where cards are drawn
        for _ in 0..30 {
            game.frame(SIM_DT);
        }

        let state = game.state();
        let class = &state.classes()[state.round()];
        let c = class.position() + class.size() / 2.0;
        game.click(c.x, c.y);

        // Miss once on every other round to exercise partial credit
        let state = game.state();
        let Some(correct) = state.correct_interface() else {
            break;
        };
        let mut picks: Vec<usize> = Vec::new();
        if answered % 2 == 1 {
            picks.extend(state.active_triple().filter(|&i| i != correct).take(1));
        }
        picks.push(correct);

        for id in picks {
            let card = &game.state().interfaces()[id];
            let c = card.position() + card.size() / 2.0;
            game.click(c.x, c.y);
            println!("{}", game.state().feedback().text);
        }
        answered += 1;

        for event in game.drain_events() {
            log::debug!("{event:?}");
        }
    }

    println!("Final score: {}", game.state().score());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
