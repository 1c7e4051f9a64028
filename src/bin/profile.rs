//! Profiling binary for the decision kernel
//!
//! Runs `find_best_move` in a tight loop against a fixed mid-game board for
//! profiling with cargo-flamegraph or cargo-heaptrack. Unlike the Criterion
//! benchmarks, this has minimal overhead and produces cleaner profiles.
//!
//! Usage:
//!   cargo flamegraph --bin duel-kernel-profile -- [iterations]
//!   cargo run --release --bin duel-kernel-profile -- 500 --max-depth 8

use anyhow::Context;
use clap::Parser;
use duel_kernel::core::{Card, CardType, EntityStore, Keyword, Player};
use duel_kernel::game::{Phase, State};
use duel_kernel::sim::RulesEngine;
use duel_kernel::{find_best_move, KernelConfig, KernelLogger};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
#[command(name = "duel-kernel-profile")]
#[command(about = "Run find_best_move repeatedly for profiling", long_about = None)]
struct Args {
    /// Number of searches to run.
    #[arg(default_value_t = 200)]
    iterations: usize,

    #[arg(long, default_value_t = 6)]
    max_depth: u32,

    #[arg(long, default_value_t = 2000)]
    max_time_ms: u64,

    /// Seed for shuffling the sample decks, so a profiling run is reproducible.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// A mid-game board: both sides have a field of creatures and a handful of
/// cards left in hand/deck, giving the search a non-trivial branching factor
/// without being an immediate win or loss for either side.
fn sample_state(rng: &mut ChaCha8Rng) -> State {
    let mut players: EntityStore<Player> = EntityStore::new();
    let p0 = players.next_id();
    let p1 = players.next_id();
    let mut state = State::new_two_player(Player::new(p0, "Us"), Player::new(p1, "Them"));
    state.phase = Phase::Main;
    state.turn = 4;
    state.players[0].hp = 7;
    state.players[1].hp = 8;

    let bear_id = state.next_card_id();
    let mut bear = Card::new(bear_id, "bear", CardType::Creature, 4, 4);
    bear.summoned_turn = 1;
    state.cards.insert(bear_id, bear);
    state.players[0].field[0] = Some(bear_id);

    let viper_id = state.next_card_id();
    let mut viper = Card::new(viper_id, "viper", CardType::Predator, 2, 2).with_keyword(Keyword::Toxic);
    viper.summoned_turn = 2;
    state.cards.insert(viper_id, viper);
    state.players[0].field[1] = Some(viper_id);

    let ogre_id = state.next_card_id();
    let mut ogre = Card::new(ogre_id, "ogre", CardType::Creature, 5, 5);
    ogre.summoned_turn = 1;
    state.cards.insert(ogre_id, ogre);
    state.players[1].field[0] = Some(ogre_id);

    let decoy_id = state.next_card_id();
    let mut decoy = Card::new(decoy_id, "decoy", CardType::Creature, 1, 6).with_keyword(Keyword::Lure);
    decoy.summoned_turn = 2;
    state.cards.insert(decoy_id, decoy);
    state.players[1].field[1] = Some(decoy_id);

    for _ in 0..3 {
        let id = state.next_card_id();
        let card = Card::new(id, "spare", CardType::Creature, 2, 2);
        state.cards.insert(id, card);
        state.players[0].deck.add(id);
        let id2 = state.next_card_id();
        let card2 = Card::new(id2, "spare", CardType::Creature, 2, 2);
        state.cards.insert(id2, card2);
        state.players[1].deck.add(id2);
    }

    state.players[0].deck.shuffle(rng);
    state.players[1].deck.shuffle(rng);

    state
}

fn main() -> anyhow::Result<()> {
    let args = Args::try_parse().context("parsing profiling binary arguments")?;
    let engine = RulesEngine::new();
    let config = KernelConfig {
        max_depth: args.max_depth,
        max_time_ms: args.max_time_ms,
        ..Default::default()
    };
    let logger = KernelLogger::new();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let state = sample_state(&mut rng);

    println!(
        "Profiling find_best_move: {} iterations, max_depth={}, max_time_ms={}, seed={}",
        args.iterations, config.max_depth, config.max_time_ms, args.seed
    );

    let start = std::time::Instant::now();
    let mut total_nodes = 0u64;
    for _ in 0..args.iterations {
        let result = find_best_move(&engine, &state, 0, &config, &logger);
        total_nodes += result.stats.nodes_visited;
    }
    let elapsed = start.elapsed();

    println!(
        "Ran {} searches in {:.2?} ({:.1} searches/sec, {} total nodes)",
        args.iterations,
        elapsed,
        args.iterations as f64 / elapsed.as_secs_f64(),
        total_nodes
    );

    Ok(())
}
