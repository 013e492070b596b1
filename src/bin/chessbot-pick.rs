// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use chessbot::Position;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Prints one pseudo-legal move for the side to move, chosen uniformly at random. Exits with an
/// error if there are no moves.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the position to move in. Defaults to the starting position.
    #[structopt(name = "FEN")]
    fen: Option<String>,

    /// Seed for the random number generator, for reproducible picks.
    #[structopt(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("CHESSBOT_LOG"))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber")?;

    let ops = Options::from_args();
    let pos = match ops.fen {
        Some(ref fen) => Position::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen))?,
        None => Position::from_start_position(),
    };

    let mut rng = match ops.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let moves = pos.all_moves(pos.side_to_move());
    tracing::info!(count = moves.len(), "choosing among pseudo-legal moves");
    let mov = moves
        .choose(&mut rng)
        .with_context(|| format!("no moves available for {}", pos.side_to_move()))?;
    println!("{}", mov);
    Ok(())
}
