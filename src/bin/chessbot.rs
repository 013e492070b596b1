// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use chessbot::{core::Color, Position};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

fn parse_color(s: &str) -> anyhow::Result<Color> {
    match s {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("unknown color: {}", s),
    }
}

/// Prints a position and every pseudo-legal move available in it.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the position to analyze. Defaults to the starting position.
    #[structopt(name = "FEN")]
    fen: Option<String>,

    /// Color to generate moves for ("white" or "black"). Defaults to the side to move.
    #[structopt(short, long, parse(try_from_str = parse_color))]
    color: Option<Color>,

    /// Print the move list as a JSON array.
    #[structopt(long)]
    json: bool,

    /// Don't print the board diagram.
    #[structopt(long)]
    no_board: bool,
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

    let color = ops.color.unwrap_or_else(|| pos.side_to_move());
    let moves = pos.all_moves(color);
    if ops.json {
        println!("{}", serde_json::to_string(&moves)?);
        return Ok(());
    }

    if !ops.no_board {
        println!("{}", pos);
    }

    for mov in moves {
        println!("{}", mov);
    }

    Ok(())
}
