// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `chessbot` is a chess position model and pseudo-legal move generator.
//!
//! A [`Position`] is read from FEN (or built as the standard starting position) and asked for the
//! moves available to either color. Generated moves obey how each piece moves and which squares
//! are occupied, but nothing checks whether a move leaves the mover's own king in check; castling
//! and en-passant are not generated at all. Moves are written in long algebraic coordinate
//! notation (`e2e4`, `a7a8q`).

pub mod core;
pub mod movegen;
pub mod position;

pub use position::Position;
