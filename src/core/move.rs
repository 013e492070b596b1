// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::*;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("move must be four or five characters long: {0:?}")]
    InvalidLength(String),
    #[error(transparent)]
    InvalidSquare(#[from] SquareParseError),
    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(char),
}

/// A pseudo-legal move, as produced by the move generator.
///
/// A move only records where a piece moves from, where it moves to, and what a pawn promotes to.
/// It carries no information about captures or the piece being moved; that is recoverable from
/// the position the move was generated for.
///
/// ## Encoding
/// Moves are written in long algebraic coordinate notation, the same notation UCI uses: the
/// source square, the destination square, and a promotion letter if the move is a promotion.
/// `e2e4`, `g8f6` and `a7a8q` are all moves in this notation.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    destination: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Constructs a new move from the source square to the destination square. Captures and
    /// non-captures are built the same way.
    pub fn new(source: Square, dest: Square) -> Move {
        Move {
            source,
            destination: dest,
            promotion: None,
        }
    }

    /// Constructs a new move from the source square to the destination square, promoting the
    /// moving pawn to the given piece kind. Panics if `promoted` is a pawn or a king.
    pub fn promotion(source: Square, dest: Square, promoted: PieceKind) -> Move {
        assert!(promoted.is_promotion_target(), "invalid promotion piece");
        Move {
            source,
            destination: dest,
            promotion: Some(promoted),
        }
    }

    pub fn source(self) -> Square {
        self.source
    }

    pub fn destination(self) -> Square {
        self.destination
    }

    /// If this move is a promotion, returns the piece kind that the pawn is being promoted to.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    pub fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    pub fn as_uci(self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(s.len() == 4 || s.len() == 5) {
            return Err(MoveParseError::InvalidLength(s.to_owned()));
        }

        let source: Square = s[0..2].parse()?;
        let dest: Square = s[2..4].parse()?;
        match s[4..].chars().next() {
            None => Ok(Move::new(source, dest)),
            Some(c) => match PieceKind::try_from(c) {
                Ok(kind) if c.is_ascii_lowercase() && kind.is_promotion_target() => {
                    Ok(Move::promotion(source, dest, kind))
                }
                _ => Err(MoveParseError::InvalidPromotion(c)),
            },
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
