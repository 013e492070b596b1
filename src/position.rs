// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    core::{self, *},
    movegen,
};

/// The starting position of a standard game of chess.
pub const START_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A position, representing the state of a chess game at a single point in time: which piece (if
/// any) stands on each of the 64 squares, whose turn it is, and the move clocks.
///
/// Castling rights and the en-passant square are carried along exactly as they appeared in FEN
/// but are not interpreted; move generation ignores them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// The contents of each square, indexed by square.
    board: [Option<Piece>; 64],
    /// Color whose turn it is to move.
    side_to_move: Color,
    /// The halfmove clock, or the progress to a draw by the 50-move Rule.
    halfmove_clock: u16,
    /// The fullmove clock, incremented after every black move.
    fullmove_clock: u16,
    /// The castling field of the FEN this position was read from.
    castling: String,
    /// The en-passant field of the FEN this position was read from.
    en_passant: String,
}

impl Position {
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u16 {
        self.fullmove_clock
    }

    pub fn castling(&self) -> &str {
        &self.castling
    }

    pub fn en_passant(&self) -> &str {
        &self.en_passant
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.as_u8() as usize]
    }

    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.as_u8() as usize] = piece;
    }

    /// Returns the piece at the given rank and file, both zero-based. Coordinates off of the board
    /// read as an empty square.
    pub fn get(&self, rank: i32, file: i32) -> Option<Piece> {
        Square::from_coords(rank, file).and_then(|sq| self.piece_at(sq))
    }

    /// Places a piece at the given rank and file, both zero-based, or clears the square if `piece`
    /// is `None`. Writes to coordinates off of the board are ignored.
    pub fn set(&mut self, rank: i32, file: i32, piece: Option<Piece>) {
        if let Some(sq) = Square::from_coords(rank, file) {
            self.set_piece(sq, piece);
        }
    }

    /// Returns every pseudo-legal move available to `color`, in board-scan order. Moves that leave
    /// `color`'s king in check are included.
    pub fn all_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        movegen::generate_moves(color, self, &mut moves);
        tracing::trace!(%color, count = moves.len(), "generated moves");
        moves
    }
}

impl Position {
    /// Constructs an empty board with white to move.
    pub fn new() -> Position {
        Position {
            board: [None; 64],
            side_to_move: Color::White,
            halfmove_clock: 0,
            fullmove_clock: 1,
            castling: "-".to_owned(),
            en_passant: "-".to_owned(),
        }
    }

    pub fn from_start_position() -> Position {
        let mut pos = Position::new();
        for (file, kind) in core::files().zip(BACK_RANK) {
            for (color, back, front) in [
                (Color::White, RANK_1, RANK_2),
                (Color::Black, RANK_8, RANK_7),
            ] {
                pos.set_piece(Square::of(back, file), Some(Piece::new(kind, color)));
                let pawn = Piece::new(PieceKind::Pawn, color);
                pos.set_piece(Square::of(front, file), Some(pawn));
            }
        }

        pos.castling = "KQkq".to_owned();
        pos
    }

    /// Constructs a new position from a FEN representation of a board position.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Position, FenParseError> {
        let fen = fen.as_ref();
        let fen_board = FenBoard::parse(fen)?;
        let pos = Position::try_from(fen_board)?;
        tracing::debug!(fen, "parsed position");
        Ok(pos)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for rank in core::ranks().rev() {
            let mut empty_squares = 0;
            for file in core::files() {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    if empty_squares != 0 {
                        buf.push(char::from(b'0' + empty_squares));
                    }
                    buf.push(piece.as_char());
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                buf.push(char::from(b'0' + empty_squares));
            }

            if rank != core::RANK_1 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.side_to_move() {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }

        // Writing to a String can't fail.
        let _ = write!(
            &mut buf,
            " {} {} {} {}",
            self.castling,
            self.en_passant,
            self.halfmove_clock(),
            self.fullmove_clock()
        );
        buf
    }
}

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("expected 6 space-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    WrongRankCount(usize),
    #[error("invalid digit: {0}")]
    InvalidDigit(char),
    #[error("rank {0} does not sum to 8 files")]
    FileDoesNotSumToEight(Rank),
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move: {0:?}")]
    InvalidSideToMove(String),
    #[error("empty castle")]
    EmptyCastle,
    #[error("empty en-passant")]
    EmptyEnPassant,
    #[error("empty halfmove")]
    EmptyHalfmove,
    #[error("invalid halfmove: {0:?}")]
    InvalidHalfmove(String),
    #[error("empty fullmove")]
    EmptyFullmove,
    #[error("invalid fullmove: {0:?}")]
    InvalidFullmove(String),
}

/// The six fields of a FEN string, split apart but with the piece placement not yet laid out on a
/// board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenBoard {
    pub placement: String,
    pub side_to_move: Color,
    pub castling: String,
    pub en_passant: String,
    pub halfmove: u16,
    pub fullmove: u16,
}

impl FenBoard {
    pub fn parse(fen: &str) -> Result<FenBoard, FenParseError> {
        fn counter(
            field: &str,
            empty: FenParseError,
            invalid: fn(String) -> FenParseError,
        ) -> Result<u16, FenParseError> {
            if field.is_empty() {
                return Err(empty);
            }

            if !field.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid(field.to_owned()));
            }

            field.parse::<u16>().map_err(|_| invalid(field.to_owned()))
        }

        let fields: Vec<&str> = fen.split(' ').collect();
        let (placement, side, castling, en_passant, halfmove, fullmove) = match fields[..] {
            [placement, side, castling, en_passant, halfmove, fullmove] => {
                (placement, side, castling, en_passant, halfmove, fullmove)
            }
            _ => return Err(FenParseError::WrongFieldCount(fields.len())),
        };

        let side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove(side.to_owned())),
        };

        if castling.is_empty() {
            return Err(FenParseError::EmptyCastle);
        }

        if en_passant.is_empty() {
            return Err(FenParseError::EmptyEnPassant);
        }

        Ok(FenBoard {
            placement: placement.to_owned(),
            side_to_move,
            castling: castling.to_owned(),
            en_passant: en_passant.to_owned(),
            halfmove: counter(
                halfmove,
                FenParseError::EmptyHalfmove,
                FenParseError::InvalidHalfmove,
            )?,
            fullmove: counter(
                fullmove,
                FenParseError::EmptyFullmove,
                FenParseError::InvalidFullmove,
            )?,
        })
    }
}

impl FromStr for FenBoard {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FenBoard::parse(s)
    }
}

impl TryFrom<FenBoard> for Position {
    type Error = FenParseError;

    fn try_from(fen: FenBoard) -> Result<Self, Self::Error> {
        let rank_strs: Vec<&str> = fen.placement.split('/').collect();
        if rank_strs.len() != 8 {
            return Err(FenParseError::WrongRankCount(rank_strs.len()));
        }

        let mut pos = Position::new();
        for (rank, rank_str) in core::ranks().rev().zip(rank_strs) {
            let mut file = 0u8;
            for c in rank_str.chars() {
                // digits 1 through 8 indicate empty squares.
                if c.is_ascii_digit() {
                    if !('1'..='8').contains(&c) {
                        return Err(FenParseError::InvalidDigit(c));
                    }

                    file += c as u8 - b'0';
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight(rank));
                    }

                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                let file_ty =
                    File::try_from(file).map_err(|_| FenParseError::FileDoesNotSumToEight(rank))?;
                pos.set_piece(Square::of(rank, file_ty), Some(piece));
                file += 1;
            }

            if file != 8 {
                return Err(FenParseError::FileDoesNotSumToEight(rank));
            }
        }

        pos.side_to_move = fen.side_to_move;
        pos.castling = fen.castling;
        pos.en_passant = fen.en_passant;
        pos.halfmove_clock = fen.halfmove;
        pos.fullmove_clock = fen.fullmove;
        Ok(pos)
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn file_legend(f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, " ")?;
            for file in core::files() {
                write!(f, " {}", file)?;
            }
            writeln!(f)
        }

        file_legend(f)?;
        for rank in core::ranks().rev() {
            write!(f, "{}", rank)?;
            for file in core::files() {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => write!(f, " {}", piece)?,
                    None => write!(f, " .")?,
                }
            }

            writeln!(f, " {}", rank)?;
        }

        file_legend(f)?;
        writeln!(f, "{} to move", self.side_to_move)?;
        writeln!(f, "Half moves: {}", self.halfmove_clock)?;
        writeln!(f, "Full moves: {}", self.fullmove_clock)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

#[cfg(test)]
mod tests {
    mod fen {
        use crate::{
            core::*,
            position::{FenBoard, FenParseError, Position, START_POSITION_FEN},
        };

        #[test]
        fn fen_smoke() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();

            // white's turn to move.
            assert_eq!(Color::White, pos.side_to_move());

            // castling and en-passant are kept as written.
            assert_eq!("-", pos.castling());
            assert_eq!("-", pos.en_passant());

            // both clocks are zero.
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(0, pos.fullmove_clock());

            for sq in squares() {
                assert!(pos.piece_at(sq).is_none());
            }
        }

        #[test]
        fn black_to_move_and_clocks() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 b Kq e3 12 40").unwrap();
            assert_eq!(Color::Black, pos.side_to_move());
            assert_eq!("Kq", pos.castling());
            assert_eq!("e3", pos.en_passant());
            assert_eq!(12, pos.halfmove_clock());
            assert_eq!(40, pos.fullmove_clock());
        }

        #[test]
        fn starting_position() {
            let pos = Position::from_fen(START_POSITION_FEN).unwrap();

            let back_rank = [
                PieceKind::Rook,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Queen,
                PieceKind::King,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Rook,
            ];
            for (file, kind) in files().zip(back_rank) {
                assert_eq!(
                    Some(Piece::new(kind, Color::White)),
                    pos.piece_at(Square::of(RANK_1, file))
                );
                assert_eq!(
                    Some(Piece::new(PieceKind::Pawn, Color::White)),
                    pos.piece_at(Square::of(RANK_2, file))
                );
                assert_eq!(
                    Some(Piece::new(PieceKind::Pawn, Color::Black)),
                    pos.piece_at(Square::of(RANK_7, file))
                );
                assert_eq!(
                    Some(Piece::new(kind, Color::Black)),
                    pos.piece_at(Square::of(RANK_8, file))
                );
                for rank in [RANK_3, RANK_4, RANK_5, RANK_6] {
                    assert!(pos.piece_at(Square::of(rank, file)).is_none());
                }
            }

            assert_eq!(Color::White, pos.side_to_move());
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(1, pos.fullmove_clock());
        }

        #[test]
        fn start_position_matches_fen() {
            assert_eq!(
                Position::from_fen(START_POSITION_FEN).unwrap(),
                Position::from_start_position()
            );
            assert_eq!(Position::from_start_position(), Position::default());
        }

        #[test]
        fn start_position_roundtrip() {
            let pos = Position::from_fen(START_POSITION_FEN).unwrap();
            assert_eq!(pos.as_fen(), START_POSITION_FEN);
            assert_eq!(Position::from_start_position().as_fen(), START_POSITION_FEN);
        }

        #[test]
        fn roundtrip_with_gaps() {
            let fen = "4k2r/6r1/8/8/8/8/3R4/R3K3 w Qk - 0 1";
            assert_eq!(fen, Position::from_fen(fen).unwrap().as_fen());
        }

        #[test]
        fn fen_board_fields() {
            let board: FenBoard = "8/8/8/8/8/8/8/8 b - a3 3 7".parse().unwrap();
            assert_eq!("8/8/8/8/8/8/8/8", board.placement);
            assert_eq!(Color::Black, board.side_to_move);
            assert_eq!("-", board.castling);
            assert_eq!("a3", board.en_passant);
            assert_eq!(3, board.halfmove);
            assert_eq!(7, board.fullmove);
        }

        #[test]
        fn empty() {
            let err = Position::from_fen("").unwrap_err();
            assert_eq!(FenParseError::WrongFieldCount(1), err);
        }

        #[test]
        fn too_few_fields() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0").unwrap_err();
            assert_eq!(FenParseError::WrongFieldCount(5), err);
        }

        #[test]
        fn too_many_fields() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1 x").unwrap_err();
            assert_eq!(FenParseError::WrongFieldCount(7), err);
        }

        #[test]
        fn unknown_piece() {
            let err = Position::from_fen("z7/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::UnknownPiece('z'), err);
        }

        #[test]
        fn invalid_digit() {
            let err = Position::from_fen("9/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidDigit('9'), err);
            let err = Position::from_fen("08/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidDigit('0'), err);
        }

        #[test]
        fn not_sum_to_8() {
            let err = Position::from_fen("pppp5/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight(RANK_8), err);
        }

        #[test]
        fn too_many_pieces_in_rank() {
            let err = Position::from_fen("8/8/8/8/8/8/8/RNBQKBNRR w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight(RANK_1), err);
        }

        #[test]
        fn short_rank() {
            let err = Position::from_fen("8/8/8/7/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight(RANK_5), err);
        }

        #[test]
        fn wrong_rank_count() {
            let err = Position::from_fen("8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::WrongRankCount(7), err);
            let err = Position::from_fen("8/8/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::WrongRankCount(9), err);
        }

        #[test]
        fn bad_side_to_move() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 c - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidSideToMove("c".to_owned()), err);
        }

        #[test]
        fn empty_castle() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w  - 0 0").unwrap_err();
            assert_eq!(FenParseError::EmptyCastle, err);
        }

        #[test]
        fn empty_halfmove() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - -  0").unwrap_err();
            assert_eq!(FenParseError::EmptyHalfmove, err);
        }

        #[test]
        fn invalid_halfmove() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - q 0").unwrap_err();
            assert_eq!(FenParseError::InvalidHalfmove("q".to_owned()), err);
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - -1 0").unwrap_err();
            assert_eq!(FenParseError::InvalidHalfmove("-1".to_owned()), err);
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 4294967296 0").unwrap_err();
            assert_eq!(FenParseError::InvalidHalfmove("4294967296".to_owned()), err);
        }

        #[test]
        fn invalid_fullmove() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 q").unwrap_err();
            assert_eq!(FenParseError::InvalidFullmove("q".to_owned()), err);
        }

        #[test]
        fn double_space_is_rejected() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8  w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::WrongFieldCount(7), err);
        }
    }

    mod board {
        use crate::{core::*, position::Position};

        #[test]
        fn empty_board_reads_empty_everywhere() {
            let pos = Position::new();
            for rank in 0..8 {
                for file in 0..8 {
                    assert!(pos.get(rank, file).is_none());
                }
            }
        }

        #[test]
        fn get_off_board_is_empty() {
            let pos = Position::from_start_position();
            assert_eq!(
                Some(Piece::new(PieceKind::Rook, Color::White)),
                pos.get(0, 0)
            );
            assert!(pos.get(-1, 0).is_none());
            assert!(pos.get(0, -1).is_none());
            assert!(pos.get(8, 0).is_none());
            assert!(pos.get(0, 8).is_none());
        }

        #[test]
        fn set_off_board_is_ignored() {
            let mut pos = Position::new();
            let knight = Some(Piece::new(PieceKind::Knight, Color::Black));
            pos.set(8, 3, knight);
            pos.set(3, -1, knight);
            assert_eq!(Position::new(), pos);

            pos.set(3, 3, knight);
            assert_eq!(knight, pos.piece_at(D4));
            assert_eq!(knight, pos.get(3, 3));

            pos.set(3, 3, None);
            assert!(pos.piece_at(D4).is_none());
        }

        #[test]
        fn display_start_position() {
            let expected = "  a b c d e f g h\n\
                            8 r n b q k b n r 8\n\
                            7 p p p p p p p p 7\n\
                            6 . . . . . . . . 6\n\
                            5 . . . . . . . . 5\n\
                            4 . . . . . . . . 4\n\
                            3 . . . . . . . . 3\n\
                            2 P P P P P P P P 2\n\
                            1 R N B Q K B N R 1\n  a b c d e f g h\n\
                            White to move\n\
                            Half moves: 0\n\
                            Full moves: 1\n";
            assert_eq!(expected, Position::from_start_position().to_string());
        }
    }

    mod moves {
        use std::thread;

        use crate::{core::*, position::Position};

        #[test]
        fn start_position_move_counts() {
            let pos = Position::from_start_position();
            assert_eq!(20, pos.all_moves(Color::White).len());
            assert_eq!(20, pos.all_moves(Color::Black).len());
        }

        #[test]
        fn idempotent() {
            let pos =
                Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                    .unwrap();
            let before = pos.clone();
            let first = pos.all_moves(Color::White);
            let second = pos.all_moves(Color::White);
            assert_eq!(first, second);
            assert_eq!(before, pos);
        }

        #[test]
        fn concurrent_generation() {
            let pos = Position::from_fen("4k2r/6r1/8/8/8/8/3R4/R3K3 w Qk - 0 1").unwrap();
            let expected = pos.all_moves(Color::White);
            thread::scope(|s| {
                let handles: Vec<_> = (0..4)
                    .map(|_| s.spawn(|| pos.all_moves(Color::White)))
                    .collect();
                for handle in handles {
                    assert_eq!(expected, handle.join().unwrap());
                }
            });
        }

        #[test]
        fn empty_move_list() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
            assert!(pos.all_moves(Color::White).is_empty());
        }
    }
}
