//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: expected 8 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("invalid piece placement: invalid character '{character}' in rank {rank}")]
    InvalidPieceChar { character: char, rank: u8 },

    #[error("invalid piece placement: consecutive digits in rank {rank}")]
    ConsecutiveDigits { rank: u8 },

    #[error("invalid piece placement: rank {rank} has {squares} squares, expected 8")]
    InvalidRankLength { rank: u8, squares: u32 },

    #[error("invalid piece placement: expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed FEN data.
///
/// This struct holds the validated FEN components. The rules engine is
/// responsible for laying them out on its board representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement string (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    pub piece_placement: String,
    /// Side to move.
    pub active_color: Color,
    /// Castling availability (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant target square, if any.
    pub en_passant: Option<Square>,
    /// Halfmove clock (for 50-move rule)
    pub halfmove_clock: u32,
    /// Fullmove number
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    ///
    /// The halfmove clock and fullmove number may be omitted together, in
    /// which case they default to 0 and 1.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 && parts.len() != 4 {
            return Err(FenError::InvalidFieldCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = Self::parse_en_passant(parts[3], active_color)?;

        let (halfmove_clock, fullmove_number) = match parts.get(4..6) {
            Some(&[halfmove, fullmove]) => (
                halfmove
                    .parse::<u32>()
                    .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?,
                fullmove
                    .parse::<u32>()
                    .map_err(|_| FenError::InvalidFullmoveNumber(fullmove.to_string()))?,
            ),
            _ => (0, 1),
        };

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount(ranks.len()));
        }

        let mut kings = [0usize; 2];
        for (i, rank) in ranks.iter().enumerate() {
            let rank_number = 8 - i as u8;
            let mut squares = 0;
            let mut after_digit = false;
            for c in rank.chars() {
                if let Some(digit) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if after_digit {
                        return Err(FenError::ConsecutiveDigits { rank: rank_number });
                    }
                    after_digit = true;
                    squares += digit;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if kind == PieceKind::King {
                        kings[color.index()] += 1;
                    }
                    after_digit = false;
                    squares += 1;
                } else {
                    return Err(FenError::InvalidPieceChar {
                        character: c,
                        rank: rank_number,
                    });
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidRankLength {
                    rank: rank_number,
                    squares,
                });
            }
        }

        for color in Color::BOTH {
            let count = kings[color.index()];
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
        }

        Ok(())
    }

    /// The target square lies behind a pawn the opponent just pushed: rank 6
    /// when white is to move, rank 3 when black is.
    fn parse_en_passant(ep: &str, active_color: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        let expected = match active_color {
            Color::White => '6',
            Color::Black => '3',
        };
        match Square::from_algebraic(ep) {
            Some(square) if square.rank().to_char() == expected => Ok(Some(square)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Converts the parsed FEN back to a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.active_color.to_fen_char(),
            self.castling,
            self.en_passant.map_or("-", Square::name),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for FenParser {
    fn default() -> Self {
        FenParser {
            piece_placement: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".to_string(),
            active_color: Color::White,
            castling: "KQkq".to_string(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}
