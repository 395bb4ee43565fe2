//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the rules engine:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for coordinates on a 10×12 mailbox
//! - FEN parsing and serialization

mod color;
mod fen;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square, MAILBOX_SIZE};
