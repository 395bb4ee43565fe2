//! Chess rules engine on a 10×12 mailbox.
//!
//! This crate provides:
//! - [`Board`] - Immutable position with memoized hash and legal moves
//! - [`Move`] - Legal move annotated with capture, check and checkmate
//! - [`MoveCache`] - Shared storage of move lists keyed by Zobrist hash
//! - [`RulesConfig`] - Settings loaded from `chess-rules.toml`
//! - Perft counters for validating move generation
//!
//! # Architecture
//!
//! The board is a 120-cell array whose border cells hold [`Piece::INVALID`],
//! so move generation steps by fixed offsets and stops at the border without
//! bounds checks. Legality is decided by replaying each candidate through a
//! small overlay of cell edits rather than building a new board. Every check
//! is classified as mate or not by looking exactly one ply further.
//!
//! # Example
//!
//! ```
//! use chess_rules::Board;
//!
//! let board = Board::startpos();
//! println!("Legal moves from starting position: {}", board.legal_moves().len());
//!
//! let e4 = board.find_move("e2e4").unwrap();
//! let board = board.execute(&e4).unwrap();
//! assert_eq!(
//!     board.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```
//!
//! [`Piece::INVALID`]: chess_core::Piece::INVALID

mod board;
mod cache;
mod castling;
mod config;
mod legality;
mod mov;
mod movegen;
pub mod perft;
mod threats;
pub mod zobrist;

pub use board::{Board, MoveError};
pub use cache::{CacheError, DefaultMoveCache, MoveCache};
pub use castling::{CastleSide, CastlingRights};
pub use config::{ConfigError, MoveCacheConfig, RulesConfig};
pub use legality::InvariantError;
pub use mov::{Move, MoveFlag};
pub use perft::{perft, perft_divide, perft_stats, PerftStats};
pub use zobrist::ZobristKeys;
