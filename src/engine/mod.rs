// src/engine/mod.rs

//! Thin adapter over the move-generation library plus the engine error type.
//!
//! The rest of the crate goes through these helpers for FEN and SAN handling
//! so that positions are always built in standard castling mode and printed
//! with legal en-passant squares.

pub mod evaluation;
pub mod search;

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid position: {0}")]
    InvalidPosition(String),
    #[error("task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },
}

pub fn parse_fen(fen: &str) -> Result<Chess, EngineError> {
    let parsed: Fen = fen
        .parse()
        .map_err(|e| EngineError::InvalidPosition(format!("{fen}: {e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| EngineError::InvalidPosition(format!("{fen}: {e}")))
}

pub fn fen_string(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

pub fn san_string(pos: &Chess, m: Move) -> String {
    SanPlus::from_move(pos.clone(), m).to_string()
}

pub fn uci_string(m: &Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

/// The current position with the turn passed to the opponent and en passant
/// cleared. `None` when no legal position can be formed that way.
pub fn null_move_position(pos: &Chess) -> Option<Chess> {
    pos.clone().swap_turn().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Color;

    #[test]
    fn parse_fen_round_trip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = parse_fen(fen).unwrap();
        assert_eq!(fen_string(&pos), fen);
    }

    #[test]
    fn parse_fen_rejects_garbage() {
        assert!(parse_fen("not a position").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn null_move_swaps_turn() {
        let pos = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let swapped = null_move_position(&pos).unwrap();
        assert_eq!(swapped.turn(), Color::Black);
    }

    #[test]
    fn null_move_fails_when_in_check() {
        // White is in check, so handing black the move would leave a king
        // en prise on the opponent's turn.
        let pos = parse_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert!(null_move_position(&pos).is_none());
    }
}
