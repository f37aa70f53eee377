//! Static evaluation of positions.
//!
//! Scores are from White's perspective: positive favours White. A decided
//! game always scores `+inf` (White won), `-inf` (Black won) or `0.0`
//! (draw), whatever the evaluator; only positions still in progress get a
//! heuristic score.

use crate::board::{Board, Outcome};
use crate::piece::{Color, PieceKind};
use crate::square::Square;

pub trait Evaluator {
    /// Score `board` without changing it.
    fn evaluate(&self, board: &Board) -> f64;
}

/// The fixed score of a finished game, `None` while it is still being
/// played.
pub fn decided_score(board: &Board) -> Option<f64> {
    match board.outcome() {
        Outcome::InProgress => None,
        Outcome::WhiteWins => Some(f64::INFINITY),
        Outcome::BlackWins => Some(f64::NEG_INFINITY),
        Outcome::Draw => Some(0.0),
    }
}

/// Knows only who has won.
#[derive(Clone, Copy, Default, Debug)]
pub struct TrivialEvaluator;

impl Evaluator for TrivialEvaluator {
    fn evaluate(&self, board: &Board) -> f64 {
        decided_score(board).unwrap_or(0.0)
    }
}

/// Material balance in pawns.
#[derive(Clone, Copy, Default, Debug)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub const PAWN: f64 = 1.0;
    pub const KNIGHT: f64 = 3.0;
    /// Slightly above the knight.
    pub const BISHOP: f64 = 3.2;
    pub const ROOK: f64 = 5.0;
    pub const QUEEN: f64 = 9.0;

    /// The king has no material value; losing it is handled by the outcome.
    pub fn piece_value(kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => Self::PAWN,
            PieceKind::Knight => Self::KNIGHT,
            PieceKind::Bishop => Self::BISHOP,
            PieceKind::Rook => Self::ROOK,
            PieceKind::Queen => Self::QUEEN,
            PieceKind::King => 0.0,
        }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board) -> f64 {
        if let Some(score) = decided_score(board) {
            return score;
        }
        let mut score = 0.0;
        for row in 0..8 {
            for col in 0..8 {
                if let Some(p) = board.piece_at(Square::new(row, col)) {
                    let v = Self::piece_value(p.kind);
                    score += if p.color == Color::White { v } else { -v };
                }
            }
        }
        score
    }
}
