use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Color, PieceKind};
use crate::square::Square;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum CastleSide {
    King,
    Queen,
}

/// A move in one of its four shapes. Equality is structural, so a move
/// built by hand compares equal to the generated one only if every field,
/// including the capture flag, agrees.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Move {
    Regular { from: Square, to: Square, capture: bool },
    Castling { side: CastleSide, color: Color },
    EnPassant { from: Square, to: Square },
    Promotion { from: Square, to: Square, kind: PieceKind, capture: bool },
}

impl Move {
    pub fn regular(from: Square, to: Square, capture: bool) -> Move {
        Move::Regular { from, to, capture }
    }

    pub fn castle(side: CastleSide, color: Color) -> Move {
        Move::Castling { side, color }
    }

    pub fn en_passant(from: Square, to: Square) -> Move {
        Move::EnPassant { from, to }
    }

    /// Panics unless `kind` is one of the four promotable kinds.
    pub fn promotion(from: Square, to: Square, kind: PieceKind, capture: bool) -> Move {
        assert!(PieceKind::PROMOTIONS.contains(&kind), "cannot promote to {kind:?}");
        Move::Promotion { from, to, kind, capture }
    }

    /// King's origin square. For castling this is derived from the colour.
    pub fn from(&self) -> Square {
        match *self {
            Move::Regular { from, .. } | Move::EnPassant { from, .. } | Move::Promotion { from, .. } => from,
            Move::Castling { color, .. } => Square::new(color.back_rank(), 4),
        }
    }

    /// King's destination square for castling.
    pub fn to(&self) -> Square {
        match *self {
            Move::Regular { to, .. } | Move::EnPassant { to, .. } | Move::Promotion { to, .. } => to,
            Move::Castling { side, color } => {
                let col = match side {
                    CastleSide::King => 6,
                    CastleSide::Queen => 2,
                };
                Square::new(color.back_rank(), col)
            }
        }
    }

    pub fn is_capture(&self) -> bool {
        match *self {
            Move::Regular { capture, .. } | Move::Promotion { capture, .. } => capture,
            Move::EnPassant { .. } => true,
            Move::Castling { .. } => false,
        }
    }
}

/// Coordinate rendering used in logs: `e2-e4`, `e4xd5`, `e7-e8=Q`, `O-O`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Castling { side: CastleSide::King, .. } => f.write_str("O-O"),
            Move::Castling { side: CastleSide::Queen, .. } => f.write_str("O-O-O"),
            _ => {
                let sep = if self.is_capture() { 'x' } else { '-' };
                write!(f, "{}{}{}", self.from(), sep, self.to())?;
                if let Move::Promotion { kind, .. } = *self {
                    write!(f, "={}", kind.letter())?;
                }
                Ok(())
            }
        }
    }
}

/// Castling rook's `(from, to)` columns.
pub fn castle_rook_cols(side: CastleSide) -> (usize, usize) {
    match side {
        CastleSide::King => (7, 5),
        CastleSide::Queen => (0, 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn castling_squares_follow_colour() {
        let mv = Move::castle(CastleSide::Queen, Color::Black);
        assert_eq!(mv.from(), sq("e8"));
        assert_eq!(mv.to(), sq("c8"));
        let mv = Move::castle(CastleSide::King, Color::White);
        assert_eq!(mv.from(), sq("e1"));
        assert_eq!(mv.to(), sq("g1"));
    }

    #[test]
    fn capture_flag_is_part_of_equality() {
        assert_ne!(Move::regular(sq("e2"), sq("e4"), false), Move::regular(sq("e2"), sq("e4"), true));
        assert!(Move::en_passant(sq("e5"), sq("d6")).is_capture());
    }

    #[test]
    fn display_coordinates() {
        assert_eq!(Move::regular(sq("e2"), sq("e4"), false).to_string(), "e2-e4");
        assert_eq!(Move::promotion(sq("d7"), sq("c8"), PieceKind::Knight, true).to_string(), "d7xc8=N");
        assert_eq!(Move::castle(CastleSide::King, Color::Black).to_string(), "O-O");
    }

    #[test]
    #[should_panic]
    fn promotion_to_king_panics() {
        let _ = Move::promotion(sq("a7"), sq("a8"), PieceKind::King, false);
    }
}
