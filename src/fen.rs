//! Forsyth-Edwards Notation.
//!
//! `Fen` is the six-field record with structural validation only. Whether
//! the described board can occur (king count, back-rank pawns, the side not
//! to move being in check) is decided by `Board::from_fen`.

use std::fmt;
use std::str::FromStr;

use crate::board::CastlingRights;
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fen {
    pub squares: [[Option<Piece>; 8]; 8],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

fn malformed(msg: impl Into<String>) -> ChessError {
    ChessError::MalformedInput(msg.into())
}

impl FromStr for Fen {
    type Err = ChessError;

    fn from_str(text: &str) -> Result<Fen> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(malformed(format!("FEN has {} fields, expected 6", fields.len())));
        }

        let squares = parse_placement(fields[0])?;
        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(malformed(format!("unknown side to move: {other}"))),
        };
        let castling_rights = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3], &squares, side_to_move)?;
        let halfmove_clock = parse_counter(fields[4], "halfmove clock")?;
        let fullmove_number = parse_counter(fields[5], "fullmove number")?;
        if fullmove_number == 0 {
            return Err(malformed("fullmove number must be positive"));
        }

        Ok(Fen { squares, side_to_move, castling_rights, en_passant, halfmove_clock, fullmove_number })
    }
}

/// Ranks are listed 8 down to 1, files a to h within each rank.
fn parse_placement(field: &str) -> Result<[[Option<Piece>; 8]; 8]> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(format!("placement has {} ranks, expected 8", ranks.len())));
    }

    let mut squares = [[None; 8]; 8];
    for (i, rank) in ranks.iter().enumerate() {
        let row = 7 - i;
        let mut col = 0usize;
        for c in rank.chars() {
            if let Some(blanks) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                col += blanks as usize;
            } else if let Some(piece) = Piece::from_char(c) {
                if col < 8 {
                    squares[row][col] = Some(piece);
                }
                col += 1;
            } else {
                return Err(malformed(format!("unknown piece letter '{c}' in rank {}", row + 1)));
            }
            if col > 8 {
                return Err(malformed(format!("rank {} describes more than 8 files", row + 1)));
            }
        }
        if col != 8 {
            return Err(malformed(format!("rank {} describes {col} files, expected 8", row + 1)));
        }
    }
    Ok(squares)
}

fn parse_castling(field: &str) -> Result<CastlingRights> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let slot = match c {
            'K' => &mut rights.white_kingside,
            'Q' => &mut rights.white_queenside,
            'k' => &mut rights.black_kingside,
            'q' => &mut rights.black_queenside,
            _ => return Err(malformed(format!("unknown castling letter '{c}'"))),
        };
        if *slot {
            return Err(malformed(format!("duplicate castling letter '{c}'")));
        }
        *slot = true;
    }
    Ok(rights)
}

/// The target is only meaningful right after a two-square pawn advance, so
/// anything else in this field is a syntax error rather than an impossible
/// board.
fn parse_en_passant(field: &str, squares: &[[Option<Piece>; 8]; 8], side: Color) -> Result<Option<Square>> {
    if field == "-" {
        return Ok(None);
    }
    let target = Square::from_algebraic(field)
        .ok_or_else(|| malformed(format!("bad en passant square: {field}")))?;

    // The side that just advanced is the one not to move.
    let mover = match target.row() {
        2 => Color::White,
        5 => Color::Black,
        _ => return Err(malformed(format!("en passant square must be on rank 3 or 6: {field}"))),
    };
    if mover == side {
        return Err(malformed(format!("en passant square {field} but {side:?} is to move")));
    }
    let pawn_row = (target.row() as i32 + mover.pawn_dir()) as usize;
    let pawn_ok = squares[pawn_row][target.col()].is_some_and(|p| p.is(PieceKind::Pawn, mover));
    if !pawn_ok {
        return Err(malformed(format!("en passant square {field} without the pawn that just advanced")));
    }
    if squares[target.row()][target.col()].is_some() {
        return Err(malformed(format!("en passant square {field} is occupied")));
    }
    Ok(Some(target))
}

/// Digits only: no sign, no decimal point.
fn parse_counter(field: &str, name: &str) -> Result<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("{name} is not a non-negative integer: {field}")));
    }
    field.parse().map_err(|_| malformed(format!("{name} out of range: {field}")))
}

impl Fen {
    /// The standard starting position.
    pub fn start() -> Fen {
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

        let mut squares = [[None; 8]; 8];
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            squares[0][col] = Some(Piece::new(kind, Color::White));
            squares[1][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            squares[6][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            squares[7][col] = Some(Piece::new(kind, Color::Black));
        }

        Fen {
            squares,
            side_to_move: Color::White,
            castling_rights: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The first four fields, used as the repetition key.
    pub fn unclocked(&self) -> String {
        let mut s = String::with_capacity(72);
        self.write_placement(&mut s);
        s.push(' ');
        s.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });
        s.push(' ');
        s.push_str(&self.castling_rights.to_string());
        s.push(' ');
        match self.en_passant {
            Some(sq) => s.push_str(&sq.to_string()),
            None => s.push('-'),
        }
        s
    }

    fn write_placement(&self, s: &mut String) {
        for row in (0..8).rev() {
            let mut blanks = 0;
            for col in 0..8 {
                match self.squares[row][col] {
                    Some(p) => {
                        if blanks > 0 {
                            s.push(char::from(b'0' + blanks));
                            blanks = 0;
                        }
                        s.push(p.to_char());
                    }
                    None => blanks += 1,
                }
            }
            if blanks > 0 {
                s.push(char::from(b'0' + blanks));
            }
            if row > 0 {
                s.push('/');
            }
        }
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.unclocked(), self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_position() {
        let fen: Fen = START_FEN.parse().unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling_rights, CastlingRights::all());
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.squares[0][4], Some(Piece::new(PieceKind::King, Color::White)));
        assert_eq!(fen.squares[6][0], Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert_eq!(fen.to_string(), START_FEN);
        assert_eq!(fen, Fen::start());
    }

    #[test]
    fn castling_letters_serialize_in_fixed_order() {
        let fen: Fen = "r3k2r/8/8/8/8/8/8/R3K2R w qkQK - 0 1".parse().unwrap();
        assert_eq!(fen.to_string(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let fen: Fen = format!("  {START_FEN}\n").parse().unwrap();
        assert_eq!(fen.to_string(), START_FEN);
    }

    #[test]
    fn en_passant_requires_the_advanced_pawn() {
        let ok = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(ok.parse::<Fen>().unwrap().en_passant, Square::from_algebraic("e3"));

        let wrong_side = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1";
        assert!(wrong_side.parse::<Fen>().is_err());
        let no_pawn = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3 0 1";
        assert!(no_pawn.parse::<Fen>().is_err());
    }

    #[test]
    fn counters_must_be_plain_digits() {
        for clocks in ["-1 1", "0.5 1", "a 1", "0 0", "0 -1", "0 +1"] {
            let text = format!("4k3/8/8/8/8/8/8/4K3 w - - {clocks}");
            let err = text.parse::<Fen>().unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::MalformedInput, "{text}");
        }
    }

    #[test]
    fn strips_clock_fields() {
        let fen: Fen = START_FEN.parse().unwrap();
        assert_eq!(fen.unclocked(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
        let later: Fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 8 5".parse().unwrap();
        assert_eq!(later.unclocked(), fen.unclocked());
    }
}
