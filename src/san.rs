//! Standard Algebraic Notation input.
//!
//! Accepted shapes, each optionally followed by `+` or `#`:
//!
//! - castling: `O-O`, `O-O-O`, `0-0`, `0-0-0`
//! - pawn push: `e4`, promotion `e8=Q`
//! - pawn capture: `exd5`, promotion `exd8=N`; an empty destination means en passant
//! - piece move: `Nf3`, `Ngf3`, `N1f3`, `Ng1f3`, `Nxe5`, `R5xa4`
//!
//! Piece moves may name the origin file, rank or both even when nothing is
//! ambiguous. A `+` or `#` is optional, but when present it must match the
//! position the move produces.

use tracing::debug;

use crate::board::{Board, Termination};
use crate::error::{ChessError, Result};
use crate::moves::{CastleSide, Move};
use crate::piece::PieceKind;
use crate::player::Action;
use crate::square::{file_index, rank_index, Square};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Shape {
    Castle(CastleSide),
    PawnPush {
        to: Square,
        promotion: Option<PieceKind>,
    },
    PawnCapture {
        file: usize,
        to: Square,
        promotion: Option<PieceKind>,
    },
    Piece {
        kind: PieceKind,
        file: Option<usize>,
        rank: Option<usize>,
        capture: bool,
        to: Square,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Claim {
    Nothing,
    Check,
    Mate,
}

/// Resolve `input` to a legal move on `board`.
///
/// The board is only borrowed mutably to try the move and check the claimed
/// suffix; it is back in its original state when this returns, whatever the
/// result.
pub fn parse_san(input: &str, board: &mut Board) -> Result<Move> {
    let text = input.trim();
    let (shape, claim) =
        lex(text).ok_or_else(|| ChessError::MalformedInput(format!("not a SAN move: {text:?}")))?;

    let mv = resolve(shape, text, board)?;
    if !board.is_legal(&mv) {
        return Err(ChessError::IllegalMove(format!("{text} ({mv}) is not legal here")));
    }
    if !board.apply_move(&mv) {
        return Err(ChessError::IllegalMove(format!("{text}: the game is over")));
    }
    let mated = board.termination() == Some(Termination::Checkmate);
    let checked = board.is_in_check();
    board.undo_last_move();

    let consistent = match claim {
        Claim::Nothing => true,
        Claim::Check => checked && !mated,
        Claim::Mate => mated,
    };
    if !consistent {
        return Err(ChessError::IllegalMove(format!("{text}: wrong check or mate marker")));
    }
    debug!(input = text, %mv, "parsed SAN");
    Ok(mv)
}

/// Player input: `resign`, `draw` or `offer draw` in any case, otherwise a
/// SAN move.
pub fn parse_input(input: &str, board: &mut Board) -> Result<Action> {
    let words: Vec<String> = input.split_whitespace().map(|w| w.to_ascii_lowercase()).collect();
    match words.join(" ").as_str() {
        "resign" => Ok(Action::Resign),
        "draw" | "offer draw" => Ok(Action::OfferDraw),
        _ => parse_san(input, board).map(Action::Move),
    }
}

fn lex(text: &str) -> Option<(Shape, Claim)> {
    let (body, claim) = if let Some(body) = text.strip_suffix('+') {
        (body, Claim::Check)
    } else if let Some(body) = text.strip_suffix('#') {
        (body, Claim::Mate)
    } else {
        (text, Claim::Nothing)
    };

    let shape = match body {
        "O-O" | "0-0" => Shape::Castle(CastleSide::King),
        "O-O-O" | "0-0-0" => Shape::Castle(CastleSide::Queen),
        _ => {
            let chars: Vec<char> = body.chars().collect();
            let first = *chars.first()?;
            match PieceKind::from_letter(first) {
                Some(PieceKind::Pawn) => return None,
                Some(kind) => piece_shape(kind, &chars[1..])?,
                None => pawn_shape(&chars)?,
            }
        }
    };
    Some((shape, claim))
}

fn square_of(file: char, rank: char) -> Option<Square> {
    Some(Square::new(rank_index(rank)?, file_index(file)?))
}

fn pawn_shape(chars: &[char]) -> Option<Shape> {
    let (rest, promotion) = match chars {
        [rest @ .., '=', letter] => {
            let kind = PieceKind::from_letter(*letter).filter(|k| PieceKind::PROMOTIONS.contains(k))?;
            (rest, Some(kind))
        }
        _ => (chars, None),
    };

    let (shape, to) = match *rest {
        [file, rank] => {
            let to = square_of(file, rank)?;
            (Shape::PawnPush { to, promotion }, to)
        }
        [origin, 'x', file, rank] => {
            let to = square_of(file, rank)?;
            (Shape::PawnCapture { file: file_index(origin)?, to, promotion }, to)
        }
        _ => return None,
    };

    // `=X` only on the last rank.
    if promotion.is_some() && to.row() != 0 && to.row() != 7 {
        return None;
    }
    Some(shape)
}

/// `[a-h]? [1-8]? x? [a-h][1-8]` after the piece letter.
fn piece_shape(kind: PieceKind, rest: &[char]) -> Option<Shape> {
    let (prefix, dest) = rest.split_at(rest.len().checked_sub(2)?);
    let to = square_of(dest[0], dest[1])?;

    let mut i = 0;
    let file = prefix.get(i).and_then(|&c| file_index(c));
    if file.is_some() {
        i += 1;
    }
    let rank = prefix.get(i).and_then(|&c| rank_index(c));
    if rank.is_some() {
        i += 1;
    }
    let capture = prefix.get(i) == Some(&'x');
    if capture {
        i += 1;
    }
    if i != prefix.len() {
        return None;
    }
    Some(Shape::Piece { kind, file, rank, capture, to })
}

fn resolve(shape: Shape, text: &str, board: &Board) -> Result<Move> {
    let illegal = || ChessError::IllegalMove(format!("{text} is not legal here"));
    let color = board.side_to_move();
    let dir = color.pawn_dir();

    match shape {
        Shape::Castle(side) => Ok(Move::castle(side, color)),

        // An empty square behind the destination means a two-square advance.
        Shape::PawnPush { to, promotion } => {
            let behind = to.offset(-dir, 0).ok_or_else(illegal)?;
            let from = if board.piece_at(behind).is_none() {
                behind.offset(-dir, 0).ok_or_else(illegal)?
            } else {
                behind
            };
            Ok(match promotion {
                Some(kind) => Move::promotion(from, to, kind, false),
                None => Move::regular(from, to, false),
            })
        }

        Shape::PawnCapture { file, to, promotion } => {
            let from = to.offset(-dir, file as i32 - to.col() as i32).ok_or_else(illegal)?;
            Ok(match promotion {
                Some(kind) => Move::promotion(from, to, kind, true),
                None if board.piece_at(to).is_none() => Move::en_passant(from, to),
                None => Move::regular(from, to, true),
            })
        }

        Shape::Piece { kind, file, rank, capture, to } => {
            let matches: Vec<Move> = board
                .legal_moves()
                .into_iter()
                .filter(|mv| match *mv {
                    Move::Regular { from, to: dest, capture: takes } => {
                        dest == to
                            && takes == capture
                            && board.piece_at(from).is_some_and(|p| p.kind == kind)
                            && file.map_or(true, |f| from.col() == f)
                            && rank.map_or(true, |r| from.row() == r)
                    }
                    _ => false,
                })
                .collect();
            match matches.as_slice() {
                [] => Err(illegal()),
                [only] => Ok(*only),
                many => Err(ChessError::AmbiguousMove(format!(
                    "{text} matches {} moves: {}",
                    many.len(),
                    many.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
                ))),
            }
        }
    }
}
