use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChessError, Result};
use crate::fen::Fen;
use crate::moves::{castle_rook_cols, CastleSide, Move};
use crate::pgn::Pgn;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

pub type Grid = [[Option<Piece>; 8]; 8];

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];
const STRAIGHT_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn all() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn get(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::King) => self.white_kingside,
            (Color::White, CastleSide::Queen) => self.white_queenside,
            (Color::Black, CastleSide::King) => self.black_kingside,
            (Color::Black, CastleSide::Queen) => self.black_queenside,
        }
    }

    fn revoke(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::King) => self.white_kingside = false,
            (Color::White, CastleSide::Queen) => self.white_queenside = false,
            (Color::Black, CastleSide::King) => self.black_kingside = false,
            (Color::Black, CastleSide::Queen) => self.black_queenside = false,
        }
    }

    /// The right tied to a rook's home corner, if `sq` is one.
    fn corner(sq: Square) -> Option<(Color, CastleSide)> {
        match (sq.row(), sq.col()) {
            (0, 0) => Some((Color::White, CastleSide::Queen)),
            (0, 7) => Some((Color::White, CastleSide::King)),
            (7, 0) => Some((Color::Black, CastleSide::Queen)),
            (7, 7) => Some((Color::Black, CastleSide::King)),
            _ => None,
        }
    }
}

/// FEN castling field: letters in `KQkq` order, `-` when empty.
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for (set, letter) in [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ] {
            if set {
                write!(f, "{letter}")?;
                any = true;
            }
        }
        if !any {
            f.write_str("-")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Outcome {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }

    pub fn win_for(color: Color) -> Outcome {
        match color {
            Color::White => Outcome::WhiteWins,
            Color::Black => Outcome::BlackWins,
        }
    }

    /// PGN result token.
    pub fn result_token(self) -> &'static str {
        match self {
            Outcome::InProgress => "*",
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }
}

/// Why a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

/// Everything `undo_last_move` needs to put the position back.
#[derive(Clone, Serialize, Deserialize, Debug)]
struct UndoRecord {
    mv: Move,
    moved: Piece,
    captured: Option<(Square, Piece)>,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    outcome: Outcome,
    termination: Option<Termination>,
    repetition_key: String,
}

/// A game position plus the history needed to undo moves and detect
/// repetitions.
///
/// A board only ever holds a legal position: exactly one king per side, no
/// pawns on the back ranks, and the side not to move out of check. Moves are
/// applied and undone in place, so search works on a single instance.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Board {
    squares: Grid,
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    outcome: Outcome,
    termination: Option<Termination>,
    history: Vec<UndoRecord>,
    repetitions: HashMap<String, u32>,
    pgn: Pgn,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        Board::from_record(Fen::start())
    }

    /// Parse a FEN and reject positions that cannot occur in a game.
    pub fn from_fen(text: &str) -> Result<Self> {
        let record: Fen = text.parse()?;
        check_position(&record)?;
        Ok(Board::from_record(record))
    }

    fn from_record(record: Fen) -> Self {
        let mut board = Board {
            squares: record.squares,
            side_to_move: record.side_to_move,
            castling_rights: record.castling_rights,
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
            outcome: Outcome::InProgress,
            termination: None,
            history: Vec::new(),
            repetitions: HashMap::new(),
            pgn: Pgn::new(record.fullmove_number, record.side_to_move),
        };
        board.repetitions.insert(board.unclocked_fen(), 1);
        board.update_outcome();
        board
    }

    fn to_record(&self) -> Fen {
        Fen {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    pub fn to_fen(&self) -> String {
        self.to_record().to_string()
    }

    /// FEN without the clock fields; positions that compare equal here count
    /// as repetitions.
    pub fn unclocked_fen(&self) -> String {
        self.to_record().unclocked()
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row()][sq.col()]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Number of moves that can still be undone.
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    pub fn pgn(&self) -> &Pgn {
        &self.pgn
    }

    /// Move list terminated by the result token of the current outcome.
    pub fn to_pgn(&self) -> String {
        self.pgn.render(self.outcome.result_token())
    }

    // -----------------------------------------------------------------
    // Attacks
    // -----------------------------------------------------------------

    /// Squares the piece on `sq` attacks. Sliders include the blocking
    /// square; pawns attack only their two forward diagonals.
    pub fn attacks_from(&self, sq: Square) -> Vec<Square> {
        attacks_on(&self.squares, sq)
    }

    /// Union of the attack sets of every piece of `color`.
    pub fn controlled_squares(&self, color: Color) -> HashSet<Square> {
        let mut controlled = HashSet::new();
        for sq in occupied_by(&self.squares, color) {
            controlled.extend(attacks_on(&self.squares, sq));
        }
        controlled
    }

    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        square_attacked_on(&self.squares, sq, by)
    }

    /// Whether the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.in_check(self.side_to_move)
    }

    pub fn in_check(&self, color: Color) -> bool {
        let king = king_on(&self.squares, color);
        square_attacked_on(&self.squares, king, color.opposite())
    }

    // -----------------------------------------------------------------
    // Move generation
    // -----------------------------------------------------------------

    /// All legal moves for the side to move, ordered by origin square (a1
    /// first, h8 last) and then by generation order within each piece.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut scratch = self.squares;
        let mut moves = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                self.collect_legal(Square::new(row, col), &mut scratch, &mut moves);
            }
        }
        moves
    }

    /// Legal moves of the side-to-move piece on `sq`; empty if there is none.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        let mut scratch = self.squares;
        let mut moves = Vec::new();
        self.collect_legal(sq, &mut scratch, &mut moves);
        moves
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves_from(mv.from()).contains(mv)
    }

    fn has_legal_move(&self) -> bool {
        let mut scratch = self.squares;
        let mut moves = Vec::new();
        for sq in occupied_by(&self.squares, self.side_to_move) {
            self.collect_legal(sq, &mut scratch, &mut moves);
            if !moves.is_empty() {
                return true;
            }
        }
        false
    }

    /// Pseudo-legal candidates from `from`, filtered by trying each one on
    /// `scratch`. The scratch grid is restored after every probe.
    fn collect_legal(&self, from: Square, scratch: &mut Grid, out: &mut Vec<Move>) {
        let piece = match self.piece_at(from) {
            Some(p) if p.color == self.side_to_move => p,
            _ => return,
        };

        let mut candidates = Vec::new();
        match piece.kind {
            PieceKind::Pawn => self.pawn_candidates(from, piece.color, &mut candidates),
            _ => {
                for to in attacks_on(&self.squares, from) {
                    match self.piece_at(to) {
                        Some(p) if p.color == piece.color => {}
                        occupant => candidates.push(Move::regular(from, to, occupant.is_some())),
                    }
                }
            }
        }

        let king = if piece.kind == PieceKind::King { None } else { Some(king_on(&self.squares, piece.color)) };
        for mv in candidates {
            if keeps_king_safe(scratch, &mv, piece, king) {
                out.push(mv);
            }
        }

        if piece.kind == PieceKind::King {
            self.castling_candidates(piece.color, out);
        }
    }

    fn pawn_candidates(&self, from: Square, color: Color, out: &mut Vec<Move>) {
        let dir = color.pawn_dir();
        let last_row = color.opposite().back_rank();
        let start_row = (color.back_rank() as i32 + dir) as usize;

        let push_or_promote = |out: &mut Vec<Move>, to: Square, capture: bool| {
            if to.row() == last_row {
                for kind in PieceKind::PROMOTIONS {
                    out.push(Move::promotion(from, to, kind, capture));
                }
            } else {
                out.push(Move::regular(from, to, capture));
            }
        };

        if let Some(one) = from.offset(dir, 0) {
            if self.piece_at(one).is_none() {
                push_or_promote(out, one, false);
                if from.row() == start_row {
                    if let Some(two) = one.offset(dir, 0) {
                        if self.piece_at(two).is_none() {
                            out.push(Move::regular(from, two, false));
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(to) = from.offset(dir, dc) else { continue };
            if let Some(target) = self.piece_at(to) {
                if target.color != color {
                    push_or_promote(out, to, true);
                }
            }
        }

        // The pawn must stand beside the one that just advanced two squares.
        if let Some(target) = self.en_passant {
            let capture_row = (color.opposite().back_rank() as i32 - 3 * dir) as usize;
            let beside = from.row() == capture_row
                && target.row() as i32 == from.row() as i32 + dir
                && (target.col() as i32 - from.col() as i32).abs() == 1;
            if beside {
                let victim = Square::new(from.row(), target.col());
                assert!(
                    self.piece_at(victim) == Some(Piece::new(PieceKind::Pawn, color.opposite())),
                    "en passant target {target} without an opponent pawn on {victim}"
                );
                assert!(self.piece_at(target).is_none(), "en passant target {target} is occupied");
                out.push(Move::en_passant(from, target));
            }
        }
    }

    /// The king may not start in, pass through, or land on an attacked
    /// square. Rights whose king or rook is missing generate nothing.
    fn castling_candidates(&self, color: Color, out: &mut Vec<Move>) {
        let row = color.back_rank();
        if self.squares[row][4] != Some(Piece::new(PieceKind::King, color)) {
            return;
        }
        let enemy = color.opposite();

        for side in [CastleSide::King, CastleSide::Queen] {
            if !self.castling_rights.get(color, side) {
                continue;
            }
            let (rook_col, _) = castle_rook_cols(side);
            if self.squares[row][rook_col] != Some(Piece::new(PieceKind::Rook, color)) {
                continue;
            }
            let (between, king_path): (&[usize], [usize; 3]) = match side {
                CastleSide::King => (&[5, 6], [4, 5, 6]),
                CastleSide::Queen => (&[1, 2, 3], [4, 3, 2]),
            };
            if between.iter().any(|&col| self.squares[row][col].is_some()) {
                continue;
            }
            if king_path
                .iter()
                .any(|&col| square_attacked_on(&self.squares, Square::new(row, col), enemy))
            {
                continue;
            }
            out.push(Move::castle(side, color));
        }
    }

    // -----------------------------------------------------------------
    // Apply / undo
    // -----------------------------------------------------------------

    /// Play `mv` if it is legal here. Returns `false` and leaves the board
    /// untouched otherwise, including when the game is already over.
    pub fn apply_move(&mut self, mv: &Move) -> bool {
        if self.outcome.is_over() {
            debug!(%mv, outcome = ?self.outcome, "move rejected: game is over");
            return false;
        }
        let piece = match self.piece_at(mv.from()) {
            Some(p) if p.color == self.side_to_move => p,
            _ => {
                debug!(%mv, "move rejected: no piece of the side to move on the origin");
                return false;
            }
        };
        if !self.is_legal(mv) {
            debug!(%mv, "move rejected: not legal");
            return false;
        }

        self.commit(mv, piece);
        true
    }

    fn commit(&mut self, mv: &Move, piece: Piece) {
        let color = piece.color;
        let (from, to) = (mv.from(), mv.to());
        let captured_at = match *mv {
            Move::EnPassant { .. } => Square::new(from.row(), to.col()),
            _ => to,
        };
        let captured = match *mv {
            Move::Castling { .. } => None,
            _ => self.piece_at(captured_at).map(|p| (captured_at, p)),
        };

        let mut record = UndoRecord {
            mv: *mv,
            moved: piece,
            captured,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            outcome: self.outcome,
            termination: self.termination,
            repetition_key: String::new(),
        };
        let mut san = self.san_body(mv, piece);

        self.en_passant = None;
        if piece.kind == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2 {
            self.en_passant = Some(Square::new((from.row() + to.row()) / 2, from.col()));
        }

        match piece.kind {
            PieceKind::King => {
                self.castling_rights.revoke(color, CastleSide::King);
                self.castling_rights.revoke(color, CastleSide::Queen);
            }
            PieceKind::Rook => {
                if let Some((owner, side)) = CastlingRights::corner(from) {
                    if owner == color {
                        self.castling_rights.revoke(owner, side);
                    }
                }
            }
            _ => {}
        }
        if let Some((sq, victim)) = captured {
            if victim.kind == PieceKind::Rook {
                if let Some((owner, side)) = CastlingRights::corner(sq) {
                    self.castling_rights.revoke(owner, side);
                }
            }
        }

        match *mv {
            Move::Regular { .. } => self.relocate(from, to, piece),
            Move::Promotion { kind, .. } => self.relocate(from, to, Piece::new(kind, color)),
            Move::EnPassant { .. } => {
                self.relocate(from, to, piece);
                self.set(captured_at, None);
            }
            Move::Castling { side, .. } => {
                self.relocate(from, to, piece);
                let (rook_from, rook_to) = castle_rook_cols(side);
                let row = color.back_rank();
                let rook = self.squares[row][rook_from];
                self.squares[row][rook_from] = None;
                self.squares[row][rook_to] = rook;
            }
        }

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if color == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = color.opposite();

        let key = self.unclocked_fen();
        *self.repetitions.entry(key.clone()).or_insert(0) += 1;
        record.repetition_key = key;
        self.history.push(record);

        self.update_outcome();
        if self.termination == Some(Termination::Checkmate) {
            san.push('#');
        } else if self.is_in_check() {
            san.push('+');
        }
        trace!(%mv, san = %san, fen = %self.to_fen(), "move applied");
        self.pgn.push(san);
    }

    /// Take back the most recent move. Returns `false` when there is none.
    pub fn undo_last_move(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };

        match self.repetitions.get_mut(&record.repetition_key) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.repetitions.remove(&record.repetition_key);
            }
            None => panic!("repetition table is missing {}", record.repetition_key),
        }

        let (from, to) = (record.mv.from(), record.mv.to());
        self.set(to, None);
        self.set(from, Some(record.moved));
        if let Move::Castling { side, color } = record.mv {
            let (rook_from, rook_to) = castle_rook_cols(side);
            let row = color.back_rank();
            self.squares[row][rook_from] = self.squares[row][rook_to];
            self.squares[row][rook_to] = None;
        }
        if let Some((sq, victim)) = record.captured {
            self.set(sq, Some(victim));
        }

        self.side_to_move = record.moved.color;
        self.castling_rights = record.castling_rights;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.fullmove_number = record.fullmove_number;
        self.outcome = record.outcome;
        self.termination = record.termination;
        self.pgn.pop();
        trace!(mv = %record.mv, "move undone");
        true
    }

    fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row()][sq.col()] = piece;
    }

    fn relocate(&mut self, from: Square, to: Square, piece: Piece) {
        self.set(from, None);
        self.set(to, Some(piece));
    }

    /// SAN text before the check suffix. Piece moves always carry the full
    /// origin square instead of minimal disambiguation.
    fn san_body(&self, mv: &Move, piece: Piece) -> String {
        let mut san = String::with_capacity(8);
        match *mv {
            Move::Castling { side: CastleSide::King, .. } => san.push_str("O-O"),
            Move::Castling { side: CastleSide::Queen, .. } => san.push_str("O-O-O"),
            Move::Regular { from, to, capture } if piece.kind != PieceKind::Pawn => {
                san.push(piece.kind.letter());
                san.push_str(&from.to_string());
                if capture {
                    san.push('x');
                }
                san.push_str(&to.to_string());
            }
            _ => {
                if mv.is_capture() {
                    san.push(mv.from().file_char());
                    san.push('x');
                }
                san.push_str(&mv.to().to_string());
                if let Move::Promotion { kind, .. } = *mv {
                    san.push('=');
                    san.push(kind.letter());
                }
            }
        }
        san
    }

    // -----------------------------------------------------------------
    // Outcome
    // -----------------------------------------------------------------

    fn update_outcome(&mut self) {
        let (outcome, termination) = self.classify();
        if let Some(reason) = termination {
            debug!(?outcome, ?reason, fen = %self.to_fen(), "game over");
        }
        self.outcome = outcome;
        self.termination = termination;
    }

    /// First match wins: no legal move, dead position, fifty-move rule,
    /// threefold repetition.
    fn classify(&self) -> (Outcome, Option<Termination>) {
        if !self.has_legal_move() {
            return if self.is_in_check() {
                (Outcome::win_for(self.side_to_move.opposite()), Some(Termination::Checkmate))
            } else {
                (Outcome::Draw, Some(Termination::Stalemate))
            };
        }
        if self.insufficient_material() {
            return (Outcome::Draw, Some(Termination::InsufficientMaterial));
        }
        if self.halfmove_clock >= 100 {
            return (Outcome::Draw, Some(Termination::FiftyMoveRule));
        }
        if self.repetitions.values().any(|&n| n >= 3) {
            return (Outcome::Draw, Some(Termination::ThreefoldRepetition));
        }
        (Outcome::InProgress, None)
    }

    /// K vs K, K + one minor vs K, or K+B vs K+B with bishops on the same
    /// square colour.
    fn insufficient_material(&self) -> bool {
        let mut others: Vec<(Square, Piece)> = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                if let Some(p) = self.squares[row][col] {
                    if p.kind != PieceKind::King {
                        if others.len() == 2 {
                            return false;
                        }
                        others.push((Square::new(row, col), p));
                    }
                }
            }
        }
        match others.as_slice() {
            [] => true,
            [(_, p)] => p.kind.is_minor(),
            [(a, pa), (b, pb)] => {
                pa.kind == PieceKind::Bishop
                    && pb.kind == PieceKind::Bishop
                    && pa.color != pb.color
                    && a.parity() == b.parity()
            }
            _ => false,
        }
    }
}

/// King count, back-rank pawns and the side not to move being in check.
fn check_position(record: &Fen) -> Result<()> {
    for color in [Color::White, Color::Black] {
        let kings = record
            .squares
            .iter()
            .flatten()
            .filter(|cell| **cell == Some(Piece::new(PieceKind::King, color)))
            .count();
        if kings != 1 {
            return Err(ChessError::IllegalPosition(format!("{color:?} has {kings} kings")));
        }
    }

    for row in [0, 7] {
        if record.squares[row].iter().flatten().any(|p| p.kind == PieceKind::Pawn) {
            return Err(ChessError::IllegalPosition(format!("pawn on rank {}", row + 1)));
        }
    }

    let waiting = record.side_to_move.opposite();
    let king = king_on(&record.squares, waiting);
    if square_attacked_on(&record.squares, king, record.side_to_move) {
        return Err(ChessError::IllegalPosition(format!(
            "{waiting:?} is in check but {:?} is to move",
            record.side_to_move
        )));
    }
    Ok(())
}

fn occupied_by(grid: &Grid, color: Color) -> impl Iterator<Item = Square> + '_ {
    (0..8)
        .flat_map(|row| (0..8).map(move |col| Square::new(row, col)))
        .filter(move |sq| grid[sq.row()][sq.col()].is_some_and(|p| p.color == color))
}

/// Panics if `color` has no king; every board holds exactly one per side.
fn king_on(grid: &Grid, color: Color) -> Square {
    let king = Some(Piece::new(PieceKind::King, color));
    for row in 0..8 {
        for col in 0..8 {
            if grid[row][col] == king {
                return Square::new(row, col);
            }
        }
    }
    panic!("no {color:?} king on the board");
}

fn attacks_on(grid: &Grid, from: Square) -> Vec<Square> {
    let Some(piece) = grid[from.row()][from.col()] else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(16);
    match piece.kind {
        PieceKind::Pawn => {
            for dc in [-1, 1] {
                out.extend(from.offset(piece.color.pawn_dir(), dc));
            }
        }
        PieceKind::Knight => out.extend(KNIGHT_OFFSETS.iter().filter_map(|&(dr, dc)| from.offset(dr, dc))),
        PieceKind::King => out.extend(KING_OFFSETS.iter().filter_map(|&(dr, dc)| from.offset(dr, dc))),
        PieceKind::Bishop => slide(grid, from, &DIAGONAL_DIRS, &mut out),
        PieceKind::Rook => slide(grid, from, &STRAIGHT_DIRS, &mut out),
        PieceKind::Queen => {
            slide(grid, from, &STRAIGHT_DIRS, &mut out);
            slide(grid, from, &DIAGONAL_DIRS, &mut out);
        }
    }
    out
}

fn slide(grid: &Grid, from: Square, dirs: &[(i32, i32)], out: &mut Vec<Square>) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, dc) {
            out.push(next);
            if grid[next.row()][next.col()].is_some() {
                break;
            }
            cur = next;
        }
    }
}

/// Reverse lookup: look outward from `target` for an attacker of each kind.
fn square_attacked_on(grid: &Grid, target: Square, attacker: Color) -> bool {
    let holds = |sq: Square, kind: PieceKind| {
        grid[sq.row()][sq.col()].is_some_and(|p| p.color == attacker && p.kind == kind)
    };
    let leaps_from = |offsets: &[(i32, i32)], kind: PieceKind| {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| target.offset(dr, dc))
            .any(|sq| holds(sq, kind))
    };

    if leaps_from(&KNIGHT_OFFSETS, PieceKind::Knight) || leaps_from(&KING_OFFSETS, PieceKind::King) {
        return true;
    }
    // A pawn attacks from one row behind the target, seen from its own side.
    let back = -attacker.pawn_dir();
    if leaps_from(&[(back, -1), (back, 1)], PieceKind::Pawn) {
        return true;
    }

    for (dirs, slider) in [(STRAIGHT_DIRS, PieceKind::Rook), (DIAGONAL_DIRS, PieceKind::Bishop)] {
        for (dr, dc) in dirs {
            let mut cur = target;
            while let Some(next) = cur.offset(dr, dc) {
                if grid[next.row()][next.col()].is_some() {
                    if holds(next, slider) || holds(next, PieceKind::Queen) {
                        return true;
                    }
                    break;
                }
                cur = next;
            }
        }
    }

    false
}

/// Play `mv` on the scratch grid, test the mover's king, then put every
/// touched square back. `king` is `None` when the king itself is moving.
fn keeps_king_safe(grid: &mut Grid, mv: &Move, piece: Piece, king: Option<Square>) -> bool {
    let (from, to) = (mv.from(), mv.to());
    let victim_at = match *mv {
        Move::EnPassant { .. } => Square::new(from.row(), to.col()),
        _ => to,
    };
    let saved_from = grid[from.row()][from.col()];
    let saved_to = grid[to.row()][to.col()];
    let saved_victim = grid[victim_at.row()][victim_at.col()];

    grid[victim_at.row()][victim_at.col()] = None;
    grid[from.row()][from.col()] = None;
    grid[to.row()][to.col()] = Some(piece);

    let king_sq = king.unwrap_or(to);
    let safe = !square_attacked_on(grid, king_sq, piece.color.opposite());

    grid[to.row()][to.col()] = saved_to;
    grid[victim_at.row()][victim_at.col()] = saved_victim;
    grid[from.row()][from.col()] = saved_from;
    safe
}
