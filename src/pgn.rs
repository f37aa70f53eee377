//! Move-text transcript of a game.
//!
//! Only the move list and result token are produced; there are no tag pairs.

use serde::{Deserialize, Serialize};

use crate::piece::Color;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Pgn {
    start_number: u32,
    start_side: Color,
    moves: Vec<String>,
}

impl Pgn {
    /// A game resumed at move `start_number` with `start_side` to play.
    pub fn new(start_number: u32, start_side: Color) -> Self {
        Pgn { start_number, start_side, moves: Vec::new() }
    }

    pub fn push(&mut self, san: String) {
        self.moves.push(san);
    }

    pub fn pop(&mut self) -> Option<String> {
        self.moves.pop()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// `1. e4 e5 2. Ng1f3 *`. A game that starts with black opens with
    /// `N...`.
    pub fn render(&self, result: &str) -> String {
        let mut out = String::with_capacity(self.moves.len() * 8 + 8);
        let mut number = self.start_number;
        let mut side = self.start_side;

        for (i, san) in self.moves.iter().enumerate() {
            match side {
                Color::White => out.push_str(&format!("{number}. ")),
                Color::Black if i == 0 => out.push_str(&format!("{number}... ")),
                Color::Black => {}
            }
            out.push_str(san);
            out.push(' ');

            if side == Color::Black {
                number += 1;
            }
            side = side.opposite();
        }

        out.push_str(result);
        out
    }
}
