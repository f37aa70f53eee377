use std::fmt;

use serde::{Deserialize, Serialize};

/// A board square. Row 0 = rank 1, col 0 = file a, matching the
/// `squares[row][col]` layout of the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Panics if either coordinate is outside 0..8; passing one is a
    /// programming error, not bad input.
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < 8 && col < 8, "square out of range: ({row}, {col})");
        Square { row: row as u8, col: col as u8 }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// The square `(dr, dc)` away, or `None` if that leaves the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        let r = self.row as i32 + dr;
        let c = self.col as i32 + dc;
        if (0..8).contains(&r) && (0..8).contains(&c) {
            Some(Square { row: r as u8, col: c as u8 })
        } else {
            None
        }
    }

    /// Light and dark squares have different parities.
    pub fn parity(self) -> usize {
        (self.row() + self.col()) % 2
    }

    /// Parse `"e4"` style coordinates. Only lower-case files are accepted.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = file_index(bytes[0] as char)?;
        let row = rank_index(bytes[1] as char)?;
        Some(Square::new(row, col))
    }

    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.row) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// `'a'..='h'` to a column index.
pub fn file_index(c: char) -> Option<usize> {
    ('a'..='h').contains(&c).then(|| c as usize - 'a' as usize)
}

/// `'1'..='8'` to a row index.
pub fn rank_index(c: char) -> Option<usize> {
    ('1'..='8').contains(&c).then(|| c as usize - '1' as usize)
}
