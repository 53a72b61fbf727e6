//! This module defines the `Tape` struct: one unbounded, independently headed sequence of
//! symbols belonging to a single run.
//!
//! Cells are kept in a `VecDeque` together with the logical position of its first element
//! (the origin). Positions are logical and may be negative, so growing the tape on the
//! left is an O(1) `push_front` plus an origin adjustment and never shifts the head.

use std::collections::VecDeque;
use std::fmt;

use crate::types::{Direction, Symbol, PADDING};

/// An unbounded tape with a read/write head.
///
/// | _ | a | b | c | _ |  cells
///  -1   0   1   2   3    logical position
///
/// Every position outside the materialized range reads as the blank symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    origin: i64,
    head: i64,
    blank: Symbol,
}

impl Tape {
    /// Creates an empty tape with its head at position 0.
    pub fn new(blank: Symbol) -> Self {
        Self {
            cells: VecDeque::new(),
            origin: 0,
            head: 0,
            blank,
        }
    }

    /// Creates a tape holding `symbols` from position 0 onwards, head at position 0.
    pub fn with_content<I>(blank: Symbol, symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        Self {
            cells: symbols.into_iter().collect(),
            origin: 0,
            head: 0,
            blank,
        }
    }

    /// Returns the symbol at `pos`, or the blank symbol if `pos` was never materialized.
    pub fn get(&self, pos: i64) -> Symbol {
        self.index(pos)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or(self.blank)
    }

    /// Stores `symbol` at `pos`, materializing cells as needed, and returns the position
    /// written.
    ///
    /// Growing to the left puts `symbol` itself into the new front cell; the gap between
    /// it and the old front, if any, is filled with blanks.
    ///
    /// Every position between `pos` and the materialized range is allocated, so writes are
    /// bounded by memory rather than by the `i64` range. A run moves each head by at most one
    /// cell per step, which keeps its writes next to the materialized range.
    pub fn set(&mut self, pos: i64, symbol: Symbol) -> i64 {
        if pos < self.origin {
            while self.origin > pos + 1 {
                self.cells.push_front(self.blank);
                self.origin -= 1;
            }
            self.cells.push_front(symbol);
            self.origin = pos;
            return pos;
        }

        // pos >= origin here; abs_diff cannot overflow even for a negative origin
        let offset = pos.abs_diff(self.origin) as usize;
        if offset >= self.cells.len() {
            self.cells.resize(offset.saturating_add(1), self.blank);
        }
        self.cells[offset] = symbol;

        pos
    }

    /// Reads the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.get(self.head)
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.head = self.set(self.head, symbol);
    }

    /// Moves the head one cell in `direction`.
    pub fn shift(&mut self, direction: Direction) {
        self.head += direction.offset();
    }

    /// Grows the tape so that at least `PADDING` blank cells lead and trail the materialized
    /// range, and the head has at least `PADDING` materialized cells on either side.
    ///
    /// Only blanks are ever added, so the symbol at every logical position is unchanged.
    pub fn enforce_padding(&mut self) {
        let pad = PADDING as i64;

        let leading = self.count_blanks(self.cells.iter());
        for _ in leading..PADDING {
            self.cells.push_front(self.blank);
            self.origin -= 1;
        }
        while self.head - self.origin < pad {
            self.cells.push_front(self.blank);
            self.origin -= 1;
        }

        let trailing = self.count_blanks(self.cells.iter().rev());
        for _ in trailing..PADDING {
            self.cells.push_back(self.blank);
        }
        while self.upper() - self.head < pad {
            self.cells.push_back(self.blank);
        }
    }

    /// Current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// The blank symbol of this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// The inclusive range of materialized positions, or `None` for an empty tape.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        (!self.cells.is_empty()).then(|| (self.origin, self.upper()))
    }

    /// Number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the materialized cells from the lowest position upwards.
    pub fn cells(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.cells.iter().copied()
    }

    /// The materialized cells as a string, blanks included.
    pub fn contents(&self) -> String {
        self.cells.iter().collect()
    }

    /// The materialized cells with leading and trailing blanks removed.
    pub fn trimmed(&self) -> String {
        let blank = self.blank;
        self.contents()
            .trim_matches(|c: char| c == blank)
            .to_string()
    }

    /// Index into `cells` for a logical position, if it lies at or after the origin.
    fn index(&self, pos: i64) -> Option<usize> {
        pos.checked_sub(self.origin)
            .and_then(|offset| usize::try_from(offset).ok())
    }

    /// Highest materialized position (one below the origin for an empty tape).
    fn upper(&self) -> i64 {
        self.origin + self.cells.len() as i64 - 1
    }

    /// Counts blanks at the start of `cells`, stopping once `PADDING` is reached.
    fn count_blanks<'a>(&self, cells: impl Iterator<Item = &'a Symbol>) -> usize {
        cells
            .take(PADDING)
            .take_while(|&&symbol| symbol == self.blank)
            .count()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_outside_range_is_blank() {
        let tape = Tape::with_content('_', "ab".chars());

        assert_eq!(tape.get(-5), '_');
        assert_eq!(tape.get(0), 'a');
        assert_eq!(tape.get(1), 'b');
        assert_eq!(tape.get(2), '_');
        assert_eq!(tape.get(i64::MAX), '_');
        assert_eq!(tape.get(i64::MIN), '_');
    }

    #[test]
    fn test_write_extends_right_with_blanks() {
        let mut tape = Tape::with_content('_', "ab".chars());

        assert_eq!(tape.set(5, 'x'), 5);
        assert_eq!(tape.contents(), "ab___x");
        assert_eq!(tape.bounds(), Some((0, 5)));
    }

    #[test]
    fn test_far_positions_around_negative_origin() {
        let mut tape = Tape::new('_');
        tape.set(-3, 'a');

        assert_eq!(tape.get(i64::MAX), '_');
        assert_eq!(tape.get(i64::MIN), '_');

        assert_eq!(tape.set(4, 'z'), 4);
        assert_eq!(tape.contents(), "a______z");
        assert_eq!(tape.bounds(), Some((-3, 4)));
        assert_eq!(tape.get(-3), 'a');
        assert_eq!(tape.get(4), 'z');
    }

    #[test]
    fn test_write_left_keeps_written_symbol() {
        let mut tape = Tape::with_content('_', "ab".chars());

        assert_eq!(tape.set(-1, 'x'), -1);
        assert_eq!(tape.get(-1), 'x');
        assert_eq!(tape.contents(), "xab");
        assert_eq!(tape.bounds(), Some((-1, 1)));

        // A gap further left is filled with blanks.
        tape.set(-4, 'y');
        assert_eq!(tape.contents(), "y__xab");
        assert_eq!(tape.get(0), 'a');
    }

    #[test]
    fn test_left_move_then_write_on_fresh_tape() {
        let mut tape = Tape::new('_');

        tape.shift(Direction::Left);
        tape.write('X');

        assert_eq!(tape.head(), -1);
        assert_eq!(tape.read(), 'X');
        assert_eq!(tape.trimmed(), "X");
    }

    #[test]
    fn test_shift() {
        let mut tape = Tape::new('_');

        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        tape.shift(Direction::Stay);
        tape.shift(Direction::Left);

        assert_eq!(tape.head(), 1);
        assert!(tape.is_empty());
    }

    #[test]
    fn test_enforce_padding_adds_blanks() {
        let mut tape = Tape::with_content('_', "101".chars());
        tape.enforce_padding();

        assert_eq!(tape.contents(), "__101__");
        assert_eq!(tape.bounds(), Some((-2, 4)));
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), '1');
    }

    #[test]
    fn test_enforce_padding_never_trims() {
        let mut tape = Tape::with_content('_', "____a____".chars());
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);

        tape.enforce_padding();

        assert_eq!(tape.contents(), "____a____");
        assert_eq!(tape.read(), 'a');
    }

    #[test]
    fn test_enforce_padding_follows_head() {
        let mut tape = Tape::new('_');
        tape.enforce_padding();
        assert_eq!(tape.bounds(), Some((-2, 2)));

        for _ in 0..3 {
            tape.shift(Direction::Left);
        }
        tape.enforce_padding();

        assert_eq!(tape.bounds(), Some((-5, 2)));
        assert_eq!(tape.trimmed(), "");
    }

    #[test]
    fn test_trimmed() {
        let tape = Tape::with_content('B', "BB1B0BB".chars());

        assert_eq!(tape.trimmed(), "1B0");
        assert_eq!(tape.to_string(), "BB1B0BB");
        assert_eq!(tape.len(), 7);
    }
}
