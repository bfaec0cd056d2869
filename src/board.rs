// src/board.rs
// This module handles the 5x5 player board and the line-completion check for the Bingo game.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::defs::{
    BOARD_SIZE, FIRSTNUMBER, LASTNUMBER, MARKED_DISPLAY, MARKED_STATE, Number, WINNING_LINES,
};
use crate::error::{GameError, GameResult};

pub type Grid<T> = [[T; BOARD_SIZE]; BOARD_SIZE];

type Line = [(usize, usize); BOARD_SIZE];

/// Persisted form of a board: row-major strings, either the cell number or "x" once called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState(pub Vec<Vec<String>>);

// This struct represents one player's board: the shuffled numbers and which of them were called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: Grid<Number>,
    marked: Grid<bool>,
    generated: bool,
}

// Rows first, then columns, then the two diagonals.
fn candidate_lines() -> impl Iterator<Item = Line> {
    let rows = (0..BOARD_SIZE).map(|r| std::array::from_fn::<_, BOARD_SIZE, _>(|c| (r, c)));
    let cols = (0..BOARD_SIZE).map(|c| std::array::from_fn::<_, BOARD_SIZE, _>(|r| (r, c)));
    let diagonals = [
        std::array::from_fn::<_, BOARD_SIZE, _>(|i| (i, i)),
        std::array::from_fn::<_, BOARD_SIZE, _>(|i| (i, BOARD_SIZE - 1 - i)),
    ];
    rows.chain(cols).chain(diagonals)
}

impl Board {
    /// An empty board. It must be generated or restored before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffle 1..=25 into the grid using the thread-local generator and clear all marks.
    pub fn generate(&mut self) {
        self.generate_with(&mut rand::rng());
    }

    pub fn generate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut numbers: Vec<Number> = (FIRSTNUMBER..=LASTNUMBER).collect();
        numbers.shuffle(rng);

        for (index, number) in numbers.into_iter().enumerate() {
            self.cells[index / BOARD_SIZE][index % BOARD_SIZE] = number;
        }
        self.marked = Grid::default();
        self.generated = true;
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn cells(&self) -> &Grid<Number> {
        &self.cells
    }

    pub fn marks(&self) -> &Grid<bool> {
        &self.marked
    }

    fn ensure_generated(&self) -> GameResult<()> {
        if self.generated {
            Ok(())
        } else {
            Err(GameError::BoardNotGenerated)
        }
    }

    pub fn position_of(&self, number: Number) -> Option<(usize, usize)> {
        if !self.generated {
            return None;
        }
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
            .find(|&(row, col)| self.cells[row][col] == number)
    }

    pub fn is_marked(&self, number: Number) -> bool {
        self.position_of(number)
            .is_some_and(|(row, col)| self.marked[row][col])
    }

    /// Mark `number` if the board holds it. Returns false, leaving the marks untouched,
    /// when the number is not on this board.
    pub fn mark(&mut self, number: Number) -> GameResult<bool> {
        self.ensure_generated()?;
        match self.position_of(number) {
            Some((row, col)) => {
                self.marked[row][col] = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Count of fully marked rows, columns and diagonals (`CANDIDATE_LINES` candidates).
    pub fn completed_lines(&self) -> GameResult<usize> {
        self.ensure_generated()?;
        Ok(candidate_lines()
            .filter(|line| line.iter().all(|&(row, col)| self.marked[row][col]))
            .count())
    }

    /// Completed lines together with the win predicate. A board wins with five or more
    /// completed lines; a single line is not enough.
    pub fn has_bingo(&self) -> GameResult<(usize, bool)> {
        let lines = self.completed_lines()?;
        Ok((lines, lines >= WINNING_LINES))
    }

    /// Text form of the board, called cells shown as "X".
    pub fn render(&self) -> GameResult<String> {
        self.render_with(&format!("{MARKED_DISPLAY:>3}"))
    }

    /// Like [`Board::render`], writing `marked_cell` as is for every called cell.
    /// Uncalled numbers are right-aligned to width 3.
    pub fn render_with(&self, marked_cell: &str) -> GameResult<String> {
        self.ensure_generated()?;
        let mut out = String::new();
        for (cells, marks) in self.cells.iter().zip(&self.marked) {
            for (number, &marked) in cells.iter().zip(marks) {
                if marked {
                    out.push_str(marked_cell);
                } else {
                    let _ = write!(out, "{number:>3}");
                }
            }
            out.push('\n');
        }
        Ok(out)
    }

    pub fn serialize_state(&self) -> GameResult<BoardState> {
        self.ensure_generated()?;
        let rows = self
            .cells
            .iter()
            .zip(&self.marked)
            .map(|(cells, marks)| {
                cells
                    .iter()
                    .zip(marks)
                    .map(|(number, &marked)| {
                        if marked {
                            MARKED_STATE.to_string()
                        } else {
                            number.to_string()
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(BoardState(rows))
    }

    /// Rebuild a board from its full number grid and mark grid.
    pub fn restore_state(rows: Grid<Number>, marks: Grid<bool>) -> GameResult<Self> {
        let seen: BTreeSet<Number> = rows.iter().flatten().copied().collect();
        let in_range = seen
            .iter()
            .all(|number| (FIRSTNUMBER..=LASTNUMBER).contains(number));
        if seen.len() != BOARD_SIZE * BOARD_SIZE || !in_range {
            return Err(GameError::InvalidBoard(format!(
                "cells must hold each number {FIRSTNUMBER}..={LASTNUMBER} exactly once"
            )));
        }

        Ok(Self {
            cells: rows,
            marked: marks,
            generated: true,
        })
    }

    /// Decode the persisted form. Called cells lost their numbers in the encoding, so the
    /// numbers absent from the uncalled cells are assigned to them in ascending order,
    /// row-major.
    pub fn from_state(state: &BoardState) -> GameResult<Self> {
        let BoardState(rows) = state;
        if rows.len() != BOARD_SIZE || rows.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(GameError::InvalidBoard(format!(
                "expected {BOARD_SIZE} rows of {BOARD_SIZE} entries"
            )));
        }

        let mut cells: Grid<Option<Number>> = Grid::default();
        let mut marks: Grid<bool> = Grid::default();
        let mut uncalled = BTreeSet::new();

        for (r, row) in rows.iter().enumerate() {
            for (c, entry) in row.iter().enumerate() {
                let entry = entry.trim();
                if entry.eq_ignore_ascii_case(MARKED_STATE) {
                    marks[r][c] = true;
                    continue;
                }
                let number: Number = entry
                    .parse()
                    .map_err(|_| GameError::InvalidBoard(format!("bad cell value {entry:?}")))?;
                if !(FIRSTNUMBER..=LASTNUMBER).contains(&number) || !uncalled.insert(number) {
                    return Err(GameError::InvalidBoard(format!(
                        "cell value {number} is out of range or repeated"
                    )));
                }
                cells[r][c] = Some(number);
            }
        }

        let mut missing = (FIRSTNUMBER..=LASTNUMBER).filter(|number| !uncalled.contains(number));
        let mut full: Grid<Number> = Grid::default();
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                full[r][c] = match cells[r][c] {
                    Some(number) => number,
                    None => missing
                        .next()
                        .ok_or_else(|| GameError::InvalidBoard("too many called cells".into()))?,
                };
            }
        }

        Self::restore_state(full, marks)
    }

    /// Numbers that have been called on this board, ascending.
    pub fn called_numbers(&self) -> Vec<Number> {
        let mut called: Vec<Number> = self
            .cells
            .iter()
            .flatten()
            .zip(self.marked.iter().flatten())
            .filter(|&(_, &marked)| marked)
            .map(|(&number, _)| number)
            .collect();
        called.sort_unstable();
        called
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::CANDIDATE_LINES;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_board(seed: u64) -> Board {
        let mut board = Board::new();
        board.generate_with(&mut StdRng::seed_from_u64(seed));
        board
    }

    fn sorted_cells(board: &Board) -> Vec<Number> {
        let mut numbers: Vec<Number> = board.cells().iter().flatten().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    proptest! {
        #[test]
        fn test_generated_board_is_permutation(seed in any::<u64>()) {
            let board = seeded_board(seed);
            let expected: Vec<Number> = (FIRSTNUMBER..=LASTNUMBER).collect();
            prop_assert_eq!(sorted_cells(&board), expected);
            prop_assert!(board.marks().iter().flatten().all(|&m| !m));
        }

        #[test]
        fn test_mark_absent_number_is_noop(seed in any::<u64>(), number in 26u8..=255) {
            let mut board = seeded_board(seed);
            board.mark(3).unwrap();
            let before = board.clone();
            prop_assert!(!board.mark(number).unwrap());
            prop_assert_eq!(board, before);
        }
    }

    #[test]
    fn test_thread_rng_boards_differ() {
        let mut first = Board::new();
        let mut second = Board::new();
        first.generate();
        second.generate();
        // 1 in 25! chance of a false failure
        assert_ne!(first.cells(), second.cells());
    }

    #[test]
    fn test_ungenerated_board_is_rejected() {
        let mut board = Board::new();
        assert!(matches!(board.mark(1), Err(GameError::BoardNotGenerated)));
        assert!(matches!(board.has_bingo(), Err(GameError::BoardNotGenerated)));
        assert!(board.render().is_err());
        assert!(board.serialize_state().is_err());
    }

    #[test]
    fn test_mark_zero_returns_false() {
        let mut board = seeded_board(1);
        assert!(!board.mark(0).unwrap());
        assert!(board.called_numbers().is_empty());
    }

    #[test]
    fn test_all_marked_is_bingo() {
        let mut board = seeded_board(7);
        for number in FIRSTNUMBER..=LASTNUMBER {
            assert!(board.mark(number).unwrap());
        }
        assert_eq!(board.has_bingo().unwrap(), (CANDIDATE_LINES, true));
    }

    #[test]
    fn test_candidate_lines_cover_rows_columns_diagonals() {
        let lines: Vec<Line> = candidate_lines().collect();
        assert_eq!(lines.len(), CANDIDATE_LINES);
        let distinct: BTreeSet<Line> = lines.iter().copied().collect();
        assert_eq!(distinct.len(), CANDIDATE_LINES);
        assert!(lines.contains(&[(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]));
    }

    #[test]
    fn test_single_row_is_not_bingo() {
        let mut board = seeded_board(11);
        let first_row = board.cells()[0];
        for number in first_row {
            board.mark(number).unwrap();
        }
        assert_eq!(board.has_bingo().unwrap(), (1, false));
    }

    #[test]
    fn test_five_lines_is_bingo_four_is_not() {
        let mut board = seeded_board(5);
        let cells = *board.cells();
        // rows 0..4 one at a time
        for (done, row) in cells.iter().enumerate() {
            for &number in row {
                board.mark(number).unwrap();
            }
            let (lines, bingo) = board.has_bingo().unwrap();
            if done < 4 {
                assert_eq!(lines, done + 1);
                assert!(!bingo);
            }
        }
        // all five rows complete every column and both diagonals too
        assert_eq!(board.has_bingo().unwrap(), (CANDIDATE_LINES, true));
    }

    #[test]
    fn test_columns_and_diagonals_count() {
        let mut board = seeded_board(9);
        let cells = *board.cells();
        for r in 0..BOARD_SIZE {
            board.mark(cells[r][0]).unwrap();
            board.mark(cells[r][r]).unwrap();
            board.mark(cells[r][BOARD_SIZE - 1 - r]).unwrap();
        }
        // column 0, both diagonals
        assert_eq!(board.completed_lines().unwrap(), 3);
    }

    #[test]
    fn test_render_shows_marks() {
        let mut board = seeded_board(3);
        let first = board.cells()[0][0];
        board.mark(first).unwrap();
        let rendered = board.render().unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), BOARD_SIZE);
        assert!(lines[0].starts_with("  X"));
        assert_eq!(lines[1].len(), 3 * BOARD_SIZE);

        let styled = board.render_with("[*]").unwrap();
        assert!(styled.starts_with("[*]"));
        assert_eq!(styled.lines().nth(1), Some(lines[1]));
    }

    #[test]
    fn test_restore_state_round_trip() {
        let mut board = seeded_board(21);
        for number in [4, 9, 16, 25] {
            board.mark(number).unwrap();
        }
        let restored = Board::restore_state(*board.cells(), *board.marks()).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_restore_state_rejects_duplicates() {
        let mut rows = *seeded_board(2).cells();
        rows[0][0] = rows[0][1];
        assert!(matches!(
            Board::restore_state(rows, Grid::default()),
            Err(GameError::InvalidBoard(_))
        ));
    }

    #[test]
    fn test_serialized_state_round_trip() {
        let mut board = seeded_board(42);
        for number in [1, 2, 3, 13, 24] {
            board.mark(number).unwrap();
        }
        let state = board.serialize_state().unwrap();
        assert_eq!(state.0.len(), BOARD_SIZE);
        assert_eq!(state.0.iter().flatten().filter(|e| *e == "x").count(), 5);

        let decoded = Board::from_state(&state).unwrap();
        assert_eq!(decoded.marks(), board.marks());
        assert_eq!(decoded.render().unwrap(), board.render().unwrap());
        assert_eq!(decoded.called_numbers(), vec![1, 2, 3, 13, 24]);
        assert_eq!(decoded.serialize_state().unwrap(), state);
        assert_eq!(sorted_cells(&decoded), (FIRSTNUMBER..=LASTNUMBER).collect::<Vec<_>>());
    }

    #[test]
    fn test_state_json_shape() {
        let board = seeded_board(8);
        let json = serde_json::to_value(board.serialize_state().unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.as_array().unwrap().len() == 5));
        assert!(rows[0][0].is_string());
    }

    #[test]
    fn test_from_state_rejects_bad_shape_and_values() {
        let short = BoardState(vec![vec!["1".into(); 5]; 4]);
        assert!(Board::from_state(&short).is_err());

        let mut state = seeded_board(4).serialize_state().unwrap();
        state.0[2][2] = "banana".into();
        assert!(Board::from_state(&state).is_err());

        let mut state = seeded_board(4).serialize_state().unwrap();
        state.0[0][0] = state.0[0][1].clone();
        assert!(Board::from_state(&state).is_err());
    }
}
