// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, error, matrix, movegen};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileOrigin {
    Natural,
    Wildcard,
}

// a tile on the board. a wildcard shows a letter but is worth nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardTile {
    pub letter: u8,
    pub origin: TileOrigin,
}

impl BoardTile {
    #[inline(always)]
    pub fn natural(letter: u8) -> Self {
        Self {
            letter,
            origin: TileOrigin::Natural,
        }
    }

    #[inline(always)]
    pub fn wildcard(letter: u8) -> Self {
        Self {
            letter,
            origin: TileOrigin::Wildcard,
        }
    }

    #[inline(always)]
    pub fn is_wildcard(&self) -> bool {
        self.origin == TileOrigin::Wildcard
    }

    // the rack symbol this tile came from: 0 for the blank.
    #[inline(always)]
    pub fn rack_tile(&self) -> u8 {
        match self.origin {
            TileOrigin::Natural => self.letter,
            TileOrigin::Wildcard => 0,
        }
    }

    #[inline(always)]
    pub fn face_value(&self, alphabet: &alphabet::Alphabet) -> i16 {
        alphabet.score(self.rack_tile()) as i16
    }
}

pub struct Board {
    dim: matrix::Dim,
    tiles: Box<[Option<BoardTile>]>,
}

impl Clone for Board {
    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            dim: self.dim,
            tiles: self.tiles.clone(),
        }
    }

    #[inline(always)]
    fn clone_from(&mut self, source: &Self) {
        self.dim = source.dim;
        self.tiles.clone_from(&source.tiles);
    }
}

impl Board {
    pub fn new(dim: matrix::Dim) -> Self {
        Self {
            dim,
            tiles: vec![None; dim.num_cells()].into_boxed_slice(),
        }
    }

    // one string per row. '.' or ' ' is empty, uppercase is a natural tile,
    // lowercase is a blank standing for that letter.
    pub fn from_rows(
        alphabet: &alphabet::Alphabet,
        dim: matrix::Dim,
        rows: &[&str],
    ) -> error::Returns<Self> {
        if rows.len() != dim.rows as usize {
            return_error!(format!(
                "board: need {} rows, found {} rows",
                dim.rows,
                rows.len()
            ));
        }
        let mut board = Self::new(dim);
        for (row, row_str) in (0..).zip(rows.iter()) {
            let num_cols = row_str.chars().count();
            if num_cols != dim.cols as usize {
                return_error!(format!(
                    "board row {row} (0-based): need {} cols, found {num_cols} cols",
                    dim.cols
                ));
            }
            for (col, c) in (0..).zip(row_str.chars()) {
                if c == '.' || c == ' ' {
                    continue;
                }
                let Some(letter) = alphabet.letter_of_char(c) else {
                    return_error!(format!(
                        "board row {row} col {col} (0-based): invalid tile {c:?}"
                    ));
                };
                let tile = if c.is_lowercase() {
                    BoardTile::wildcard(letter)
                } else {
                    BoardTile::natural(letter)
                };
                board.place(row, col, tile)?;
            }
        }
        Ok(board)
    }

    #[inline(always)]
    pub fn dim(&self) -> matrix::Dim {
        self.dim
    }

    #[inline(always)]
    pub fn at(&self, idx: usize) -> Option<BoardTile> {
        self.tiles[idx]
    }

    // off-board coordinates read as empty.
    #[inline(always)]
    pub fn get(&self, row: i8, col: i8) -> Option<BoardTile> {
        if self.dim.contains(row, col) {
            self.tiles[self.dim.at_row_col(row, col)]
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        self.get(row, col).is_some()
    }

    #[inline(always)]
    pub fn is_empty_at(&self, row: i8, col: i8) -> bool {
        !self.is_occupied(row, col)
    }

    pub fn is_board_empty(&self) -> bool {
        self.tiles.iter().all(|t| t.is_none())
    }

    pub fn count_tiles(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    pub fn tiles(&self) -> impl Iterator<Item = BoardTile> + '_ {
        self.tiles.iter().filter_map(|&t| t)
    }

    pub fn place(&mut self, row: i8, col: i8, tile: BoardTile) -> error::Returns<()> {
        if !self.dim.contains(row, col) {
            return_error!(format!("cannot place at ({row},{col}): off the board"));
        }
        let idx = self.dim.at_row_col(row, col);
        if self.tiles[idx].is_some() {
            return_error!(format!("cannot place at ({row},{col}): already occupied"));
        }
        self.tiles[idx] = Some(tile);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tiles.iter_mut().for_each(|t| *t = None);
    }

    // only the tiles the play physically puts down are written.
    pub fn apply_play(&mut self, play: &movegen::Play) -> error::Returns<()> {
        for placed in play.tiles.iter() {
            self.place(placed.row, placed.col, placed.tile)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_config;

    #[test]
    fn clone_does_not_alias() {
        let game_config = game_config::make_crossplay_game_config();
        let dim = game_config.board_layout().dim();
        let mut board = Board::new(dim);
        board.place(7, 7, BoardTile::natural(1)).unwrap();
        let mut copy = board.clone();
        copy.place(7, 8, BoardTile::wildcard(20)).unwrap();
        assert!(board.is_empty_at(7, 8));
        assert_eq!(copy.count_tiles(), 2);
        assert_eq!(board.count_tiles(), 1);
        assert!(copy.get(7, 8).unwrap().is_wildcard());
    }

    #[test]
    fn place_rejects_bad_cells() {
        let game_config = game_config::make_crossplay_game_config();
        let mut board = Board::new(game_config.board_layout().dim());
        assert!(board.place(15, 0, BoardTile::natural(1)).is_err());
        board.place(0, 0, BoardTile::natural(1)).unwrap();
        assert!(board.place(0, 0, BoardTile::natural(2)).is_err());
        assert!(board.is_empty_at(-1, 0));
    }

    #[test]
    fn from_rows_reads_blanks() {
        let game_config = game_config::make_crossplay_game_config();
        let alphabet = game_config.alphabet();
        let dim = game_config.board_layout().dim();
        let mut rows = vec!["..............."; 15];
        rows[7] = "......CaT......";
        let board = Board::from_rows(alphabet, dim, &rows).unwrap();
        assert_eq!(board.get(7, 6), Some(BoardTile::natural(3)));
        assert_eq!(board.get(7, 7), Some(BoardTile::wildcard(1)));
        assert_eq!(board.get(7, 7).unwrap().face_value(alphabet), 0);
        assert_eq!(board.get(7, 8).unwrap().face_value(alphabet), 1);
        rows[7] = "......CAT.....";
        assert!(Board::from_rows(alphabet, dim, &rows).is_err());
    }
}
