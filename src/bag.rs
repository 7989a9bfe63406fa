// Copyright (C) 2020-2021 Andy Kurnia. All rights reserved.

use super::{alphabet, board, error};
use rand::prelude::*;

pub struct Bag(pub Vec<u8>);

impl Bag {
    pub fn from_tally(tally: &[u8]) -> Bag {
        Bag(
            (0u8..)
                .zip(tally)
                .flat_map(|(tile, &count)| std::iter::repeat_n(tile, count as usize))
                .collect(),
        )
    }

    // the full distribution, minus the board, minus the known rack.
    pub fn unseen(
        alphabet: &alphabet::Alphabet,
        board: &board::Board,
        known_rack: &[u8],
    ) -> error::Returns<Bag> {
        Ok(Bag::from_tally(&unseen_tally(alphabet, board, known_rack)?))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // uniformly picks amount tiles without replacement and returns them.
    // the bag keeps all its tiles, only their order changes.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R, amount: usize) -> &[u8] {
        let amount = amount.min(self.0.len());
        self.0.partial_shuffle(rng, amount).0
    }
}

pub fn full_tally(alphabet: &alphabet::Alphabet) -> Vec<u8> {
    (0..alphabet.len()).map(|tile| alphabet.freq(tile)).collect()
}

fn take_one(
    alphabet: &alphabet::Alphabet,
    tally: &mut [u8],
    tile: u8,
    source: &str,
) -> error::Returns<()> {
    match tally.get_mut(tile as usize) {
        Some(count) if *count > 0 => {
            *count -= 1;
            Ok(())
        }
        Some(_) => {
            return_error!(format!(
                "too many tile {} on {source} (bag contains only {})",
                alphabet.label(tile).unwrap_or("_"),
                alphabet.freq(tile),
            ));
        }
        None => {
            return_error!(format!("{source} has invalid tile {tile}"));
        }
    }
}

// wildcard tiles on the board use up blanks, not their letters.
pub fn unseen_tally(
    alphabet: &alphabet::Alphabet,
    board: &board::Board,
    known_rack: &[u8],
) -> error::Returns<Vec<u8>> {
    let mut tally = full_tally(alphabet);
    for tile in board.tiles() {
        take_one(alphabet, &mut tally, tile.rack_tile(), "board")?;
    }
    for &tile in known_rack {
        take_one(alphabet, &mut tally, tile, "rack")?;
    }
    Ok(tally)
}
