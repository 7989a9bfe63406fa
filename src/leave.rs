// Copyright (C) 2020-2023 Andy Kurnia.

use super::{alphabet, error};
use std::str::FromStr;

// positive means worth keeping, negative means better played now.
// indexed by tile, blank first.
static DEFAULT_TILE_VALUES: [f32; 27] = [
    15.0, // ?
    0.5, -2.0, -0.5, 0.5, 1.5, -2.0, -1.0, 0.5, 0.5, -4.0, // A-J
    -2.5, 1.0, -0.5, 1.5, 0.0, -0.5, -6.0, 2.0, 5.0, 1.0, // K-T
    -0.5, -4.0, -2.5, -1.0, -0.5, -2.0, // U-Z
];

static SYNERGIES: &[(&str, f32)] = &[
    ("ER", 1.5),
    ("ED", 1.0),
    ("ES", 1.5),
    ("EN", 1.0),
    ("IN", 1.5),
    ("AN", 1.0),
    ("AT", 0.5),
    ("ST", 1.5),
    ("RS", 1.0),
    ("EL", 0.5),
    ("ET", 0.5),
    ("ING", 3.5),
    ("ERS", 3.0),
    ("EST", 2.5),
    ("IES", 2.5),
    ("ENT", 2.0),
    ("ATE", 1.5),
    ("ANE", 1.5),
    ("INE", 1.5),
];

const IDEAL_VOWEL_RATIO: f64 = 0.40;
const BALANCE_WEIGHT: f64 = 15.0;
const DUPLICATE_PENALTY: f64 = 3.0;
const TRIPLICATE_PENALTY: f64 = 4.0;
const Q_WITHOUT_U_PENALTY: f64 = 8.0;

// heuristic value of the tiles kept after a play.
pub struct Leave {
    tile_values: Box<[f32]>,
    synergies: Box<[(Box<[u8]>, f32)]>,
    q: Option<u8>,
    u: Option<u8>,
}

impl Leave {
    pub fn new(alphabet: &alphabet::Alphabet) -> Self {
        Self {
            tile_values: (0..alphabet.len())
                .map(|tile| DEFAULT_TILE_VALUES.get(tile as usize).copied().unwrap_or(0.0))
                .collect(),
            synergies: SYNERGIES
                .iter()
                .filter_map(|&(letters, value)| {
                    alphabet
                        .parse_word(letters)
                        .map(|tiles| (tiles.into_boxed_slice(), value))
                })
                .collect(),
            q: alphabet.letter_of_char('Q'),
            u: alphabet.letter_of_char('U'),
        }
    }

    // rows of "tile,value" with no header, '?' for the blank.
    // tiles not mentioned keep their built-in values.
    pub fn from_csv_reader<R: std::io::Read>(
        alphabet: &alphabet::Alphabet,
        reader: R,
    ) -> error::Returns<Self> {
        let mut ret = Self::new(alphabet);
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);
        for result in csv_reader.records() {
            let record = result?;
            if record.len() < 2 {
                return_error!(format!("leave weights: need tile,value, found {record:?}"));
            }
            let tile = match &record[0] {
                "?" => 0,
                s => {
                    let mut chars = s.chars();
                    match (chars.next().and_then(|c| alphabet.letter_of_char(c)), chars.next()) {
                        (Some(tile), None) => tile,
                        _ => {
                            return_error!(format!("leave weights: invalid tile {s:?}"));
                        }
                    }
                }
            };
            ret.tile_values[tile as usize] = f32::from_str(&record[1])?;
        }
        Ok(ret)
    }

    pub fn leave_value_from_tally(&self, alphabet: &alphabet::Alphabet, rack_tally: &[u8]) -> f32 {
        let num_tiles: usize = rack_tally.iter().map(|&c| c as usize).sum();
        if num_tiles == 0 {
            // the sweep bonus already rewards emptying the rack.
            return 0.0;
        }
        let mut value = 0.0f64;
        let mut num_vowels = 0;
        for (tile, &count) in (0u8..).zip(rack_tally) {
            if count == 0 {
                continue;
            }
            value += self.tile_values[tile as usize] as f64 * count as f64;
            if alphabet.is_vowel(tile) {
                num_vowels += count as usize;
            }
            if tile != 0 {
                if count >= 2 {
                    value -= DUPLICATE_PENALTY * (count - 1) as f64;
                }
                if count >= 3 {
                    value -= TRIPLICATE_PENALTY;
                }
            }
        }

        let deviation = num_vowels as f64 / num_tiles as f64 - IDEAL_VOWEL_RATIO;
        value -= BALANCE_WEIGHT * deviation * deviation * num_tiles as f64;

        for (letters, bonus) in self.synergies.iter() {
            if letters.iter().all(|&tile| rack_tally[tile as usize] > 0) {
                value += *bonus as f64;
            }
        }

        if let (Some(q), Some(u)) = (self.q, self.u) {
            if rack_tally[q as usize] > 0 && rack_tally[u as usize] == 0 {
                value -= Q_WITHOUT_U_PENALTY;
            }
        }

        ((value * 10.0).round() / 10.0) as f32
    }

    pub fn evaluate(&self, alphabet: &alphabet::Alphabet, leave: &[u8]) -> f32 {
        let mut rack_tally = vec![0u8; alphabet.len() as usize];
        leave
            .iter()
            .for_each(|&tile| rack_tally[tile as usize] += 1);
        self.leave_value_from_tally(alphabet, &rack_tally)
    }
}
