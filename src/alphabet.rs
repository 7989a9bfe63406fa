// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;

pub struct Tile<'a> {
    label: &'a str,
    blank_label: &'a str,
    freq: u8,
    score: i8,
    is_vowel: bool,
}

const fn tile<'a>(
    label: &'a str,
    blank_label: &'a str,
    freq: u8,
    score: i8,
    is_vowel: bool,
) -> Tile<'a> {
    Tile {
        label,
        blank_label,
        freq,
        score,
        is_vowel,
    }
}

pub struct StaticAlphabet<'a> {
    tiles: &'a [Tile<'a>],
    num_tiles: u16,
}

// tile 0 is the blank. tiles 1..len() are the natural letters.
pub enum Alphabet<'a> {
    Static(StaticAlphabet<'a>),
}

impl<'a> Alphabet<'a> {
    #[inline(always)]
    pub fn len(&self) -> u8 {
        match self {
            Alphabet::Static(x) => x.tiles.len() as u8,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    fn get(&self, idx: u8) -> &'a Tile<'a> {
        match self {
            Alphabet::Static(x) => &x.tiles[idx as usize],
        }
    }

    #[inline(always)]
    pub fn num_tiles(&self) -> u16 {
        match self {
            Alphabet::Static(x) => x.num_tiles,
        }
    }

    #[inline(always)]
    pub fn label(&self, idx: u8) -> Option<&'a str> {
        if idx >= self.len() {
            None
        } else {
            Some(self.get(idx).label)
        }
    }

    #[inline(always)]
    pub fn blank_label(&self, idx: u8) -> Option<&'a str> {
        if idx == 0 || idx >= self.len() {
            None
        } else {
            Some(self.get(idx).blank_label)
        }
    }

    // face value. the blank is worth whatever tile 0 says, which is 0.
    #[inline(always)]
    pub fn score(&self, idx: u8) -> i8 {
        self.get(idx).score
    }

    #[inline(always)]
    pub fn is_vowel(&self, idx: u8) -> bool {
        self.get(idx).is_vowel
    }

    #[inline(always)]
    pub fn freq(&self, idx: u8) -> u8 {
        self.get(idx).freq
    }

    // 'A'..='Z' and 'a'..='z' map to the same natural tile.
    pub fn letter_of_char(&self, c: char) -> Option<u8> {
        let upper = c.to_ascii_uppercase();
        let mut buf = [0u8; 4];
        let s = upper.encode_utf8(&mut buf);
        (1..self.len()).find(|&idx| self.get(idx).label == s)
    }

    // rack symbols: letters in either case, '?' for the blank.
    pub fn parse_rack(&self, rack: &str) -> error::Returns<Vec<u8>> {
        let mut v = Vec::with_capacity(rack.len());
        for c in rack.chars() {
            if c.is_whitespace() {
                continue;
            }
            if c == '?' {
                v.push(0);
            } else if let Some(tile) = self.letter_of_char(c) {
                v.push(tile);
            } else {
                return_error!(format!("invalid tile {c:?} in rack {rack:?}"));
            }
        }
        Ok(v)
    }

    // uppercase word into natural tiles. used for the lexicon and cross-checks.
    pub fn parse_word(&self, word: &str) -> Option<Vec<u8>> {
        word.chars().map(|c| self.letter_of_char(c)).collect()
    }

    pub fn fmt_rack(&self, rack: &[u8]) -> String {
        let mut s = String::with_capacity(rack.len());
        for &tile in rack {
            s.push_str(self.label(tile).unwrap_or("_"));
        }
        s
    }

    pub fn fmt_word(&self, word: &[u8]) -> String {
        self.fmt_rack(word)
    }
}

static CROSSPLAY_TILES: [Tile<'static>; 27] = [
    tile("?", "?", 3, 0, false),
    tile("A", "a", 9, 1, true),
    tile("B", "b", 2, 3, false),
    tile("C", "c", 2, 3, false),
    tile("D", "d", 4, 2, false),
    tile("E", "e", 12, 1, true),
    tile("F", "f", 2, 4, false),
    tile("G", "g", 3, 2, false),
    tile("H", "h", 3, 4, false),
    tile("I", "i", 8, 1, true),
    tile("J", "j", 1, 8, false),
    tile("K", "k", 1, 5, false),
    tile("L", "l", 4, 1, false),
    tile("M", "m", 2, 3, false),
    tile("N", "n", 5, 1, false),
    tile("O", "o", 8, 1, true),
    tile("P", "p", 2, 3, false),
    tile("Q", "q", 1, 10, false),
    tile("R", "r", 6, 1, false),
    tile("S", "s", 5, 1, false),
    tile("T", "t", 6, 1, false),
    tile("U", "u", 3, 1, true),
    tile("V", "v", 2, 4, false),
    tile("W", "w", 2, 4, false),
    tile("X", "x", 1, 8, false),
    tile("Y", "y", 2, 4, false),
    tile("Z", "z", 1, 10, false),
];

pub fn make_crossplay_alphabet<'a>() -> Alphabet<'a> {
    Alphabet::Static(StaticAlphabet {
        tiles: &CROSSPLAY_TILES,
        num_tiles: 100,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_adds_up() {
        let alphabet = make_crossplay_alphabet();
        let total: u16 = (0..alphabet.len()).map(|t| alphabet.freq(t) as u16).sum();
        assert_eq!(total, alphabet.num_tiles());
        assert_eq!(alphabet.len(), 27);
        assert_eq!(alphabet.score(0), 0);
        assert_eq!(alphabet.score(17), 10); // Q
    }

    #[test]
    fn parse_rack_accepts_blanks_and_lowercase() {
        let alphabet = make_crossplay_alphabet();
        assert_eq!(alphabet.parse_rack("cAt?").unwrap(), vec![3, 1, 20, 0]);
        assert!(alphabet.parse_rack("CA7").is_err());
        assert_eq!(alphabet.fmt_rack(&[3, 1, 20, 0]), "CAT?");
    }
}
