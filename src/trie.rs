// Copyright (C) 2020-2023 Andy Kurnia.

use super::{alphabet, error};

// one arc of the trie packed into a u32:
// tile in the top byte, then accepts, is_end, and the index of the first
// arc of the target node's sibling run.
#[derive(Clone, Copy)]
pub struct Node(u32);

impl Node {
    #[inline(always)]
    fn new(tile: u8, accepts: bool, is_end: bool, arc_index: u32) -> Self {
        Node(
            (tile as u32) << 24
                | (accepts as u32) << 23
                | (is_end as u32) << 22
                | (arc_index & 0x3fffff),
        )
    }

    #[inline(always)]
    pub fn tile(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline(always)]
    pub fn accepts(&self) -> bool {
        self.0 & 0x800000 != 0
    }

    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.0 & 0x400000 != 0
    }

    #[inline(always)]
    pub fn arc_index(&self) -> i32 {
        (self.0 & 0x3fffff) as i32
    }
}

pub const MIN_WORD_LEN: usize = 2;
pub const MAX_WORD_LEN: usize = 15;
const MAX_NODES: usize = 0x3fffff;

// immutable once built. node 0 is the root sentinel.
pub struct Trie {
    nodes: Box<[Node]>,
    num_words: usize,
}

impl std::ops::Index<i32> for Trie {
    type Output = Node;

    #[inline(always)]
    fn index(&self, i: i32) -> &Node {
        &self.nodes[i as usize]
    }
}

struct BuilderNode {
    children: Vec<(u8, usize)>,
    accepts: bool,
}

impl Trie {
    pub const ROOT: i32 = 0;

    // words that are not entirely letters, or whose length cannot fit on the
    // board, are skipped.
    pub fn from_words<I, S>(alphabet: &alphabet::Alphabet, words: I) -> error::Returns<Trie>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = vec![BuilderNode {
            children: Vec::new(),
            accepts: false,
        }];
        let mut num_words = 0;
        for word in words {
            let word = word.as_ref().trim();
            let len = word.chars().count();
            if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
                continue;
            }
            let Some(tiles) = alphabet.parse_word(word) else {
                continue;
            };
            let mut b = 0;
            for &tile in &tiles {
                b = match builder[b].children.iter().find(|&&(t, _)| t == tile) {
                    Some(&(_, child)) => child,
                    None => {
                        let child = builder.len();
                        builder.push(BuilderNode {
                            children: Vec::new(),
                            accepts: false,
                        });
                        builder[b].children.push((tile, child));
                        child
                    }
                };
            }
            if !builder[b].accepts {
                builder[b].accepts = true;
                num_words += 1;
            }
        }
        for node in builder.iter_mut() {
            node.children.sort_unstable_by_key(|&(tile, _)| tile);
        }

        // lay out each sibling run contiguously, breadth-first.
        let mut run_start = vec![0usize; builder.len()];
        let mut order = Vec::with_capacity(builder.len());
        order.push(0);
        let mut num_nodes = 1;
        let mut i = 0;
        while i < order.len() {
            let b = order[i];
            i += 1;
            if !builder[b].children.is_empty() {
                run_start[b] = num_nodes;
                num_nodes += builder[b].children.len();
                order.extend(builder[b].children.iter().map(|&(_, child)| child));
            }
        }
        if num_nodes > MAX_NODES {
            return Err(error::with_kind(
                error::ErrorKind::InvalidInput,
                format!("lexicon too large: {num_nodes} nodes, limit is {MAX_NODES}"),
            )
            .into());
        }

        let mut nodes = vec![Node(0); num_nodes];
        nodes[0] = Node::new(0, false, true, run_start[0] as u32);
        for &b in &order {
            let children = &builder[b].children;
            for (k, &(tile, child)) in children.iter().enumerate() {
                nodes[run_start[b] + k] = Node::new(
                    tile,
                    builder[child].accepts,
                    k + 1 == children.len(),
                    run_start[child] as u32,
                );
            }
        }
        Ok(Trie {
            nodes: nodes.into_boxed_slice(),
            num_words,
        })
    }

    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.num_words
    }

    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    // the arc for tile among the children of p, or -1.
    #[inline(always)]
    pub fn seek(&self, mut p: i32, tile: u8) -> i32 {
        if p >= 0 {
            p = self[p].arc_index();
            if p > 0 {
                loop {
                    let node = self[p];
                    if node.tile() == tile {
                        return p;
                    }
                    if node.is_end() {
                        return -1;
                    }
                    p += 1;
                }
            }
        }
        -1
    }

    // true iff the path to p spells a whole word.
    #[inline(always)]
    pub fn accepts(&self, p: i32) -> bool {
        p > 0 && self[p].accepts()
    }

    pub fn walk(&self, tiles: &[u8]) -> i32 {
        let mut p = Self::ROOT;
        for &tile in tiles {
            p = self.seek(p, tile);
            if p < 0 {
                break;
            }
        }
        p
    }

    pub fn contains(&self, tiles: &[u8]) -> bool {
        self.accepts(self.walk(tiles))
    }
}

// fallback when no word file can be found.
pub fn minimal_words() -> &'static [&'static str] {
    &[
        "AA", "AB", "AD", "AE", "AG", "AH", "AI", "AL", "AM", "AN", "AR", "AS", "AT", "AW", "AX",
        "AY", "BA", "BE", "BI", "BO", "BY", "DA", "DE", "DO", "ED", "EF", "EH", "EL", "EM", "EN",
        "ER", "ES", "ET", "EW", "EX", "FA", "FE", "GO", "HA", "HE", "HI", "HM", "HO", "ID", "IF",
        "IN", "IS", "IT", "JO", "KA", "KI", "LA", "LI", "LO", "MA", "ME", "MI", "MM", "MO", "MU",
        "MY", "NA", "NE", "NO", "NU", "OD", "OE", "OF", "OH", "OI", "OK", "OM", "ON", "OP", "OR",
        "OS", "OU", "OW", "OX", "OY", "PA", "PE", "PI", "PO", "QI", "RE", "SH", "SI", "SO", "TA",
        "TI", "TO", "UH", "UM", "UN", "UP", "US", "UT", "WE", "WO", "XI", "XU", "YA", "YE", "YO",
        "ZA", //
        "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HER", "WAS", "ONE", "OUR",
        "OUT", "DAY", "HAD", "HAS", "HIS", "HOW", "ITS", "MAY", "NEW", "NOW", "OLD", "SEE", "WAY",
        "WHO", "BOY", "DID", "GET", "HIM", "LET", "SAY", "SHE", "TOO", "USE", "CAT", "DOG", "RUN",
        "SET", "TOP", "RED", "WORD", "PLAY", "GAME", "TILE", "BEST", "MOVE", "QUIZ", "QUAY",
        "JINX", "ZERO", "ZONE", "JAZZ", "FIZZ", "BUZZ", "FUZZ", "HAZE", "MAZE", "GAZE", "LAZE",
        "OXEN", "APEX", "LYNX", "ONYX", "WAXY", "DEWY", "ENVY", "LEVY", "NAVY", "WAVY", "HAVE",
        "GAVE", "SAVE", "WAVE", "CAVE", "DOVE", "FIVE", "GIVE", "HIVE", "JIVE", "LIVE", "LOVE",
        "OVEN", "OVER", "VERY", "VIEW", "VOWS", "AVOW", "AVID", "EVEN", "EVER", "EVIL", "VOID",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;

    fn has(trie: &Trie, alphabet: &alphabet::Alphabet, word: &str) -> bool {
        trie.contains(&alphabet.parse_word(word).unwrap())
    }

    #[test]
    fn membership_and_prefixes() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let trie = Trie::from_words(&alphabet, ["CAT", "CATS", "cater", "AS", "A", "X-RAY"]).unwrap();
        assert_eq!(trie.num_words(), 4);
        assert!(has(&trie, &alphabet, "CAT"));
        assert!(has(&trie, &alphabet, "CATER"));
        assert!(has(&trie, &alphabet, "AS"));
        assert!(!has(&trie, &alphabet, "CA"));
        assert!(!has(&trie, &alphabet, "A"));
        assert!(!has(&trie, &alphabet, "XRAY"));
        // CA is a live prefix even though it is not a word.
        assert!(trie.walk(&alphabet.parse_word("CA").unwrap()) > 0);
        assert!(trie.walk(&alphabet.parse_word("CZ").unwrap()) < 0);
    }

    #[test]
    fn duplicates_are_counted_once() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let trie = Trie::from_words(&alphabet, ["QI", "QI", "qi"]).unwrap();
        assert_eq!(trie.num_words(), 1);
        // root sentinel, Q, I
        assert_eq!(trie.num_nodes(), 3);
    }

    #[test]
    fn empty_lexicon_has_no_words() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let trie = Trie::from_words(&alphabet, std::iter::empty::<&str>()).unwrap();
        assert_eq!(trie.num_words(), 0);
        assert!(!trie.contains(&[1, 1]));
        assert_eq!(trie.seek(Trie::ROOT, 1), -1);
    }

    #[test]
    fn minimal_list_builds() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let trie = Trie::from_words(&alphabet, minimal_words().iter()).unwrap();
        assert_eq!(trie.num_words(), minimal_words().len());
        assert!(has(&trie, &alphabet, "QI"));
    }
}
