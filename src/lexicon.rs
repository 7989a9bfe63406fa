// Copyright (C) 2020-2023 Andy Kurnia.

use super::{alphabet, error, trie};

// tried in order after an explicitly given path.
pub static DEFAULT_SEARCH_PATHS: &[&str] = &[
    "dictionary.txt",
    "twl06.txt",
    "sowpods.txt",
    "words.txt",
    "/usr/share/dict/words",
];

pub struct Lexicon {
    pub trie: trie::Trie,
    // the file the words came from, None for the built-in list.
    pub source: Option<String>,
}

// one word per line. a file that exists but yields no usable words is
// skipped like a missing one.
pub fn load(alphabet: &alphabet::Alphabet, explicit_path: Option<&str>) -> error::Returns<Lexicon> {
    let mut paths: Vec<&str> = explicit_path.into_iter().collect();
    paths.extend_from_slice(DEFAULT_SEARCH_PATHS);
    load_from(alphabet, paths)
}

pub fn load_from<'p, I: IntoIterator<Item = &'p str>>(
    alphabet: &alphabet::Alphabet,
    paths: I,
) -> error::Returns<Lexicon> {
    for path in paths {
        if !std::path::Path::new(path).is_file() {
            log::debug!("no word list at {path}");
            continue;
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            error::with_kind(error::ErrorKind::Io, format!("cannot read {path}: {e}"))
        })?;
        let trie = trie::Trie::from_words(alphabet, content.lines())?;
        if trie.num_words() > 0 {
            log::info!(
                "loaded {} words ({} nodes) from {}",
                trie.num_words(),
                trie.num_nodes(),
                path
            );
            return Ok(Lexicon {
                trie,
                source: Some(path.to_string()),
            });
        }
        log::debug!("{path} has no usable words");
    }
    log::warn!("no dictionary file found, using the built-in minimal word list");
    log::warn!("save a full word list as dictionary.txt for real play");
    Ok(Lexicon {
        trie: trie::Trie::from_words(alphabet, trie::minimal_words())?,
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("crossplay-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn first_usable_file_wins() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let useless = temp_file("useless.txt", "a\n123\nx-ray\n");
        let good = temp_file("good.txt", "cat\nCATS\n  as  \n");
        let lexicon = load_from(&alphabet, ["/nonexistent/words.txt", useless.as_str(), good.as_str()]).unwrap();
        assert_eq!(lexicon.source.as_deref(), Some(good.as_str()));
        assert_eq!(lexicon.trie.num_words(), 3);
        assert!(lexicon.trie.contains(&alphabet.parse_word("AS").unwrap()));
        std::fs::remove_file(useless).unwrap();
        std::fs::remove_file(good).unwrap();
    }

    #[test]
    fn falls_back_to_minimal_list() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let lexicon = load_from(&alphabet, ["/nonexistent/words.txt"]).unwrap();
        assert!(lexicon.source.is_none());
        assert!(lexicon.trie.contains(&alphabet.parse_word("QI").unwrap()));
        assert!(lexicon.trie.contains(&alphabet.parse_word("JAZZ").unwrap()));
    }
}
