// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, error, leave};
use std::str::FromStr;

pub static USAGE: &str = "options:
  --dict PATH        word list, one word per line
  --leaves PATH      csv of tile,value overriding the built-in leave values
  --top N            number of candidates to show (default 10)
  --candidates N     number of candidates to simulate (default 10)
  --sims N           simulation trials per candidate, 0 to skip (default 50)
  --seed N           seed for the simulation rng (default: random)
  --threads N        simulation threads (default: number of cpus)
  -v, --verbose      debug logging (RUST_LOG overrides)";

#[derive(Debug, PartialEq)]
pub struct Config {
    pub dict_path: Option<String>,
    pub leaves_path: Option<String>,
    pub top_n: usize,
    pub num_candidates: usize,
    pub num_trials: usize,
    pub seed: Option<u64>,
    pub num_threads: usize,
    pub verbose: bool,
    pub positional: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dict_path: None,
            leaves_path: None,
            top_n: 10,
            num_candidates: 10,
            num_trials: 50,
            seed: None,
            num_threads: num_cpus::get(),
            verbose: false,
            positional: Vec::new(),
        }
    }
}

fn parse_number<T: FromStr>(flag: &str, value: Option<String>) -> error::Returns<T> {
    let Some(value) = value else {
        return_error!(format!("{flag} needs a value"));
    };
    T::from_str(&value).map_err(|_| {
        error::with_kind(
            error::ErrorKind::Parse,
            format!("{flag}: {value:?} is not a valid number"),
        )
        .into()
    })
}

fn need_value(flag: &str, value: Option<String>) -> error::Returns<String> {
    match value {
        Some(value) => Ok(value),
        None => {
            return_error!(format!("{flag} needs a value"));
        }
    }
}

// args excludes the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> error::Returns<Config> {
    let mut config = Config::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dict" => config.dict_path = Some(need_value(&arg, args.next())?),
            "--leaves" => config.leaves_path = Some(need_value(&arg, args.next())?),
            "--top" => config.top_n = parse_number(&arg, args.next())?,
            "--candidates" => config.num_candidates = parse_number(&arg, args.next())?,
            "--sims" => config.num_trials = parse_number(&arg, args.next())?,
            "--seed" => config.seed = Some(parse_number(&arg, args.next())?),
            "--threads" => config.num_threads = parse_number(&arg, args.next())?,
            "-v" | "--verbose" => config.verbose = true,
            s if s.starts_with('-') && s.len() > 1 => {
                return_error!(format!("unknown option {s}\n{USAGE}"));
            }
            _ => config.positional.push(arg.clone()),
        }
    }
    Ok(config)
}

// logs go to stderr so stdout stays clean for results.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

pub fn load_leave(alphabet: &alphabet::Alphabet, path: Option<&str>) -> error::Returns<leave::Leave> {
    match path {
        None => Ok(leave::Leave::new(alphabet)),
        Some(path) => {
            let f = std::fs::File::open(path).map_err(|e| {
                error::with_kind(error::ErrorKind::Io, format!("cannot open {path}: {e}"))
            })?;
            let leave = leave::Leave::from_csv_reader(alphabet, f)?;
            log::info!("loaded leave values from {path}");
            Ok(leave)
        }
    }
}

// the seed to use when none was given.
pub fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> error::Returns<Config> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_and_flags() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.num_trials, 50);
        assert!(config.seed.is_none());

        let config = parse(&[
            "--dict", "twl.txt", "--sims", "0", "--seed", "42", "-v", "question.json",
        ])
        .unwrap();
        assert_eq!(config.dict_path.as_deref(), Some("twl.txt"));
        assert_eq!(config.num_trials, 0);
        assert_eq!(config.seed, Some(42));
        assert!(config.verbose);
        assert_eq!(config.positional, vec!["question.json".to_string()]);
        assert_eq!(seed_or_random(config.seed), 42);
    }

    #[test]
    fn bad_flags_are_reported() {
        let err = parse(&["--sims", "many"]).unwrap_err();
        assert!(error::is_kind(&err, error::ErrorKind::Parse));
        let err = parse(&["--dict"]).unwrap_err();
        assert!(error::is_kind(&err, error::ErrorKind::InvalidInput));
        assert!(parse(&["--frobnicate"]).is_err());
        // a lone dash is positional, meaning stdin.
        assert_eq!(parse(&["-"]).unwrap().positional, vec!["-".to_string()]);
    }

    #[test]
    fn missing_leave_file_is_io() {
        let alphabet = alphabet::make_crossplay_alphabet();
        let err = load_leave(&alphabet, Some("/nonexistent/leaves.csv"))
            .err()
            .unwrap();
        assert!(error::is_kind(&err, error::ErrorKind::Io));
        assert!(load_leave(&alphabet, None).is_ok());
    }
}
