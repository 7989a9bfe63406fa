// Copyright (C) 2020-2021 Andy Kurnia.

// https://github.com/kkawakam/rustyline/blob/master/examples/example.rs

// board entry commands, completed at the start of a line.
pub static COMMANDS: &[&str] = &["clear", "done", "exit", "help", "show", "source"];

#[derive(
    rustyline_derive::Helper,
    rustyline_derive::Hinter,
    rustyline_derive::Highlighter,
    rustyline_derive::Validator,
)]
pub struct MyHelper {
    filename_completer: rustyline::completion::FilenameCompleter,
    #[rustyline(Hinter)]
    hinter: rustyline::hint::HistoryHinter,
}

impl rustyline::completion::Completer for MyHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<rustyline::completion::Pair>)> {
        let before = &line[..pos];
        if before.starts_with("source ") {
            return self.filename_completer.complete(line, pos, ctx);
        }
        if before.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((
            0,
            COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(before))
                .map(|&cmd| rustyline::completion::Pair {
                    display: cmd.to_owned(),
                    replacement: cmd.to_owned(),
                })
                .collect(),
        ))
    }
}

pub fn new_rl_editor()
-> rustyline::Result<rustyline::Editor<MyHelper, rustyline::history::DefaultHistory>> {
    let mut rl = rustyline::Editor::new()?;
    rl.set_helper(Some(MyHelper {
        filename_completer: rustyline::completion::FilenameCompleter::new(),
        hinter: rustyline::hint::HistoryHinter::new(),
    }));
    Ok(rl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::completion::Completer;

    #[test]
    fn completes_commands_at_line_start() {
        let helper = MyHelper {
            filename_completer: rustyline::completion::FilenameCompleter::new(),
            hinter: rustyline::hint::HistoryHinter::new(),
        };
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, pairs) = helper.complete("s", 1, &ctx).unwrap();
        assert_eq!(start, 0);
        let names = pairs.iter().map(|p| p.replacement.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["show", "source"]);
        let (_, pairs) = helper.complete("7 7 ", 4, &ctx).unwrap();
        assert!(pairs.is_empty());
    }
}
