use std::borrow::Cow;

use colored::Colorize;
use rustyline::{
    completion::Completer, error::ReadlineError, highlight::Highlighter, hint::Hinter,
    history::DefaultHistory, validate::Validator, Context, Editor, Helper,
};
use tracing::debug;

use crate::shell::{LineSource, ShellError, COMMANDS};

/// Completes the word under the cursor against the command keywords.
/// Returns the byte offset the candidates replace from.
pub fn complete_command(line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = &line[..pos];
    let start = head
        .rfind(|c: char| c.is_ascii_whitespace())
        .map_or(0, |space| space + 1);
    let prefix = &head[start..];
    let candidates = COMMANDS
        .iter()
        .filter(|command| command.starts_with(prefix))
        .map(|command| command.to_string())
        .collect();
    (start, candidates)
}

pub struct CommandHelper;

impl Completer for CommandHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(complete_command(line, pos))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(prompt.yellow().to_string())
    }
}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}

/// Interactive terminal input with completion and in-session history.
pub struct Console {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl Console {
    pub fn new() -> rustyline::Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandHelper));
        Ok(Console { editor })
    }
}

impl LineSource for Console {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                debug!("interrupted");
                Ok(None)
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_offers_every_command() {
        let (start, candidates) = complete_command("", 0);

        assert_eq!(start, 0);
        assert_eq!(candidates, COMMANDS.to_vec());
    }
    #[test]
    fn prefix_narrows_candidates() {
        let (start, candidates) = complete_command("cu", 2);

        assert_eq!(start, 0);
        assert_eq!(candidates, vec!["customers", "customer"]);
    }
    #[test]
    fn full_keyword_still_completes() {
        let (_, candidates) = complete_command("report", 6);

        assert_eq!(candidates, vec!["report"]);
    }
    #[test]
    fn completes_word_under_cursor() {
        let (start, candidates) = complete_command("customer he", 11);

        assert_eq!(start, 9);
        assert_eq!(candidates, vec!["help"]);
    }
    #[test]
    fn cursor_in_middle_uses_text_before_it() {
        let (start, candidates) = complete_command("exxyz", 2);

        assert_eq!(start, 0);
        assert_eq!(candidates, vec!["exit"]);
    }
    #[test]
    fn no_match() {
        let (_, candidates) = complete_command("zz", 2);

        assert!(candidates.is_empty());
    }
}
