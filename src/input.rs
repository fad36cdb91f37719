//! Parsing terminal input into editor actions.
//!
//! Positions are typed as `LINE COLUMN`, both as the session counts them
//! (line from 1, column from 0). Inserted text understands `\n`, `\t` and
//! `\\` escapes.
//!
//! ```text
//! :new            :open PATH      :w [PATH]       :q   :q!
//! :print          :all            :help
//! i L C TEXT      insert          d L C L C       delete
//! x L C L C       cut             y L C L C       copy
//! p L C           paste           g L C           go to
//! u               undo            r               redo
//! /QUERY          find all        n               find next
//! ```

use scribe_buffer::{Position, TextRange};
use scribe_core::Command;
use std::path::PathBuf;

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Start an untitled document
    New,
    /// Load a file
    Open(PathBuf),
    /// Save, optionally under a new name
    Save(Option<PathBuf>),
    /// Leave; `force` skips the unsaved-changes question
    Quit { force: bool },
    /// Show the document
    Print,
    /// Highlight every match and remember the query
    Find(String),
    /// Jump to the next match of the remembered query
    FindNext,
    /// Show the command summary
    Help,
    /// Anything the session handles directly
    Session(Command),
}

/// Input that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Not a number: {0}")]
    InvalidNumber(String),
}

/// Parses one input line. Returns `None` for blank lines.
pub fn parse(line: &str) -> Result<Option<Input>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    if let Some(query) = line.strip_prefix('/') {
        return Ok(Some(Input::Find(query.to_string())));
    }

    let (word, rest) = line.trim_start().split_once(' ').unwrap_or((line.trim(), ""));
    let mut args = rest.split_whitespace();

    let input = match word {
        ":new" => Input::New,
        ":open" | ":e" => Input::Open(PathBuf::from(
            non_empty(rest).ok_or(ParseError::MissingArgument("path"))?,
        )),
        ":w" => Input::Save(non_empty(rest).map(PathBuf::from)),
        ":q" => Input::Quit { force: false },
        ":q!" => Input::Quit { force: true },
        ":print" => Input::Print,
        ":help" => Input::Help,
        ":all" => Input::Session(Command::SelectAll),
        "u" => Input::Session(Command::Undo),
        "r" => Input::Session(Command::Redo),
        "n" => Input::FindNext,
        "i" => {
            let (line_arg, rest) = rest
                .split_once(' ')
                .ok_or(ParseError::MissingArgument("position"))?;
            let (column_arg, text) = rest.split_once(' ').unwrap_or((rest, ""));
            Input::Session(Command::Insert {
                at: Position::new(number(line_arg)?, number(column_arg)?),
                text: unescape(text),
            })
        }
        "d" => Input::Session(Command::Delete {
            range: range(&mut args)?,
        }),
        "x" => Input::Session(Command::Cut {
            range: range(&mut args)?,
        }),
        "y" => Input::Session(Command::Copy {
            range: range(&mut args)?,
        }),
        "p" => Input::Session(Command::Paste {
            at: position(&mut args)?,
        }),
        "g" => Input::Session(Command::MoveCursor {
            to: position(&mut args)?,
        }),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(input))
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn number(arg: &str) -> Result<usize, ParseError> {
    arg.trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(arg.to_string()))
}

fn position<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<Position, ParseError> {
    let line = args.next().ok_or(ParseError::MissingArgument("line"))?;
    let column = args.next().ok_or(ParseError::MissingArgument("column"))?;
    Ok(Position::new(number(line)?, number(column)?))
}

fn range<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<TextRange, ParseError> {
    Ok(TextRange::new(position(args)?, position(args)?))
}

/// Expands `\n`, `\t` and `\\`. Other backslashes are kept as typed.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   \n"), Ok(None));
    }

    #[test]
    fn test_file_commands() {
        assert_eq!(parse(":new"), Ok(Some(Input::New)));
        assert_eq!(
            parse(":open notes/today.txt\n"),
            Ok(Some(Input::Open(PathBuf::from("notes/today.txt"))))
        );
        assert_eq!(parse(":w"), Ok(Some(Input::Save(None))));
        assert_eq!(
            parse(":w out.txt"),
            Ok(Some(Input::Save(Some(PathBuf::from("out.txt")))))
        );
        assert_eq!(parse(":q!"), Ok(Some(Input::Quit { force: true })));
        assert_eq!(parse(":open"), Err(ParseError::MissingArgument("path")));
    }

    #[test]
    fn test_insert_keeps_spaces_and_unescapes() {
        assert_eq!(
            parse("i 2 3 hello  world\\n\\tnext"),
            Ok(Some(Input::Session(Command::Insert {
                at: Position::new(2, 3),
                text: "hello  world\n\tnext".to_string(),
            })))
        );
    }

    #[test]
    fn test_range_commands() {
        let expected = TextRange::new(Position::new(1, 5), Position::new(1, 2));
        assert_eq!(
            parse("d 1 5 1 2"),
            Ok(Some(Input::Session(Command::Delete { range: expected })))
        );
        assert_eq!(
            parse("x 1 5 1 2"),
            Ok(Some(Input::Session(Command::Cut { range: expected })))
        );
        assert_eq!(parse("d 1 5 1"), Err(ParseError::MissingArgument("column")));
        assert_eq!(
            parse("p 1 z"),
            Err(ParseError::InvalidNumber("z".to_string()))
        );
    }

    #[test]
    fn test_find() {
        assert_eq!(
            parse("/hello world"),
            Ok(Some(Input::Find("hello world".to_string())))
        );
        assert_eq!(parse("n"), Ok(Some(Input::FindNext)));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            parse("zap"),
            Err(ParseError::UnknownCommand("zap".to_string()))
        );
    }

    #[test]
    fn test_unescape_keeps_unknown_escapes() {
        assert_eq!(unescape(r"a\qb\\c\"), r"a\qb\c\");
    }
}
