//! The unsaved-changes question.

use std::io::{self, Write};

/// Answer to "save before continuing?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    /// Save, and continue only if the save worked
    Save,
    /// Throw the edits away and continue
    Discard,
    /// Stay on the current document
    Cancel,
}

impl UnsavedChoice {
    /// Parses a terminal answer. Anything unrecognized cancels.
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "s" | "save" => UnsavedChoice::Save,
            "n" | "no" | "d" | "discard" => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }
}

/// Asks the user what to do with unsaved changes.
pub trait Prompt {
    fn unsaved_changes(&mut self, name: &str) -> io::Result<UnsavedChoice>;
}

/// Asks on the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn unsaved_changes(&mut self, name: &str) -> io::Result<UnsavedChoice> {
        let mut stdout = io::stdout();
        write!(
            stdout,
            "{name} has unsaved changes. Save before continuing? [y]es/[n]o/[c]ancel: "
        )?;
        stdout.flush()?;

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer)? == 0 {
            return Ok(UnsavedChoice::Cancel);
        }
        Ok(UnsavedChoice::parse(&answer))
    }
}
