//! Terminal front end.
//!
//! `App` plays the part a windowed UI would: it owns file access and the
//! unsaved-changes dialog, turns input lines into session commands and
//! reports results. The session itself never sees a path being read or
//! written.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scribe_core::{Command, Config, DocumentSession, EventReceiver, Outcome, SessionEvent};

use crate::input::{self, Input};
use crate::prompt::{Prompt, UnsavedChoice};
use crate::storage::Storage;

/// Whether the input loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The editor front end.
pub struct App<S, P> {
    session: DocumentSession,
    storage: S,
    prompt: P,
    events: EventReceiver,
    last_query: Option<String>,
}

impl<S: Storage, P: Prompt> App<S, P> {
    /// Creates an app holding an untitled document.
    pub fn new(config: &Config, storage: S, prompt: P) -> Self {
        let session = DocumentSession::with_config(config);
        let events = session.subscribe();
        Self {
            session,
            storage,
            prompt,
            events,
            last_query: None,
        }
    }

    /// Returns the session.
    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    /// Window-title style label, e.g. `notes.txt* - Scribe`.
    pub fn title(&self) -> String {
        let marker = if self.session.is_modified() { "*" } else { "" };
        format!("{}{} - Scribe", self.session.display_name(), marker)
    }

    // ==================== File Operations ====================

    /// Opens a file, after settling any unsaved changes.
    ///
    /// Returns false if the user cancelled.
    pub fn open(&mut self, path: &Path) -> Result<bool> {
        if !self.confirm_discard()? {
            return Ok(false);
        }

        let content = self
            .storage
            .read(path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        self.session.execute(Command::OpenDocument {
            content,
            file: Some(path.to_path_buf()),
        })?;
        Ok(true)
    }

    /// Opens a file, or starts an empty document that will be saved there.
    pub fn open_or_create(&mut self, path: &Path) -> Result<()> {
        if path.exists() {
            self.open(path)?;
        } else {
            tracing::info!("{} does not exist yet, starting empty", path.display());
            self.session.open_document("", Some(path.to_path_buf()));
        }
        Ok(())
    }

    /// Starts an untitled document, after settling any unsaved changes.
    pub fn new_document(&mut self) -> Result<bool> {
        if !self.confirm_discard()? {
            return Ok(false);
        }
        self.session.execute(Command::NewDocument)?;
        Ok(true)
    }

    /// Saves to `path`, or to the current file when `path` is None.
    ///
    /// The session is marked clean only after the write succeeded.
    pub fn save(&mut self, path: Option<PathBuf>) -> Result<()> {
        let target = path
            .or_else(|| self.session.file().map(Path::to_path_buf))
            .context("No file name; use :w PATH")?;

        let text = self.session.serialize_for_save();
        self.storage
            .write(&target, &text)
            .with_context(|| format!("Could not save {}", target.display()))?;

        self.session.execute(Command::MarkSaved { file: Some(target) })?;
        Ok(())
    }

    /// Runs the unsaved-changes protocol.
    ///
    /// Returns true if it is fine to replace or drop the current document:
    /// nothing was modified, the user discarded, or the save succeeded.
    pub fn confirm_discard(&mut self) -> Result<bool> {
        if !self.session.is_modified() {
            return Ok(true);
        }

        let name = self.session.display_name().into_owned();
        match self.prompt.unsaved_changes(&name)? {
            UnsavedChoice::Save => match self.save(None) {
                Ok(()) => Ok(true),
                Err(err) => {
                    tracing::warn!("Save failed, staying on {}: {:#}", name, err);
                    Ok(false)
                }
            },
            UnsavedChoice::Discard => Ok(true),
            UnsavedChoice::Cancel => Ok(false),
        }
    }

    // ==================== Input Loop ====================

    /// Handles one input line, writing feedback to `out`.
    ///
    /// Every failure of the command itself is reported and the loop
    /// continues. That includes session errors, I/O errors and a failed
    /// unsaved-changes question. Only failures writing to `out` are returned.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let input = match input::parse(line) {
            Ok(Some(input)) => input,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(out, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        let flow = match self.dispatch(input, out) {
            Ok(flow) => flow,
            Err(err) => {
                match err.downcast_ref::<scribe_core::CoreError>() {
                    Some(core) if core.is_signal() => writeln!(out, "{core}")?,
                    _ => writeln!(out, "error: {err:#}")?,
                }
                Flow::Continue
            }
        };

        self.report_events(out)?;
        Ok(flow)
    }

    fn dispatch(&mut self, input: Input, out: &mut impl Write) -> Result<Flow> {
        match input {
            Input::New => {
                self.new_document()?;
            }
            Input::Open(path) => {
                self.open(&path)?;
            }
            Input::Save(path) => {
                self.save(path)?;
            }
            Input::Quit { force } => {
                if force || self.confirm_discard()? {
                    return Ok(Flow::Quit);
                }
            }
            Input::Print => {
                let text = self.session.serialize_for_save();
                for (n, line) in text.split('\n').enumerate() {
                    writeln!(out, "{:>4} | {}", n + 1, line)?;
                }
            }
            Input::Help => {
                writeln!(out, "{}", HELP)?;
            }
            Input::Find(query) => {
                let outcome = self.session.execute(Command::Find {
                    query: query.clone(),
                })?;
                self.last_query = Some(query);
                self.report(outcome, out)?;
            }
            Input::FindNext => {
                let query = self.last_query.clone().context("No previous search")?;
                let outcome = self.session.execute(Command::FindNext { query })?;
                self.report(outcome, out)?;
            }
            Input::Session(command) => {
                let outcome = self.session.execute(command)?;
                self.report(outcome, out)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn report(&self, outcome: Outcome, out: &mut impl Write) -> io::Result<()> {
        match outcome {
            Outcome::Done | Outcome::Cursor(_) => Ok(()),
            Outcome::Text(text) => writeln!(out, "clipboard: {text:?}"),
            Outcome::Range(range) => writeln!(out, "selected {range}"),
            Outcome::Matches(matches) if matches.is_empty() => writeln!(out, "no matches"),
            Outcome::Matches(matches) => {
                let spans: Vec<String> = matches.iter().map(ToString::to_string).collect();
                writeln!(out, "{} matches: {}", matches.len(), spans.join(" "))
            }
        }
    }

    /// Prints the title when it may have changed and the cursor when it moved.
    fn report_events(&mut self, out: &mut impl Write) -> io::Result<()> {
        let events = self.events.drain();
        if events.iter().any(|e| !matches!(e, SessionEvent::CursorMoved(_))) {
            writeln!(out, "[{}]", self.title())?;
        }
        if events.iter().any(|e| matches!(e, SessionEvent::CursorMoved(_))) {
            writeln!(out, "{}", self.session.cursor_label())?;
        }
        Ok(())
    }

    /// Reads lines until quit or end of input.
    ///
    /// At end of input the unsaved-changes question is asked once; the app
    /// exits whatever the answer, since no further input can arrive.
    pub fn run(
        &mut self,
        lines: impl IntoIterator<Item = io::Result<String>>,
        out: &mut impl Write,
    ) -> Result<()> {
        writeln!(out, "[{}]", self.title())?;
        for line in lines {
            if self.handle_line(&line?, out)? == Flow::Quit {
                return Ok(());
            }
        }

        if !self.confirm_discard()? {
            tracing::warn!("Input ended with unsaved changes in {}", self.session.display_name());
        }
        Ok(())
    }
}

const HELP: &str = "\
:new  :open PATH  :w [PATH]  :q  :q!  :print  :all  :help
i L C TEXT   insert         d L C L C   delete
x L C L C    cut            y L C L C   copy
p L C        paste          g L C       go to
u            undo           r           redo
/QUERY       find all       n           find next";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;
    use scribe_buffer::Position;
    use std::collections::VecDeque;

    /// Answers the unsaved-changes question from a script.
    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<UnsavedChoice>,
        asked: usize,
    }

    impl ScriptedPrompt {
        fn answering(answers: &[UnsavedChoice]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: 0,
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn unsaved_changes(&mut self, _name: &str) -> io::Result<UnsavedChoice> {
            self.asked += 1;
            Ok(self.answers.pop_front().unwrap_or(UnsavedChoice::Cancel))
        }
    }

    /// A prompt whose terminal has gone away.
    struct BrokenPrompt;

    impl Prompt for BrokenPrompt {
        fn unsaved_changes(&mut self, _name: &str) -> io::Result<UnsavedChoice> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }
    }

    fn app(answers: &[UnsavedChoice]) -> App<FileStorage, ScriptedPrompt> {
        App::new(
            &Config::default(),
            FileStorage::default(),
            ScriptedPrompt::answering(answers),
        )
    }

    fn feed(app: &mut App<FileStorage, ScriptedPrompt>, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            app.handle_line(line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_open_edit_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "hello\r\nworld").unwrap();

        let mut app = app(&[]);
        assert!(app.open(&path).unwrap());
        assert_eq!(app.title(), "doc.txt - Scribe");

        feed(&mut app, &["i 1 5 ,"]);
        assert_eq!(app.title(), "doc.txt* - Scribe");

        feed(&mut app, &[":w"]);
        assert!(!app.session().is_modified());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello,\nworld");
    }

    #[test]
    fn test_cancel_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("other.txt");
        std::fs::write(&other, "other").unwrap();

        let mut app = app(&[UnsavedChoice::Cancel]);
        feed(&mut app, &["i 1 0 draft"]);

        assert!(!app.open(&other).unwrap());
        assert_eq!(app.session().serialize_for_save(), "draft");
        assert!(app.session().is_modified());
    }

    #[test]
    fn test_discard_proceeds() {
        let mut app = app(&[UnsavedChoice::Discard]);
        feed(&mut app, &["i 1 0 draft"]);

        assert!(app.new_document().unwrap());
        assert_eq!(app.session().serialize_for_save(), "");
    }

    #[test]
    fn test_failed_save_does_not_proceed() {
        // Untitled, so "save" has nowhere to write
        let mut app = app(&[UnsavedChoice::Save]);
        feed(&mut app, &["i 1 0 draft"]);

        assert!(!app.new_document().unwrap());
        assert_eq!(app.session().serialize_for_save(), "draft");
        assert!(app.session().is_modified());
    }

    #[test]
    fn test_save_then_proceed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");

        let mut app = app(&[UnsavedChoice::Save]);
        app.open_or_create(&path).unwrap();
        feed(&mut app, &["i 1 0 draft"]);

        let out = feed(&mut app, &[":q"]);
        assert!(!out.contains("error"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "draft");
    }

    #[test]
    fn test_clean_document_is_not_questioned() {
        let mut app = app(&[]);
        let mut out = Vec::new();
        assert_eq!(app.handle_line(":q", &mut out).unwrap(), Flow::Quit);
        assert_eq!(app.prompt.asked, 0);
    }

    #[test]
    fn test_errors_are_reported_not_fatal() {
        let mut app = app(&[]);
        let out = feed(&mut app, &["i 1 0 hello", "d 1 5 1 2", "zap", "u", "u"]);

        assert!(out.contains("error: Invalid range: start 1:6 is after end 1:3"));
        assert!(out.contains("error: Unknown command: zap"));
        assert!(out.contains("Nothing to undo"));
        assert_eq!(app.session().serialize_for_save(), "");
    }

    #[test]
    fn test_find_and_find_next() {
        let mut app = app(&[]);
        let out = feed(&mut app, &["i 1 0 hello world\\nsay hello", "/hello"]);
        assert!(out.contains("2 matches: 1:1-1:6 2:5-2:10"));
        assert_eq!(app.session().cursor(), Position::new(1, 5));

        let out = feed(&mut app, &["n"]);
        assert!(out.contains("selected 2:5-2:10"));
        assert_eq!(app.session().cursor(), Position::new(2, 9));

        feed(&mut app, &["n"]);
        assert_eq!(app.session().cursor(), Position::new(1, 5));
    }

    #[test]
    fn test_prompt_failure_is_reported_and_keeps_document() {
        let mut app = App::new(&Config::default(), FileStorage::default(), BrokenPrompt);
        let mut out = Vec::new();
        app.handle_line("i 1 0 draft", &mut out).unwrap();

        let flow = app.handle_line(":q", &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(String::from_utf8(out).unwrap().contains("error: terminal closed"));
        assert_eq!(app.session().serialize_for_save(), "draft");
    }

    #[test]
    fn test_find_next_without_query() {
        let mut app = app(&[]);
        let out = feed(&mut app, &["n"]);
        assert!(out.contains("error: No previous search"));
    }

    #[test]
    fn test_cut_paste_undo() {
        let mut app = app(&[]);
        let out = feed(&mut app, &["i 1 0 one two", "x 1 0 1 4", "p 1 3 "]);
        assert!(out.contains("clipboard: \"one \""));
        assert_eq!(app.session().serialize_for_save(), "twoone ");

        feed(&mut app, &["u", "u"]);
        assert_eq!(app.session().serialize_for_save(), "one two");
    }

    #[test]
    fn test_run_until_quit() {
        let mut app = app(&[]);
        let mut out = Vec::new();
        let lines = ["i 1 0 abc", ":q!", "i 1 0 never"]
            .into_iter()
            .map(|l| Ok(l.to_string()));

        app.run(lines, &mut out).unwrap();
        assert_eq!(app.session().serialize_for_save(), "abc");
    }

    #[test]
    fn test_run_asks_once_at_end_of_input() {
        let mut app = app(&[]);
        let mut out = Vec::new();
        let lines = ["i 1 0 abc"].into_iter().map(|l| Ok(l.to_string()));

        app.run(lines, &mut out).unwrap();
        assert_eq!(app.prompt.asked, 1);
    }
}
