//! Yes/no confirmation prompts

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// Asks the user to confirm a step
pub trait Prompter {
    /// Ask `question`; `default` is the answer an empty reply stands for
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// `[Y/n]` or `[y/N]` depending on the default answer
pub fn choice_hint(default: bool) -> &'static str {
    if default {
        "[Y/n]"
    } else {
        "[y/N]"
    }
}

/// Interpret a typed reply; anything unrecognised falls back to `default`
pub fn parse_answer(reply: &str, default: bool) -> bool {
    match reply.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

/// Prompts on stderr and reads the reply from stdin
///
/// When stderr is not a terminal nobody can answer, so the question is
/// logged and the default answer is taken.
#[derive(Debug)]
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = choice_hint(default);
        if !self.interactive {
            log::warn!("{question} {hint} [input skipped in non-interactive mode]");
            return Ok(default);
        }

        let mut stderr = io::stderr().lock();
        write!(stderr, "{question} {hint} ")?;
        stderr.flush()?;

        let mut reply = String::new();
        io::stdin()
            .lock()
            .read_line(&mut reply)
            .context("Failed to read answer from stdin")?;
        Ok(parse_answer(&reply, default))
    }
}

/// Says yes to everything (`--force`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn confirm(&mut self, question: &str, _default: bool) -> Result<bool> {
        log::debug!("{question} yes (forced)");
        Ok(true)
    }
}

/// Replays canned answers and records the questions asked
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(default))
    }
}
