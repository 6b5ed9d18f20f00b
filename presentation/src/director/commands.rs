//! Parsing of director input lines.
//!
//! # Live console
//!
//! | Input | Effect |
//! |-------|--------|
//! | `/pause` | Pause after the in-flight turn |
//! | `/resume` | Resume (retries the same agent after a failure) |
//! | `/inject <w> <text>` | Inject with weight `w` in `[0, 1]` |
//! | `/save <path>` | Write a snapshot |
//! | `/quit` | Stop the controller |
//! | `/help` | Show commands |
//! | any other text | Inject with the default weight |
//!
//! # Batch prompt
//!
//! Enter continues, `u: text` or `u0.8: text` injects, `q` quits.

use parley_application::DirectorDecision;
use parley_domain::InfluenceWeight;
use std::path::PathBuf;

/// Weight used when the director does not give one.
pub const DEFAULT_INJECTION_WEIGHT: f64 = 0.5;

/// A parsed live-console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Pause,
    Resume,
    /// Weight is validated by the controller
    Inject { weight: f64, content: String },
    Save(PathBuf),
    Quit,
    Help,
    /// Blank line
    Nothing,
}

pub fn parse_console_line(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleCommand::Nothing);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(ConsoleCommand::Inject {
            weight: DEFAULT_INJECTION_WEIGHT,
            content: line.to_string(),
        });
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name.to_lowercase().as_str() {
        "pause" | "p" => Ok(ConsoleCommand::Pause),
        "resume" | "r" => Ok(ConsoleCommand::Resume),
        "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
        "help" | "h" | "?" => Ok(ConsoleCommand::Help),
        "save" | "s" => {
            if rest.is_empty() {
                Err("usage: /save <path>".to_string())
            } else {
                Ok(ConsoleCommand::Save(PathBuf::from(rest)))
            }
        }
        "inject" | "i" => parse_inject(rest),
        other => Err(format!("unknown command: /{}", other)),
    }
}

fn parse_inject(rest: &str) -> Result<ConsoleCommand, String> {
    let (weight, content) = match rest.split_once(char::is_whitespace) {
        Some((first, tail)) => match first.parse::<f64>() {
            Ok(weight) => (weight, tail.trim()),
            Err(_) => (DEFAULT_INJECTION_WEIGHT, rest),
        },
        None => (DEFAULT_INJECTION_WEIGHT, rest),
    };
    if content.is_empty() {
        return Err("usage: /inject <weight> <text>".to_string());
    }
    Ok(ConsoleCommand::Inject {
        weight,
        content: content.to_string(),
    })
}

/// Parse an answer to the between-turns prompt.
pub fn parse_batch_line(line: &str) -> Result<DirectorDecision, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(DirectorDecision::Continue);
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(DirectorDecision::Quit);
    }

    let Some((head, content)) = line.split_once(':') else {
        return Err(format!("not understood: {}", line));
    };
    let head = head.trim();
    let Some(weight) = head.strip_prefix(['u', 'U']) else {
        return Err(format!("not understood: {}", line));
    };
    let weight = if weight.is_empty() {
        DEFAULT_INJECTION_WEIGHT
    } else {
        weight
            .parse::<f64>()
            .map_err(|_| format!("bad weight '{}'", weight))?
    };
    let weight = InfluenceWeight::new(weight).map_err(|e| e.to_string())?;

    let content = content.trim();
    if content.is_empty() {
        // Nothing to say; same as pressing Enter.
        return Ok(DirectorDecision::Continue);
    }
    Ok(DirectorDecision::Inject {
        content: content.to_string(),
        weight,
    })
}
