//! Interactive terminal selection
//!
//! A numbered-list chooser that stands in for the engine's external
//! interactive collaborator. Selection runs on the terminal the tool was
//! started from and blocks until the user answers or cancels.

use console::Term;
use droidbuild_core::error::{Error, Result};
use droidbuild_gradle::resolver::FlavorPrompt;
use owo_colors::OwoColorize;

/// Present a numbered list and return the chosen entry.
///
/// Accepts either the option's number or its exact name. An empty line,
/// `q`, or end-of-input cancels and returns `Ok(None)`.
pub fn choose_from_list(title: &str, options: &[String]) -> Result<Option<String>> {
    let term = Term::stderr();

    eprintln!();
    eprintln!("{}", title.bold());
    for (i, option) in options.iter().enumerate() {
        eprintln!("  {} {}", format!("{})", i + 1).dimmed(), option);
    }

    loop {
        eprint!("Choice [1-{}, q to cancel]: ", options.len());
        let line = term
            .read_line()
            .map_err(|e| Error::io(format!("Failed to read selection: {}", e)))?;
        let answer = line.trim();

        if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        if let Ok(index) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&index) {
                return Ok(Some(options[index - 1].clone()));
            }
        }

        if let Some(exact) = options.iter().find(|o| *o == answer) {
            return Ok(Some(exact.clone()));
        }

        eprintln!("Not an option: {}", answer);
    }
}

/// Terminal-backed flavor chooser for the selection resolver
pub struct TermPrompt;

impl FlavorPrompt for TermPrompt {
    fn choose(&self, dimension: &str, options: &[String]) -> Result<Option<String>> {
        choose_from_list(&format!("Select {}", dimension), options)
    }
}
