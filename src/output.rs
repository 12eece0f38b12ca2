//! Output formatting for search results and indexing summaries

use crate::index::IndexSummary;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve a --color flag value into a termcolor choice. "auto" colors
/// only when stdout is a terminal.
pub fn color_choice(mode: &str) -> ColorChoice {
    match mode {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => {
            if io::stdout().is_terminal() {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
    }
}

/// Print matching source paths, one per line
pub fn print_results(paths: &[String], color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);

    if paths.is_empty() {
        stdout.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(stdout, "No documents matched.")?;
        stdout.reset()?;
        return Ok(());
    }

    for path in paths {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        writeln!(stdout, "{}", path)?;
        stdout.reset()?;
    }

    Ok(())
}

/// Print the outcome of an indexing batch. Failures go to stderr so a
/// piped result list stays clean.
pub fn print_index_summary(summary: &IndexSummary) {
    println!("Indexed {} documents", summary.indexed);

    if !summary.failures.is_empty() {
        eprintln!("({} documents could not be read)", summary.failures.len());
        for failure in &summary.failures {
            eprintln!("  {}: {}", failure.path.display(), failure.error);
        }
    }
}
