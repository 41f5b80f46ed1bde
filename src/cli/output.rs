//! Handles all user-facing output for the CLI.

use std::io::Write;
use std::path::Path;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::outcome::TestIdentity;
use crate::report::ReportFiles;
use crate::results::Mismatch;

fn stdout() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn label(stdout: &mut StandardStream, text: &str, color: Color) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{}", text);
    let _ = stdout.reset();
}

pub fn print_pass(identity: &TestIdentity) {
    let mut stdout = stdout();
    label(&mut stdout, "PASS", Color::Green);
    let _ = writeln!(stdout, ": {}", identity);
}

/// Prints a failed check and where its reports were written.
pub fn print_failure(identity: &TestIdentity, mismatches: &[String], files: &ReportFiles, dir: &Path) {
    let mut stdout = stdout();
    label(&mut stdout, "FAIL", Color::Red);
    let _ = writeln!(stdout, ": {}", identity);
    for message in mismatches {
        let _ = writeln!(stdout, "  {}", message);
    }
    let _ = writeln!(stdout, "  Report: {}", dir.join(&files.error_file).display());
    if let Some(messages) = &files.messages_file {
        let _ = writeln!(stdout, "  Messages: {}", dir.join(messages).display());
    }
}

pub fn print_mismatches(mismatches: &[Mismatch]) {
    let mut stdout = stdout();
    for mismatch in mismatches {
        label(&mut stdout, "-", Color::Yellow);
        let _ = writeln!(stdout, " {}", mismatch);
    }
}

/// Prints a line diff between two table renderings.
pub fn print_table_diff(expected: &str, actual: &str) {
    let mut stdout = stdout();
    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        let (prefix, color, text) = match diff {
            Difference::Same(ref x) => (' ', None, x),
            Difference::Add(ref x) => ('+', Some(Color::Green), x),
            Difference::Rem(ref x) => ('-', Some(Color::Red), x),
        };
        let _ = stdout.set_color(ColorSpec::new().set_fg(color));
        for line in text.lines() {
            let _ = writeln!(stdout, "{}{}", prefix, line);
        }
    }
    let _ = stdout.reset();
}
