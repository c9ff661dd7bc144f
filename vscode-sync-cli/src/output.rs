//! Console output.
//!
//! Commands write through the [`Output`] trait so tests can capture what
//! would have been printed.

use console::style;

/// Destination for user-facing command output.
pub trait Output {
    /// Section header.
    fn header(&self, title: &str);

    /// Subsection header.
    fn subheader(&self, title: &str);

    /// Plain line.
    fn println(&self, line: &str);

    /// Line indented by two spaces.
    fn indented(&self, line: &str);

    /// Empty line.
    fn newline(&self);

    /// Completed step.
    fn success(&self, line: &str);

    /// Something the user should notice but that is not a failure.
    fn warn(&self, line: &str);

    /// Failure message, written to stderr.
    fn error(&self, line: &str);
}

/// Writes to the terminal with colour when supported.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn header(&self, title: &str) {
        println!("{}", style(title).bold());
        println!("{}", "=".repeat(title.chars().count()));
    }

    fn subheader(&self, title: &str) {
        println!();
        println!("{}", style(title).bold());
        println!("{}", "-".repeat(title.chars().count()));
    }

    fn println(&self, line: &str) {
        println!("{}", line);
    }

    fn indented(&self, line: &str) {
        println!("  {}", line);
    }

    fn newline(&self) {
        println!();
    }

    fn success(&self, line: &str) {
        println!("{}", style(line).green());
    }

    fn warn(&self, line: &str) {
        println!("{}", style(line).yellow());
    }

    fn error(&self, line: &str) {
        eprintln!("{}", style(line).red());
    }
}
