//! Line-based dialogs for the `interactive` command.
//!
//! An empty answer or end of input cancels a prompt.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use rotobatch_core::{parse_background_color, BackgroundColor, Dialogs};
use tracing::warn;

pub struct TerminalDialogs<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `label` and read one trimmed line; `None` on empty input or EOF.
    pub fn prompt(&mut self, label: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{label}: ").and_then(|()| self.output.flush()) {
            warn!(error = %e, "Failed to write prompt");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let answer = line.trim();
                (!answer.is_empty()).then(|| answer.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Failed to read answer");
                None
            }
        }
    }

    /// Ask a yes/no question; anything but `y`/`yes` is no.
    pub fn confirm(&mut self, question: &str) -> bool {
        self.prompt(&format!("{question} [y/N]"))
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn print(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<R, W> {
    fn pick_directory(&mut self, title: &str) -> Option<PathBuf> {
        self.prompt(title).map(PathBuf::from)
    }

    fn pick_color(&mut self, current: Option<BackgroundColor>) -> Option<BackgroundColor> {
        let label = match current {
            Some(color) => format!("Background color [{color}]"),
            None => "Background color".to_string(),
        };
        loop {
            let answer = self.prompt(&label)?;
            match parse_background_color(&answer) {
                Ok(color) => return Some(color),
                Err(e) => self.print(&e.to_string()),
            }
        }
    }

    fn pick_image_file(&mut self) -> Option<PathBuf> {
        self.prompt("Image to take the background color from").map(PathBuf::from)
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.print(&format!("{title}: {message}"));
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.print(&format!("{title}: {message}"));
    }
}
