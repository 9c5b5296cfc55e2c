//! Line-oriented terminal I/O.
//!
//! Generic over the reader and writer so the menus can be driven from a script in tests.

use std::io::{self, BufRead, Write};

const ANSI_CLEAR: &str = "\x1B[2J\x1B[1;1H";

pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            clear_screen: true,
        }
    }

    /// Disables screen clearing, for non-interactive use.
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Clears the terminal. Purely cosmetic; failures are ignored.
    pub fn clear(&mut self) -> io::Result<()> {
        if !self.clear_screen {
            return Ok(());
        }
        if cfg!(windows) {
            let _ = std::process::Command::new("cmd").args(["/C", "cls"]).status();
            Ok(())
        } else {
            write!(self.output, "{ANSI_CLEAR}")?;
            self.output.flush()
        }
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Prints `label` and reads one line, without the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] once the input is exhausted.
    pub fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Prompts for a field. When `current` is given it is shown, and a blank answer keeps it.
    pub fn prompt_field(&mut self, label: &str, current: Option<&str>) -> io::Result<String> {
        match current {
            Some(current) => {
                let answer = self.prompt(&format!("{label} [{current}]: "))?;
                if answer.trim().is_empty() {
                    Ok(current.to_string())
                } else {
                    Ok(answer)
                }
            }
            None => self.prompt(&format!("{label}: ")),
        }
    }

    pub fn pause(&mut self) -> io::Result<()> {
        self.prompt("Press Enter to return to the menu...").map(|_| ())
    }
}
