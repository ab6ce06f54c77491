//! Terminal implementation of the trainer's `Console`.

use std::io::{self, BufRead, Write};

use orator_core::console::Console;

/// Reads from standard input and writes to standard output.
pub struct StdConsole {
    stdin: io::StdinLock<'static>,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips one trailing `\n` or `\r\n`.
fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

impl Console for StdConsole {
    fn show(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{text}");
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.stdout, "{prompt}")?;
        self.stdout.flush()?;

        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed",
            ));
        }
        Ok(trim_line_ending(line))
    }
}
