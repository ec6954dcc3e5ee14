//! Terminal I/O for running programs
//!
//! [`Terminal`] is where `print` output goes and where `input` reads from.
//! It either streams to real handles (stdout/stdin, or any writer/reader) or
//! captures output lines in memory so embedders and tests can inspect them.

use std::io::{self, BufRead, Write};

enum Sink {
    Stream(Box<dyn Write>),
    Captured {
        lines: Vec<String>,
        /// Prompt text waiting for the rest of its line
        pending: String,
    },
}

/// Output sink and input source for a running program
pub struct Terminal {
    sink: Sink,
    input: Box<dyn BufRead>,
}

impl Terminal {
    /// Terminal over arbitrary handles
    pub fn new(output: impl Write + 'static, input: impl BufRead + 'static) -> Self {
        Terminal {
            sink: Sink::Stream(Box::new(output)),
            input: Box::new(input),
        }
    }

    /// Terminal over the process's stdout and stdin
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stdin().lock())
    }

    /// Terminal that records output lines in memory and has no input
    pub fn captured() -> Self {
        Terminal {
            sink: Sink::Captured {
                lines: Vec::new(),
                pending: String::new(),
            },
            input: Box::new(io::empty()),
        }
    }

    /// Replace the input source
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Write `text` followed by a line break
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        match &mut self.sink {
            Sink::Stream(out) => writeln!(out, "{}", text),
            Sink::Captured { lines, pending } => {
                let mut line = std::mem::take(pending);
                line.push_str(text);
                lines.push(line);
                Ok(())
            }
        }
    }

    /// Write `text` without a line break and flush it
    pub fn write_prompt(&mut self, text: &str) -> io::Result<()> {
        match &mut self.sink {
            Sink::Stream(out) => {
                write!(out, "{}", text)?;
                out.flush()
            }
            Sink::Captured { pending, .. } => {
                pending.push_str(text);
                Ok(())
            }
        }
    }

    /// Read one line without its terminator; `None` at end of input
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        // What the user typed finishes the prompt's line in captured output
        if let Sink::Captured { lines, pending } = &mut self.sink {
            if !pending.is_empty() {
                let mut echoed = std::mem::take(pending);
                echoed.push_str(&line);
                lines.push(echoed);
            }
        }

        Ok(Some(line))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Stream(out) => out.flush(),
            Sink::Captured { .. } => Ok(()),
        }
    }

    /// Captured output lines, including an unfinished prompt; empty when streaming
    pub fn output(&self) -> Vec<String> {
        match &self.sink {
            Sink::Stream(_) => Vec::new(),
            Sink::Captured { lines, pending } => {
                let mut output = lines.clone();
                if !pending.is_empty() {
                    output.push(pending.clone());
                }
                output
            }
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::captured()
    }
}
