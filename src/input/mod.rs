/*!
 * Command Input
 *
 * Lazily turns a command script into argument vectors, one per non-blank
 * line. Words are separated by ASCII whitespace; there is no quoting.
 */

use crate::config::InputPath;
use crate::core::InputError;
use crate::process::Command;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::debug;

/// Split one line into a command, `None` for blank lines
#[must_use]
pub fn tokenize(line: &str) -> Option<Command> {
    Command::new(line.split_ascii_whitespace().map(str::to_owned).collect())
}

/// Open the configured input
pub fn open(path: &InputPath) -> Result<CommandSource<Box<dyn BufRead>>, InputError> {
    let reader: Box<dyn BufRead> = match path {
        InputPath::Stdin => Box::new(io::stdin().lock()),
        InputPath::File(path) => {
            let file = File::open(path).map_err(|cause| InputError::Open {
                path: path.clone(),
                cause,
            })?;
            debug!(path = %path.display(), "Reading commands from file");
            Box::new(BufReader::new(file))
        }
    };
    Ok(CommandSource::new(reader))
}

/// Lazy, finite sequence of commands read from a `BufRead`
///
/// Reads a line only when the next command is requested. Invalid UTF-8 is
/// replaced rather than rejected. The iterator ends after the first read error.
pub struct CommandSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    finished: bool,
}

impl<R: BufRead> CommandSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            finished: false,
        }
    }

    /// Number of lines consumed so far
    #[inline]
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for CommandSource<R> {
    type Item = Result<Command, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line_no += 1;
                    if let Some(command) = tokenize(&String::from_utf8_lossy(&self.buf)) {
                        return Some(Ok(command));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(InputError::Read(e)));
                }
            }
        }
        None
    }
}
