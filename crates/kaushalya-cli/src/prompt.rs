use std::io::{BufRead, Write};

use kaushalya_client::Confirm;

/// Asks on a writer and reads a `y`/`yes` answer from a reader. Anything
/// else, including end of input, declines.
pub(crate) struct LineConfirm<R, W> {
    input: R,
    output: W,
}

/// [`LineConfirm`] on the terminal. Prompts go to stderr so stdout stays
/// clean for listings.
pub(crate) type StdinConfirm = LineConfirm<std::io::StdinLock<'static>, std::io::Stderr>;

impl Default for StdinConfirm {
    fn default() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").and_then(|()| self.output.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}
