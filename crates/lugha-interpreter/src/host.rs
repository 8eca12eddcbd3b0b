//! Host I/O used by builtins.
//!
//! The interpreter touches the outside world through exactly three
//! operations: write a line, read a line, clear the screen. The CLI runs
//! on `StdIo`; tests script the exchange with `ScriptedIo`.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// The host I/O surface available to builtins.
pub trait HostIo {
    /// Write `text` followed by a newline.
    fn write_line(&mut self, text: &str);

    /// Write `prompt` (no newline), then read one line of input without its
    /// trailing newline. Returns `None` when the input is closed.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Clear the terminal screen.
    fn clear_screen(&mut self);
}

/// Standard input/output.
#[derive(Debug, Default)]
pub struct StdIo;

impl HostIo for StdIo {
    fn write_line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }

    fn clear_screen(&mut self) {
        print!("\x1B[2J\x1B[1;1H");
        let _ = io::stdout().flush();
    }
}

#[derive(Debug, Default)]
struct ScriptedState {
    inputs: Vec<String>,
    next_input: usize,
    output: Vec<String>,
    prompts: Vec<String>,
    clears: usize,
}

/// Scripted I/O for tests: canned input lines, captured output.
///
/// Clones share state, so a test can keep a handle while the interpreter
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIo {
    state: Rc<RefCell<ScriptedState>>,
}

impl ScriptedIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(inputs: &[&str]) -> Self {
        let io = Self::default();
        io.state.borrow_mut().inputs = inputs.iter().map(|s| s.to_string()).collect();
        io
    }

    /// Lines written so far.
    pub fn output(&self) -> Vec<String> {
        self.state.borrow().output.clone()
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.state.borrow().prompts.clone()
    }

    /// How many times the screen was cleared.
    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }
}

impl HostIo for ScriptedIo {
    fn write_line(&mut self, text: &str) {
        self.state.borrow_mut().output.push(text.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut state = self.state.borrow_mut();
        state.prompts.push(prompt.to_string());
        let line = state.inputs.get(state.next_input).cloned();
        if line.is_some() {
            state.next_input += 1;
        }
        line
    }

    fn clear_screen(&mut self) {
        self.state.borrow_mut().clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_io_replays_inputs() {
        let mut io = ScriptedIo::with_inputs(&["moja", "mbili"]);
        assert_eq!(io.read_line("? "), Some("moja".to_string()));
        assert_eq!(io.read_line("? "), Some("mbili".to_string()));
        assert_eq!(io.read_line("? "), None);
        assert_eq!(io.prompts().len(), 3);
    }

    #[test]
    fn test_scripted_io_shares_state_across_clones() {
        let io = ScriptedIo::new();
        let mut handle = io.clone();
        handle.write_line("habari");
        handle.clear_screen();

        assert_eq!(io.output(), vec!["habari".to_string()]);
        assert_eq!(io.clear_count(), 1);
    }
}
