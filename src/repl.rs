//! Interactive read-eval-print loop
//!
//! Input is buffered until its parentheses balance, then evaluated at top
//! level. Errors are reported and the session continues with the next input.

use miette::{IntoDiagnostic, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::interp::{Interpreter, Value};
use crate::{lexer, parser};

const PROMPT: &str = "eva> ";
const CONTINUATION: &str = "...> ";

/// Result of feeding one line to the REPL
#[derive(Debug)]
pub enum Step {
    /// Waiting for more lines to close open lists
    Incomplete,
    /// Input evaluated
    Value(Value),
    /// Parse or runtime error; the session continues
    Error(miette::Report),
    /// Output of a `:` command
    Message(String),
    Quit,
}

pub struct Repl {
    interpreter: Interpreter,
    buffer: String,
}

impl Repl {
    pub fn new(interpreter: Interpreter) -> Self {
        Repl {
            interpreter,
            buffer: String::new(),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn is_continuing(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Process one line of input
    pub fn feed(&mut self, line: &str) -> Step {
        let trimmed = line.trim();
        if self.buffer.is_empty() && trimmed.starts_with(':') {
            return self.command(trimmed);
        }

        self.buffer.push_str(line);
        self.buffer.push('\n');

        let source = std::mem::take(&mut self.buffer);
        let parsed = lexer::lex(&source).and_then(|tokens| parser::program(&tokens, &source));
        let program = match parsed {
            Ok(program) => program,
            Err(e) if e.is_incomplete() && !source.trim().is_empty() => {
                self.buffer = source;
                return Step::Incomplete;
            }
            Err(e) => return Step::Error(e.into()),
        };

        match self.interpreter.eval_global(&program) {
            Ok(value) => Step::Value(value),
            Err(e) => Step::Error(e.into()),
        }
    }

    fn command(&mut self, command: &str) -> Step {
        match command {
            ":quit" | ":q" => Step::Quit,
            ":help" | ":h" => Step::Message(
                [
                    "Commands:",
                    "  :help, :h    Show this help",
                    "  :env         List global bindings",
                    "  :quit, :q    Exit the REPL",
                ]
                .join("\n"),
            ),
            ":env" => {
                let lines: Vec<String> = self
                    .interpreter
                    .global()
                    .bindings()
                    .into_iter()
                    .map(|(name, value)| format!("  {} = {}", name, value))
                    .collect();
                Step::Message(lines.join("\n"))
            }
            other => Step::Error(miette::miette!("Unknown command {}", other)),
        }
    }

    /// Run the loop on the terminal until EOF or `:quit`
    pub fn run(mut self) -> Result<()> {
        println!("Eva REPL v{}", crate::VERSION);
        println!("Type :help for help, :quit to exit");
        println!();

        let mut editor = DefaultEditor::new().into_diagnostic()?;

        loop {
            let prompt = if self.is_continuing() { CONTINUATION } else { PROMPT };
            let line = match editor.readline(prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    self.buffer.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e).into_diagnostic(),
            };

            if line.trim().is_empty() && !self.is_continuing() {
                continue;
            }
            editor.add_history_entry(line.as_str()).into_diagnostic()?;

            match self.feed(&line) {
                Step::Incomplete => {}
                Step::Value(Value::Undefined) => {}
                Step::Value(value) => println!("{:?}", value),
                Step::Error(report) => eprintln!("{:?}", report),
                Step::Message(text) => println!("{}", text),
                Step::Quit => break,
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> Repl {
        Repl::new(Interpreter::builder().capture_output().build())
    }

    #[test]
    fn test_state_persists_between_lines() {
        let mut repl = repl();
        assert!(matches!(repl.feed("(var x 41)"), Step::Value(_)));
        match repl.feed("(+ x 1)") {
            Step::Value(v) => assert_eq!(v, Value::Number(42.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_multi_line_input() {
        let mut repl = repl();
        assert!(matches!(repl.feed("(def add (a b)"), Step::Incomplete));
        assert!(repl.is_continuing());
        assert!(matches!(repl.feed("  (+ a b))"), Step::Value(_)));
        match repl.feed("(add 2 3)") {
            Step::Value(v) => assert_eq!(v, Value::Number(5.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_error_then_resume() {
        let mut repl = repl();
        assert!(matches!(repl.feed("missing"), Step::Error(_)));
        assert!(!repl.is_continuing());
        assert!(matches!(repl.feed("(var ok 1)"), Step::Value(_)));
    }

    #[test]
    fn test_commands() {
        let mut repl = repl();
        assert!(matches!(repl.feed(":q"), Step::Quit));
        match repl.feed(":env") {
            Step::Message(text) => assert!(text.contains("VERSION")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
