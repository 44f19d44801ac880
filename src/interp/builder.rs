//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use crate::config::Config;

use super::env::Environment;
use super::eval::Interpreter;
use super::modules::{FileModuleSource, ModuleSource};
use super::native::{Output, Prelude};

/// Builder for [`Interpreter`].
///
/// Defaults: the standard prelude, default [`Config`], file-based modules
/// resolved from the config's search paths, and `print` going to stdout.
pub struct InterpreterBuilder {
    config: Config,
    prelude: Prelude,
    modules: Option<Box<dyn ModuleSource>>,
    output: Output,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            prelude: Prelude::standard(),
            modules: None,
            output: Output::Stdout,
        }
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the native functions and constants installed in the global scope
    #[must_use]
    pub fn prelude(mut self, prelude: Prelude) -> Self {
        self.prelude = prelude;
        self
    }

    #[must_use]
    pub fn modules(mut self, source: impl ModuleSource + 'static) -> Self {
        self.modules = Some(Box::new(source));
        self
    }

    /// Collect `print` output in memory instead of writing to stdout
    #[must_use]
    pub fn capture_output(mut self) -> Self {
        self.output = Output::Capture(Vec::new());
        self
    }

    pub fn build(self) -> Interpreter {
        let global = Environment::global();
        self.prelude.install(&global);

        let modules = match self.modules {
            Some(source) => source,
            None => Box::new(FileModuleSource::from_settings(&self.config.modules)),
        };

        Interpreter::from_parts(global, self.config, modules, self.output)
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
