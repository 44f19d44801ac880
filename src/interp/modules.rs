//! Module sources
//!
//! `(import Name)` asks a [`ModuleSource`] for the text of `Name`. The
//! interpreter does the parsing and evaluation; a source only finds text.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::error::RuntimeError;
use crate::config::ModuleSettings;

/// Provider of module source text by name
pub trait ModuleSource {
    fn load(&self, name: &str) -> Result<String, RuntimeError>;
}

/// Looks up `<dir>/<name>.<extension>` in each search path, first hit wins
#[derive(Debug, Clone)]
pub struct FileModuleSource {
    search_paths: Vec<PathBuf>,
    extension: String,
}

impl FileModuleSource {
    pub fn new(search_paths: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        FileModuleSource {
            search_paths,
            extension: extension.into(),
        }
    }

    pub fn from_settings(settings: &ModuleSettings) -> Self {
        Self::new(settings.search_paths.clone(), settings.extension.clone())
    }

    fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.search_paths
            .iter()
            .map(move |dir| dir.join(format!("{}.{}", name, self.extension)))
    }
}

impl Default for FileModuleSource {
    fn default() -> Self {
        Self::from_settings(&ModuleSettings::default())
    }
}

impl ModuleSource for FileModuleSource {
    fn load(&self, name: &str) -> Result<String, RuntimeError> {
        // Module names are plain identifiers, never paths
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(RuntimeError::ModuleLoad {
                name: name.to_string(),
                reason: "module names cannot contain path separators".to_string(),
            });
        }

        for path in self.candidates(name) {
            if path.is_file() {
                tracing::debug!("Loading module {} from {}", name, path.display());
                return std::fs::read_to_string(&path).map_err(|e| RuntimeError::ModuleLoad {
                    name: name.to_string(),
                    reason: format!("{}: {}", path.display(), e),
                });
            }
        }

        Err(RuntimeError::ModuleNotFound {
            name: name.to_string(),
        })
    }
}

/// Serves modules from memory
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleSource {
    modules: FxHashMap<String, String>,
}

impl MemoryModuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under `name`
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.modules.insert(name.into(), source.into());
        self
    }
}

impl ModuleSource for MemoryModuleSource {
    fn load(&self, name: &str) -> Result<String, RuntimeError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::ModuleNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source() {
        let source = MemoryModuleSource::new().with("Math", "(def square (x) (* x x))");
        assert!(source.load("Math").is_ok());
        assert_eq!(
            source.load("Nope"),
            Err(RuntimeError::ModuleNotFound {
                name: "Nope".to_string()
            })
        );
    }

    #[test]
    fn test_file_source_rejects_paths() {
        let source = FileModuleSource::default();
        assert!(matches!(
            source.load("../secret"),
            Err(RuntimeError::ModuleLoad { .. })
        ));
    }

    #[test]
    fn test_file_source_reads_first_hit() {
        let dir = std::env::temp_dir().join(format!("eva-modules-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Greeting.eva"), "(var hello \"hi\")").unwrap();

        let source = FileModuleSource::new(vec![dir.join("missing"), dir.clone()], "eva");
        assert_eq!(source.load("Greeting").unwrap(), "(var hello \"hi\")");
        assert!(matches!(
            source.load("Absent"),
            Err(RuntimeError::ModuleNotFound { .. })
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
