use crate::errors::ExtractError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Enumerates header units below a directory.
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: vec!["h".to_string()],
            ignore_patterns: vec![],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Invalid patterns are reported up front rather than silently never matching.
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Result<Self, ExtractError> {
        self.ignore_patterns = patterns
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| {
                    ExtractError::config(format!("invalid ignore pattern '{pattern}': {e}"))
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Matching files, sorted lexicographically by path.
    pub fn walk(&self) -> Result<Vec<PathBuf>, ExtractError> {
        if !self.root.is_dir() {
            return Err(ExtractError::Walk(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| ExtractError::Walk(e.to_string()))?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext_str = ext.to_string_lossy();
        if !self.extensions.iter().any(|e| e == ext_str.as_ref()) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

/// All `.h` units below `root`.
pub fn find_header_files(root: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    FileWalker::new(root.to_path_buf()).walk()
}
