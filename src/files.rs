use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Directory listing for Browse mode: one level at a time, directories
/// first, traversal clamped at the project root.
pub struct FileExplorer {
    root: PathBuf,
    cwd: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected: usize,
}

impl FileExplorer {
    pub fn new(root: &Path) -> Result<Self> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let mut explorer = Self {
            cwd: root.clone(),
            root,
            entries: Vec::new(),
            selected: 0,
        };
        explorer.refresh()?;
        Ok(explorer)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.entries.clear();

        // ".." entry only below the project root; going above it is clamped
        if self.cwd != self.root {
            self.entries.push(FileEntry {
                path: self.cwd.parent().unwrap_or(&self.root).to_path_buf(),
                name: String::from(".."),
                is_dir: true,
            });
        }

        let mut listed: Vec<_> = fs::read_dir(&self.cwd)?.filter_map(|e| e.ok()).collect();
        listed.sort_by(|a, b| {
            let a_is_dir = a.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let b_is_dir = b.file_type().map(|t| t.is_dir()).unwrap_or(false);
            match (a_is_dir, b_is_dir) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.file_name().cmp(&b.file_name()),
            }
        });

        for entry in listed {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || name == "target" {
                continue;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            self.entries.push(FileEntry {
                path: entry.path(),
                name,
                is_dir,
            });
        }

        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        Ok(())
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    /// Open the selected entry: descend into a directory (returning `None`)
    /// or hand back a file path for the session to load.
    pub fn enter(&mut self) -> Result<Option<PathBuf>> {
        let Some(entry) = self.selected_entry() else {
            return Ok(None);
        };
        if entry.is_dir {
            let target = entry.path.clone();
            // never navigate above the root
            if target == self.root || target.starts_with(&self.root) {
                self.cwd = target;
                self.selected = 0;
                self.refresh()?;
            }
            Ok(None)
        } else {
            Ok(Some(entry.path.clone()))
        }
    }

    fn validate_filename(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(anyhow::anyhow!("Filename cannot be empty"));
        }
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(anyhow::anyhow!(
                "Invalid filename: contains path separators or '..'"
            ));
        }
        let invalid_chars = ['<', '>', ':', '"', '|', '?', '*', '\0'];
        if name.chars().any(|c| invalid_chars.contains(&c)) {
            return Err(anyhow::anyhow!("Filename contains invalid characters"));
        }
        Ok(())
    }

    /// Create an empty file in the current directory and return its path.
    pub fn create_file(&mut self, name: &str) -> Result<PathBuf> {
        Self::validate_filename(name)?;
        let path = self.cwd.join(name);
        if path.exists() {
            return Err(anyhow::anyhow!("File already exists"));
        }
        fs::File::create(&path)?;
        self.refresh()?;
        Ok(path)
    }
}
