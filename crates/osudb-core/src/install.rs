use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub const LIBRARY_FILE: &str = "osu!.db";
pub const COLLECTIONS_FILE: &str = "collection.db";
pub const SCORES_FILE: &str = "scores.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DbKind {
    Library,
    Collections,
    Scores,
}

impl DbKind {
    pub const ALL: [DbKind; 3] = [DbKind::Library, DbKind::Collections, DbKind::Scores];

    pub fn file_name(self) -> &'static str {
        match self {
            DbKind::Library => LIBRARY_FILE,
            DbKind::Collections => COLLECTIONS_FILE,
            DbKind::Scores => SCORES_FILE,
        }
    }

    /// Guesses the database kind from a file name, ignoring case.
    pub fn from_path(p: &Path) -> Option<Self> {
        let name = p.file_name()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.file_name() == name)
    }
}

/// Database files present in an installation directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallFiles {
    pub library: Option<PathBuf>,
    pub collections: Option<PathBuf>,
    pub scores: Option<PathBuf>,
}

impl InstallFiles {
    pub fn get(&self, kind: DbKind) -> Option<&Path> {
        match kind {
            DbKind::Library => self.library.as_deref(),
            DbKind::Collections => self.collections.as_deref(),
            DbKind::Scores => self.scores.as_deref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DbKind, &Path)> {
        DbKind::ALL
            .into_iter()
            .filter_map(|k| self.get(k).map(|p| (k, p)))
    }
}

pub fn is_install_root(p: &Path) -> bool {
    p.is_dir() && p.join(LIBRARY_FILE).is_file()
}

/// Finds the database files in `root`, matching names case-insensitively.
pub fn locate(root: &Path) -> InstallFiles {
    let mut out = InstallFiles::default();
    let Ok(rd) = fs::read_dir(root) else {
        return out;
    };
    let mut entries: Vec<PathBuf> = rd.flatten().map(|e| e.path()).filter(|p| p.is_file()).collect();
    entries.sort();
    for p in entries {
        let slot = match DbKind::from_path(&p) {
            Some(DbKind::Library) => &mut out.library,
            Some(DbKind::Collections) => &mut out.collections,
            Some(DbKind::Scores) => &mut out.scores,
            None => continue,
        };
        if slot.is_none() {
            *slot = Some(p);
        }
    }
    out
}
