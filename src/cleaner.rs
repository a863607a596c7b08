use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn label(self) -> &'static str {
        match self {
            EntryKind::File => "Fichier",
            EntryKind::Directory => "Dossier",
        }
    }
}

/// What happened to one path during a clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Deleted { kind: EntryKind, path: PathBuf },
    Failed {
        kind: EntryKind,
        path: PathBuf,
        reason: String,
    },
    /// The walk could not read this path, so nothing under it was attempted.
    Unreadable { path: PathBuf, reason: String },
    /// The directory handed to the cleaner does not exist.
    Missing { path: PathBuf },
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        !matches!(self, Outcome::Deleted { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Deleted { kind, path } => {
                let noun = match kind {
                    EntryKind::File => "Fichier supprimé",
                    EntryKind::Directory => "Dossier supprimé",
                };
                write!(f, "[OK] {noun} : {}", path.display())
            }
            Outcome::Failed { kind, path, reason } => write!(
                f,
                "[ERREUR] Suppression {} {} : {reason}",
                kind.label(),
                path.display()
            ),
            Outcome::Unreadable { path, reason } => {
                write!(f, "[ERREUR] Lecture {} : {reason}", path.display())
            }
            Outcome::Missing { path } => write!(f, "Chemin inexistant : {}", path.display()),
        }
    }
}

/// Result of cleaning one temp directory.
#[derive(Debug, Default)]
pub struct CleanResult {
    pub files_deleted: usize,
    pub dirs_deleted: usize,
    pub log: Vec<Outcome>,
}

impl CleanResult {
    fn record(&mut self, outcome: Outcome) {
        if let Outcome::Deleted { kind, .. } = &outcome {
            match kind {
                EntryKind::File => self.files_deleted += 1,
                EntryKind::Directory => self.dirs_deleted += 1,
            }
        }
        self.log.push(outcome);
    }

    /// Everything that was not a successful deletion.
    pub fn errors(&self) -> impl Iterator<Item = &Outcome> {
        self.log.iter().filter(|o| o.is_error())
    }
}

/// The two delete calls the walk needs.
pub trait Remover {
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()>;
}

pub struct StdRemover;

impl Remover for StdRemover {
    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// Delete everything under `root`, leaving `root` itself in place.
pub fn clean(root: &Path) -> CleanResult {
    clean_with(root, &StdRemover)
}

pub fn clean_with(root: &Path, remover: &dyn Remover) -> CleanResult {
    let mut result = CleanResult::default();

    if !root.exists() {
        result.record(Outcome::Missing {
            path: root.to_path_buf(),
        });
        return result;
    }

    // contents_first yields a directory only after its whole subtree. Each
    // level's entries wait in `pending[depth]` until their parent shows up,
    // so subtrees finish before the parent's own files and subdirectories.
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();

    let mut pending: Vec<Vec<DirEntry>> = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let outcome = Outcome::Unreadable {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    reason: e
                        .io_error()
                        .map(|io| io.to_string())
                        .unwrap_or_else(|| e.to_string()),
                };
                warn!("{outcome}");
                result.record(outcome);
                continue;
            }
        };

        let depth = entry.depth();
        if entry.file_type().is_dir() {
            if let Some(children) = pending.get_mut(depth + 1) {
                let children = std::mem::take(children);
                clear_level(children, remover, &mut result);
            }
        }
        if pending.len() <= depth {
            pending.resize_with(depth + 1, Vec::new);
        }
        pending[depth].push(entry);
    }

    if let Some(top) = pending.get_mut(1) {
        let top = std::mem::take(top);
        clear_level(top, remover, &mut result);
    }

    result
}

/// Files of one directory level first, then its subdirectories.
fn clear_level(entries: Vec<DirEntry>, remover: &dyn Remover, result: &mut CleanResult) {
    let (dirs, files): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.file_type().is_dir());

    for entry in files.iter().chain(dirs.iter()) {
        let outcome = delete_entry(entry, remover);
        match &outcome {
            Outcome::Deleted { .. } => debug!("{outcome}"),
            _ => warn!("{outcome}"),
        }
        result.record(outcome);
    }
}

fn delete_entry(entry: &DirEntry, remover: &dyn Remover) -> Outcome {
    let path = entry.path().to_path_buf();

    // Symlinks are never followed: a link to a directory is unlinked like a file.
    let (kind, removed) = if entry.file_type().is_dir() {
        (EntryKind::Directory, remover.remove_dir_all(&path))
    } else {
        (EntryKind::File, remover.remove_file(&path))
    };

    match removed {
        Ok(()) => Outcome::Deleted { kind, path },
        Err(e) => Outcome::Failed {
            kind,
            path,
            reason: e.to_string(),
        },
    }
}
