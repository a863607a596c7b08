use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::warn;

use crate::cleaner::CleanResult;

pub const REPORT_FILE_NAME: &str = "rapport_maintenance.txt";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Where the report lives: next to the running executable.
pub fn report_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    match dir {
        Some(dir) => dir.join(REPORT_FILE_NAME),
        None => {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            warn!(
                "cannot resolve executable directory, writing report under {}",
                home.display()
            );
            home.join(REPORT_FILE_NAME)
        }
    }
}

/// Report lines for one cleaned directory. Only counts and non-success
/// outcomes are written; individual deletions are not listed.
pub fn directory_block(dir: &Path, result: &CleanResult) -> Vec<String> {
    let mut lines = vec![
        format!("\n[NETTOYAGE] Répertoire : {}", dir.display()),
        format!("  -> Fichiers supprimés : {}", result.files_deleted),
        format!("  -> Dossiers supprimés : {}", result.dirs_deleted),
    ];

    let errors: Vec<String> = result.errors().map(|e| format!("     - {e}")).collect();
    if errors.is_empty() {
        lines.push("  -> Aucune erreur détectée.".to_string());
    } else {
        lines.push("  -> Erreurs :".to_string());
        lines.extend(errors);
    }

    lines
}

/// Append a block stamped with the current local time.
pub fn append_report(target: &Path, lines: &[String]) -> io::Result<()> {
    append_report_at(target, &Local::now(), lines)
}

pub fn append_report_at<Tz>(target: &Path, at: &DateTime<Tz>, lines: &[String]) -> io::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut block = format!(
        "\n\n--- Rapport de Maintenance ({}) ---\n",
        at.format(TIMESTAMP_FORMAT)
    );
    for line in lines {
        block.push_str(line);
        block.push('\n');
    }

    let mut file = OpenOptions::new().create(true).append(true).open(target)?;
    file.write_all(block.as_bytes())?;
    file.flush()
}
