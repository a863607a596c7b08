mod cleaner;
mod cli;
mod locator;
mod logging;
mod output;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::locator::{Environment, HostEnvironment, Platform};

fn main() -> anyhow::Result<()> {
    cli::Cli::parse();
    logging::init_logger();

    let target = report::report_path();
    run(&Platform::current(), &HostEnvironment, &target)?;

    output::print_report_location(&target);
    Ok(())
}

/// Clean every temp directory known for `platform` and append the report to `target`.
fn run(platform: &Platform, env: &dyn Environment, target: &Path) -> anyhow::Result<()> {
    if let Platform::Other(os) = platform {
        info!("no temporary directories known for {os}");
    }
    let temp_dirs = locator::locate(platform, env);
    clean_and_report(&temp_dirs, target)
}

fn clean_and_report(temp_dirs: &[PathBuf], target: &Path) -> anyhow::Result<()> {
    let mut lines = Vec::new();
    for dir in temp_dirs {
        info!("cleaning {}", dir.display());
        let result = cleaner::clean(dir);
        info!(
            files = result.files_deleted,
            dirs = result.dirs_deleted,
            errors = result.errors().count(),
            "finished {}",
            dir.display()
        );
        lines.extend(report::directory_block(dir, &result));
    }

    report::append_report(target, &lines)
        .with_context(|| format!("cannot write report to {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::fake::FakeEnv;
    use std::fs;
    use tempfile::TempDir;

    fn fill(dir: &Path) {
        fs::write(dir.join("a.txt"), b"a").unwrap();
        fs::create_dir(dir.join("sub")).unwrap();
        fs::write(dir.join("sub/b.txt"), b"b").unwrap();
    }

    /// Report text without the timestamped header line.
    fn body(report: &str) -> Vec<&str> {
        report
            .lines()
            .filter(|l| !l.starts_with("--- Rapport de Maintenance ("))
            .collect()
    }

    #[test]
    fn duplicate_temp_dir_gets_two_sections() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let target = out.path().join(report::REPORT_FILE_NAME);
        fill(temp.path());

        // Linux lists /tmp and the default temp dir, which are usually the same.
        let dirs = vec![temp.path().to_path_buf(), temp.path().to_path_buf()];
        clean_and_report(&dirs, &target).unwrap();

        let text = fs::read_to_string(&target).unwrap();
        let header = format!("[NETTOYAGE] Répertoire : {}", temp.path().display());
        assert_eq!(
            body(&text),
            vec![
                "",
                "",
                "",
                header.as_str(),
                "  -> Fichiers supprimés : 2",
                "  -> Dossiers supprimés : 1",
                "  -> Aucune erreur détectée.",
                "",
                header.as_str(),
                "  -> Fichiers supprimés : 0",
                "  -> Dossiers supprimés : 0",
                "  -> Aucune erreur détectée.",
            ]
        );
        assert!(temp.path().is_dir());
    }

    #[test]
    fn windows_run_cleans_user_temp_and_reports_missing_system_temp() {
        let user_temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let target = out.path().join(report::REPORT_FILE_NAME);
        fill(user_temp.path());

        let system_root = out.path().join("no-such-root");
        let env = FakeEnv::new(user_temp.path())
            .with_var("SystemRoot", &system_root.display().to_string());
        run(&Platform::Windows, &env, &target).unwrap();

        let text = fs::read_to_string(&target).unwrap();
        let system_temp = format!(r"{}\Temp", system_root.display());
        let user_header = format!("[NETTOYAGE] Répertoire : {}", user_temp.path().display());
        let system_header = format!("[NETTOYAGE] Répertoire : {system_temp}");
        let missing = format!("     - Chemin inexistant : {system_temp}");
        assert_eq!(
            body(&text),
            vec![
                "",
                "",
                "",
                user_header.as_str(),
                "  -> Fichiers supprimés : 2",
                "  -> Dossiers supprimés : 1",
                "  -> Aucune erreur détectée.",
                "",
                system_header.as_str(),
                "  -> Fichiers supprimés : 0",
                "  -> Dossiers supprimés : 0",
                "  -> Erreurs :",
                missing.as_str(),
            ]
        );
    }

    #[test]
    fn unknown_platform_still_writes_a_header() {
        let out = TempDir::new().unwrap();
        let target = out.path().join(report::REPORT_FILE_NAME);
        let env = FakeEnv::new(out.path());

        run(&Platform::Other("plan9".into()), &env, &target).unwrap();
        run(&Platform::Other("plan9".into()), &env, &target).unwrap();

        let text = fs::read_to_string(&target).unwrap();
        assert_eq!(text.matches("--- Rapport de Maintenance (").count(), 2);
        assert!(!text.contains("[NETTOYAGE]"));
    }

    #[test]
    fn unwritable_report_fails_the_run() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("missing").join(report::REPORT_FILE_NAME);
        let err = clean_and_report(&[], &target).unwrap_err();
        assert!(err.to_string().starts_with("cannot write report to"));
    }
}
