use std::path::Path;

use colored::Colorize;

pub fn print_report_location(path: &Path) {
    println!(
        "{} Rapport généré : {}",
        "[INFO]".cyan().bold(),
        path.display()
    );
}
