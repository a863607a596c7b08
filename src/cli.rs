use clap::Parser;

/// Takes no options: the temp directories come from the host OS and the
/// report always lands next to the executable.
#[derive(Parser)]
#[command(
    name = "tidytemp",
    about = "Empty the OS temporary directories and append a maintenance report",
    version
)]
pub struct Cli {}
