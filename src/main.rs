use anyhow::Result;
use clap::Parser;
use diffvi::pipeline::session::{DiffConfig, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "diffvi",
    version = "0.1.0",
    about = "Generate LabVIEW diff images",
    long_about = "Finds LabVIEW VI files which changed relative to a target git ref \
    and drives the DiffVI operation through g-cli to render a visual diff for each one. \
    Individual diff failures are recorded in diff_failures.txt and do not abort the run.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(long, help = "Year version of LabVIEW to use (example: '2020')")]
    labview_version: String,
    #[arg(long, help = "Path to the directory containing the DiffVI operation")]
    opdir: PathBuf,
    #[arg(long, help = "Directory to store diff output")]
    diffdir: PathBuf,
    #[arg(long, help = "Target branch or ref the diff is generated against")]
    target: String,
    #[arg(
        long,
        help = "File containing a list of VI name patterns to ignore, e.g. files created by the DQMH scripter"
    )]
    ignorefile: Option<PathBuf>,
    #[arg(long, help = "Tear LabVIEW down between diffs (slow, but safer)")]
    kill_labview: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DiffConfig::new(
        cli.labview_version,
        cli.opdir,
        cli.diffdir,
        cli.target,
        cli.ignorefile,
        cli.kill_labview,
    );

    let pwd = std::env::current_dir()?;
    let session = Session::new(&pwd.to_string_lossy(), config, Box::new(std::io::stdout()))?;

    session.run()
}
