#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use bootstrap::{AppConfig, init_logging};
use clap::{Args, Parser};
use registrar::config::MODULE_NAME;
use registrar::{AddressDescriptor, LocalDirectory, Mapping, Mode, Orchestrator, RegistrarConfig, uaddr};

/// pmreg - announce the NFS, MOUNT and STAT services to the port mapper
#[derive(Parser)]
#[command(name = "pmreg")]
#[command(about = "Withdraw stale RPC registrations and announce NFS, MOUNT and STAT")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    mode: ModeFlags,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Print the resulting directory table after the run
    #[arg(long)]
    dump: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
struct ModeFlags {
    /// Only withdraw existing registrations; takes precedence over -s
    #[arg(short = 'u')]
    unset_only: bool,

    /// Register only the status service on its fixed ports
    #[arg(short = 's')]
    statd_only: bool,
}

impl ModeFlags {
    fn mode(&self) -> Mode {
        Mode::from_flags(self.unset_only, self.statd_only)
    }
}

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.verbose);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let registrar_config: RegistrarConfig = config.module_config(MODULE_NAME)?;

    let _logging = init_logging(&config.logging, &config.server.home_dir);

    let mode = cli.mode.mode();
    tracing::info!(%mode, home_dir = %config.server.home_dir.display(), "pmreg starting");

    let directory = Arc::new(LocalDirectory::new(registrar_config.owner.clone()));
    let report = Orchestrator::new(directory.clone(), registrar_config).run(mode);
    if !report.is_clean() {
        tracing::warn!(
            failed = report.failed(),
            attempted = report.attempted(),
            "Some registrations failed"
        );
    }

    if cli.dump {
        print!("{}", render_table(&directory.dump()));
    }

    Ok(())
}

/// Directory rows in the column layout of `rpcinfo`.
fn render_table(rows: &[Mapping]) -> String {
    let mut out = format!(
        "{:>10} {:>5} {:<10} {:<24} {:>5} {}\n",
        "program", "vers", "netid", "address", "port", "owner"
    );
    for row in rows {
        _ = writeln!(
            out,
            "{:>10} {:>5} {:<10} {:<24} {:>5} {}",
            row.program,
            row.version,
            row.net_id.as_str(),
            row.uaddr(),
            port_column(row),
            row.owner
        );
    }
    out
}

/// Port decoded back from an inet row's universal address.
fn port_column(row: &Mapping) -> String {
    if matches!(row.address, AddressDescriptor::LocalPath { .. }) {
        return "-".to_owned();
    }
    uaddr::parse(&row.uaddr()).map_or_else(|_| "?".to_owned(), |addr| addr.port().to_string())
}
