use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use bigo::cli::{analyze_stdin, collect_files, format_reports, process_files};
use bigo::{Cli, Config};

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("bigo=debug")
  } else {
    EnvFilter::try_from_env("BIGO_LOG").unwrap_or_else(|_| EnvFilter::new("bigo=warn"))
  };
  tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

  if !console::Term::stdout().is_term() {
    colored::control::set_override(false);
  }

  let config = match &cli.config {
    Some(path) => Config::load_from_file(path).with_context(|| format!("failed to load config from {path}"))?,
    None => Config::load().context("failed to load config")?,
  };

  let mut reports = Vec::new();

  if cli.reads_stdin() {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source).context("failed to read stdin")?;
    reports.push(analyze_stdin(&source));
  }

  let files = collect_files(&cli.paths, &config).context("failed to collect files")?;
  reports.extend(process_files(&files, &config).context("failed to analyze files")?);

  let output = format_reports(&reports, cli.resolve_format(&config), cli.show_diagnostics(&config));
  if output.ends_with('\n') {
    print!("{output}");
  } else {
    println!("{output}");
  }

  Ok(())
}
