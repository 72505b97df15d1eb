mod config;
mod logger;
mod output;

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use bracket_engine_core::{Format, System, Tournament};
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::config::{Config, ConfigError};

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Path to the TOML tournament description.
    #[arg(short, long, default_value = "tournament.toml")]
    config: PathBuf,
    #[arg(short, long, value_enum, default_value_t = Output::Table)]
    output: Output,
    /// Pretty print JSON output.
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Json,
    Table,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] bracket_engine_core::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = Config::from_file(&args.config)?.with_environment();
    logger::init(config.loglevel);

    log::debug!("Using config: {:?}", config);

    let format: Format = config.format.parse()?;
    let tournament = Tournament::new(
        config.tournament_id,
        format,
        config.participants(),
        config.options.clone(),
    )?;

    log::info!(
        "Generated {} matches for tournament {}",
        tournament.graph().len(),
        config.tournament_id
    );

    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match args.output {
        Output::Json => {
            if args.pretty {
                serde_json::to_writer_pretty(&mut writer, tournament.graph())?;
            } else {
                serde_json::to_writer(&mut writer, tournament.graph())?;
            }

            writeln!(writer)?;
        }
        Output::Table => {
            let names: HashMap<_, _> = config
                .participants
                .iter()
                .map(|p| (p.id, p.name.as_str()))
                .collect();

            output::write_matches(&mut writer, tournament.graph(), &names)?;

            if let Some(standings) = tournament.initial_standings() {
                writeln!(writer)?;
                output::write_standings(&mut writer, &standings)?;
            }
        }
    }

    Ok(())
}
