use std::env;
use std::fs;
use std::io;
use std::path::Path;

use bracket_engine_core::options::TournamentOptionValues;
use bracket_engine_core::{Participant, ParticipantId, TournamentId};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

/// The description of a tournament to generate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    pub tournament_id: TournamentId,
    /// Parsed with `Format::from_str`, so `double-elimination` works as well.
    pub format: String,
    pub options: TournamentOptionValues,
    pub participants: Vec<ParticipantConfig>,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;

        Ok(toml::from_str(&buf)?)
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "BE_LOGLEVEL", loglevel, "BE_FORMAT", format);

        self
    }

    pub fn participants(&self) -> impl Iterator<Item = Participant> + '_ {
        self.participants
            .iter()
            .map(|p| Participant::new(p.id, p.name.clone(), p.seed))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            tournament_id: TournamentId(0),
            format: String::from("single_elimination"),
            options: TournamentOptionValues::default(),
            participants: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantConfig {
    pub id: ParticipantId,
    pub name: String,
    /// Only required for elimination formats.
    #[serde(default)]
    pub seed: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
