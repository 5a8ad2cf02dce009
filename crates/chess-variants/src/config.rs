//! Game configuration loaded from TOML.
//!
//! ```toml
//! variant = "crazyhouse"
//! time_control = "3+2"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/ w KQkq - 0 1"
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::clock::TimeControl;
use crate::rules::{SetupError, VariantKind};

/// Errors that can occur when loading a configuration or building a board
/// from it.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configured position is not valid for the variant.
    #[error("Invalid starting position: {0}")]
    Setup(#[from] SetupError),
}

/// How to set up a game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct GameConfig {
    /// Defaults to standard chess.
    #[serde(default)]
    pub variant: VariantKind,
    /// Untimed when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_control: Option<TimeControl>,
    /// Starting position; the variant's own when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

impl GameConfig {
    /// Loads a configuration file.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Default configuration file: `game.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("game.toml")
    }

    /// Builds the configured board, with its clock if timed.
    pub fn build_board(&self) -> Result<Board, ConfigError> {
        let board = match &self.fen {
            Some(fen) => Board::from_fen(self.variant, fen)?,
            None => Board::new(self.variant)?,
        };
        Ok(match self.time_control {
            Some(control) => board.with_clock(control),
            None => board,
        })
    }
}
