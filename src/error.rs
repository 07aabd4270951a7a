// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid grid size {width}x{height} (need width >= 1 and height >= 2)")]
    InvalidSize { width: u16, height: u16 },

    #[error("no drop colors configured")]
    EmptyPalette,

    #[error("no drop shapes configured")]
    EmptyShapes,

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("failed to apply --duration {0} (must be a finite number between 0.1 and 86400)")]
    InvalidDuration(f64),
}

#[derive(Debug, Error)]
pub enum RainError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal setup failed: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("failed to draw frame: {0}")]
    Render(#[source] std::io::Error),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RainError {
    /// Configuration problems exit like clap usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            RainError::Config(_) | RainError::LogFile { .. } => 2,
            RainError::Terminal(_) | RainError::Render(_) => 1,
        }
    }
}
