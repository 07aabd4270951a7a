// Copyright (c) 2026 rezky_nightky

/// How a composed frame reaches the screen. Fixed for the whole run.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Clear the screen and reprint every row each tick
    Full,
    /// Rewrite only the cells that changed since the previous tick
    Diff,
}

impl RenderMode {
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Full => "full",
            RenderMode::Diff => "diff",
        }
    }
}
