// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::palette::{parse_drop_color, DropColor, DEFAULT_COLORS};
use crate::runtime::RenderMode;
use crate::shapes::{drop_shapes, Charset};
use crate::weather::{MAX_INTENSITY, MIN_INTENSITY};

pub const DEFAULT_DELAY_MS: u64 = 80;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rainfall",
    about = "Creates a rainfall effect in the CLI.",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(
        value_name = "COLORS",
        value_parser = parse_drop_color,
        help_heading = "APPEARANCE",
        help = "Drop colors to pick from (see --list-colors) [default: blue b_blue]"
    )]
    pub colors: Vec<DropColor>,

    #[arg(
        short = 'm',
        long = "monochrome",
        help_heading = "APPEARANCE",
        help = "Render every drop without color"
    )]
    pub monochrome: bool,

    #[arg(
        long = "charset",
        default_value_t = Charset::Auto,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Drop shapes (auto, unicode, ascii)"
    )]
    pub charset: Charset,

    #[arg(
        short = 'i',
        long = "intensity",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=10),
        help_heading = "RAIN",
        help = "Drops spawned per tick (min 1 max 10); drifts over time"
    )]
    pub intensity: u8,

    #[arg(
        short = 'd',
        long = "delay",
        default_value_t = DEFAULT_DELAY_MS,
        value_parser = clap::value_parser!(u64).range(10..=1000),
        help_heading = "RAIN",
        help = "Milliseconds between frames (min 10 max 1000)"
    )]
    pub delay_ms: u64,

    #[arg(
        long = "seed",
        help_heading = "RAIN",
        help = "Seed for a reproducible rainfall"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "mode",
        default_value_t = RenderMode::Diff,
        value_enum,
        help_heading = "GENERAL",
        help = "Screen update strategy (full, diff)"
    )]
    pub mode: RenderMode,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Append logs to PATH (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available colors and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Everything the render loop needs, validated.
#[derive(Clone, Debug)]
pub struct RainConfig {
    pub colors: Vec<DropColor>,
    pub monochrome: bool,
    pub shapes: &'static [char],
    pub intensity: u8,
    pub interval: Duration,
    pub seed: Option<u64>,
    pub mode: RenderMode,
    pub duration: Option<Duration>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
            monochrome: false,
            shapes: drop_shapes(Charset::Unicode, false),
            intensity: MIN_INTENSITY,
            interval: Duration::from_millis(DEFAULT_DELAY_MS),
            seed: None,
            mode: RenderMode::Diff,
            duration: None,
        }
    }
}

impl RainConfig {
    pub fn from_args(args: &Args, default_to_ascii: bool) -> Result<Self, ConfigError> {
        let intensity = require_range(
            "--intensity",
            args.intensity as u64,
            MIN_INTENSITY as u64,
            MAX_INTENSITY as u64,
        )? as u8;
        let delay_ms = require_range("--delay", args.delay_ms, 10, 1000)?;

        let colors = if args.colors.is_empty() {
            DEFAULT_COLORS.to_vec()
        } else {
            args.colors.clone()
        };

        Ok(Self {
            colors,
            monochrome: args.monochrome,
            shapes: drop_shapes(args.charset, default_to_ascii),
            intensity,
            interval: Duration::from_millis(delay_ms),
            seed: args.seed,
            mode: args.mode,
            duration: parse_duration(args.duration)?,
        })
    }
}

fn require_range(name: &'static str, value: u64, min: u64, max: u64) -> Result<u64, ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn parse_duration(secs: Option<f64>) -> Result<Option<Duration>, ConfigError> {
    let Some(s) = secs else {
        return Ok(None);
    };
    if !s.is_finite() {
        return Err(ConfigError::InvalidDuration(s));
    }
    if s <= 0.0 {
        return Ok(None);
    }
    if !(0.1..=86400.0).contains(&s) {
        return Err(ConfigError::InvalidDuration(s));
    }
    Ok(Some(Duration::from_secs_f64(s)))
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLORS:\x1b[0m");
        println!("\x1b[2mNOTE: Pass one or more VALUES as positional arguments.\x1b[0m");
    } else {
        println!("AVAILABLE COLORS:");
        println!("NOTE: Pass one or more VALUES as positional arguments.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    for &c in DropColor::all() {
        let desc = match c {
            DropColor::Reset => "Terminal default foreground (alias: Reset)".to_string(),
            c if c.is_bright() => {
                let base = c.name().trim_start_matches("b_");
                format!("Bright {} (alias: bright-{})", base, base)
            }
            c => format!("{}{}", c.name()[..1].to_ascii_uppercase(), &c.name()[1..]),
        };
        println!("{:<12} {}", c.name(), desc);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("rainfall").chain(argv.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_classic_rain() {
        let args = parse(&[]).unwrap();
        let cfg = RainConfig::from_args(&args, false).unwrap();
        assert_eq!(cfg.colors, DEFAULT_COLORS.to_vec());
        assert_eq!(cfg.intensity, 1);
        assert!(!cfg.monochrome);
        assert_eq!(cfg.interval, Duration::from_millis(80));
        assert_eq!(cfg.mode, RenderMode::Diff);
        assert_eq!(cfg.duration, None);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn positional_colors_and_flags() {
        let args = parse(&["red", "b_green", "-m", "-i", "7", "--mode", "full"]).unwrap();
        assert_eq!(args.colors, vec![DropColor::Red, DropColor::BrightGreen]);
        let cfg = RainConfig::from_args(&args, false).unwrap();
        assert!(cfg.monochrome);
        assert_eq!(cfg.intensity, 7);
        assert_eq!(cfg.mode, RenderMode::Full);
    }

    #[test]
    fn invalid_color_is_a_usage_error() {
        let err = parse(&["blue", "purple"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn intensity_must_be_an_integer_in_range() {
        assert!(parse(&["-i", "0"]).is_err());
        assert!(parse(&["-i", "11"]).is_err());
        assert!(parse(&["--intensity", "abc"]).is_err());
        assert!(parse(&["-i", "10"]).is_ok());
    }

    #[test]
    fn from_args_rejects_out_of_range_values_built_by_hand() {
        let mut args = parse(&[]).unwrap();
        args.intensity = 42;
        assert!(matches!(
            RainConfig::from_args(&args, false),
            Err(ConfigError::OutOfRange {
                name: "--intensity",
                ..
            })
        ));
    }

    #[test]
    fn duration_rules() {
        assert_eq!(parse_duration(None).unwrap(), None);
        assert_eq!(parse_duration(Some(0.0)).unwrap(), None);
        assert_eq!(parse_duration(Some(-3.0)).unwrap(), None);
        assert_eq!(
            parse_duration(Some(1.5)).unwrap(),
            Some(Duration::from_millis(1500))
        );
        assert!(parse_duration(Some(0.05)).is_err());
        assert!(parse_duration(Some(f64::NAN)).is_err());
        assert!(parse_duration(Some(90000.0)).is_err());
    }

    #[test]
    fn charset_auto_uses_ascii_for_non_utf_locales() {
        let args = parse(&[]).unwrap();
        let cfg = RainConfig::from_args(&args, true).unwrap();
        assert!(cfg.shapes.iter().all(|c| c.is_ascii()));

        let args = parse(&["--charset", "unicode"]).unwrap();
        let cfg = RainConfig::from_args(&args, true).unwrap();
        assert!(cfg.shapes.iter().any(|c| !c.is_ascii()));
    }
}
