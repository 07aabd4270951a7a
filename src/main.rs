// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod error;
mod field;
mod frame;
mod logging;
mod palette;
mod rain;
mod raindrop;
mod runtime;
mod shapes;
mod terminal;
mod weather;

use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

use crate::config::{color_enabled_stdout, print_list_colors, Args, RainConfig};
use crate::error::RainError;
use crate::rain::Rain;
use crate::shapes::default_to_ascii;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Blue))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

/// Signals only raise the stop flag; the render loop notices it between
/// phases and restores the terminal itself.
fn install_stop_handlers(stop: &Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        for sig in [SIGINT, SIGTERM, SIGHUP] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(stop)) {
                eprintln!("failed to install handler for signal {}: {}", sig, e);
            }
        }
    }

    #[cfg(windows)]
    {
        let stop = Arc::clone(stop);
        if let Err(e) = ctrlc::set_handler(move || {
            stop.store(true, std::sync::atomic::Ordering::SeqCst);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn run(args: &Args) -> Result<(), RainError> {
    let config = RainConfig::from_args(args, default_to_ascii())?;
    logging::init_logging(args.log_file.as_deref())?;

    let (w, h) = Terminal::query_size().map_err(RainError::Terminal)?;
    let mut rain = Rain::new(&config, w, h)?;

    let stop = Arc::new(AtomicBool::new(false));
    install_stop_handlers(&stop);

    let mut term = Terminal::new().map_err(RainError::Terminal)?;
    let stats = rain.run(&mut term, &stop)?;
    tracing::debug!(?stats, "exiting");
    Ok(())
}

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let cmd = Args::command()
        .styles(clap_styles())
        .help_template(help_template);

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_colors {
        print_list_colors();
        return ExitCode::SUCCESS;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
