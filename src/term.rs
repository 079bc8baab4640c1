//! Output configuration: colors and diagnostics logging.
use crate::Result;
use clap::{ArgGroup, Args};
use std::fmt;

pub use owo_colors::{style, OwoColorize, Style};

const ARG_GROUP: &str = "output-opts";

/// Options that configure the game's terminal output.
#[derive(Debug, Args)]
#[command(
    next_help_heading = "Output Options",
    group = ArgGroup::new(ARG_GROUP).multiple(true),
)]
pub struct OutputOptions {
    /// Whether to emit colors in output.
    #[clap(
        long,
        env = "CARGO_TERM_COLORS",
        default_value_t = ColorMode::Auto,
        global = true,
        group = ARG_GROUP,
    )]
    pub color: ColorMode,

    /// Configures diagnostic logging (game output always goes to stdout
    /// unfiltered).
    #[clap(
        short,
        long,
        env = "RUST_LOG",
        default_value = "monte=info,warn",
        global = true,
        group = ARG_GROUP,
    )]
    pub log: tracing_subscriber::filter::Targets,
}

/// Whether to color terminal output.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ColorMode {
    /// Determine whether to color output based on whether or not the
    /// stream is a TTY.
    Auto,
    /// Always color output.
    Always,
    /// Never color output.
    Never,
}

// === impl OutputOptions ===

impl OutputOptions {
    /// Initializes the diagnostics subscriber: fmt layer on stderr plus
    /// span traces for error reports.
    pub fn trace_init(&self) -> Result<()> {
        use tracing_subscriber::prelude::*;

        let fmt = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(self.color.should_color_stderr());

        tracing_subscriber::registry()
            .with(fmt)
            .with(tracing_error::ErrorLayer::default())
            .with(self.log.clone())
            .try_init()?;
        Ok(())
    }
}

// === impl ColorMode ===

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        }
    }

    pub fn should_color_stdout(self) -> bool {
        match self {
            ColorMode::Auto => atty::is(atty::Stream::Stdout),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    pub fn should_color_stderr(self) -> bool {
        match self {
            ColorMode::Auto => atty::is(atty::Stream::Stderr),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Returns `style` if stdout should be colored, and an empty style
    /// otherwise.
    pub fn if_color_stdout(self, style: owo_colors::Style) -> owo_colors::Style {
        if self.should_color_stdout() {
            style
        } else {
            owo_colors::style()
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Auto
    }
}
