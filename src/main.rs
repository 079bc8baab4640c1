use clap::{CommandFactory, Parser};
use monte::{game, Options};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(error) = color_eyre::install() {
        eprintln!("monte: failed to install error reporting: {error}");
        return ExitCode::FAILURE;
    }

    let opts = match Options::try_parse() {
        Ok(opts) => opts,
        Err(error) if !error.use_stderr() => {
            // --help and --version are not failures.
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = error.print();
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = opts.output.trace_init() {
        eprintln!("monte: failed to initialize diagnostics: {error}");
        return ExitCode::FAILURE;
    }

    if let Err(error) = opts.validate() {
        eprintln!("{error}");
        eprintln!("{}", Options::command().render_usage());
        return ExitCode::FAILURE;
    }

    tracing::debug!(cards = opts.cards, guess = opts.guess, "starting a round");

    match game::run(&opts) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!(%error, "the round could not finish");
            eprintln!("monte: {error}");
            ExitCode::FAILURE
        }
    }
}
