use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;

use tintlog::cli::Cli;
use tintlog::config::Config;
use tintlog::{Level, Logger, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tintlog: {e}");
            return ExitCode::from(1);
        }
    };
    let level = match cli.level.parse::<Level>() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("tintlog: {e}");
            return ExitCode::from(1);
        }
    };

    let mut logger = config.build_logger();

    if cli.session {
        return run_session(logger);
    }

    if !cli.message.is_empty() {
        log_line(&mut logger, level, &cli.message.join(" "));
        return ExitCode::SUCCESS;
    }

    let stdin = io::stdin();
    for line_result in stdin.lock().lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => continue,
            Err(e) => {
                eprintln!("tintlog: read error: {e}");
                return ExitCode::from(2);
            }
        };
        log_line(&mut logger, level, &line);
    }

    ExitCode::SUCCESS
}

fn log_line(logger: &mut Logger, level: Level, line: &str) {
    if level == Level::Fatal {
        logger.fatal(&[&line]);
    } else {
        logger.log(level, &[&line]);
    }
}

/// Record every stdin line as a session checkpoint and report the timings as
/// one block when input ends.
fn run_session(logger: Logger) -> ExitCode {
    let logger = Mutex::new(logger);
    let mut session = Session::with_logger(&logger);

    let stdin = io::stdin();
    for line_result in stdin.lock().lines() {
        match line_result {
            Ok(line) => session.append(&[&line]),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => continue,
            Err(e) => {
                eprintln!("tintlog: read error: {e}");
                return ExitCode::from(2);
            }
        }
    }

    session.flush();
    ExitCode::SUCCESS
}
