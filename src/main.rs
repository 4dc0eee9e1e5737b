mod account;
mod bank;
mod config;
mod error;
mod io;
mod journal;
mod money;
mod shell;

use std::process::ExitCode;

use crate::bank::Bank;
use crate::config::Config;
use crate::io::Console;
use crate::journal::Journal;
use crate::shell::Shell;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::default();
    let journal = match Journal::open(&config.journal_path) {
        Ok(journal) => journal,
        Err(e) => {
            log::error!("failed to open {}: {}", config.journal_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let bank = Bank::from_seeds(&config.seeds, journal);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());
    let mut shell = Shell::new(bank, console, &config.journal_path);

    let outcome = shell.run();
    let (bank, _) = shell.finish();
    if let Err(e) = bank.close() {
        log::error!("failed to flush journal: {}", e);
        return ExitCode::FAILURE;
    }
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("shell stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
