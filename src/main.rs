mod cli;
mod devices;
mod error;
mod logging;
mod prompt;

use crate::cli::{Cli, Command, ImportArgs};
use crate::error::{ErrorKind, Result, wrap};
use crate::prompt::CliOperator;
use clap::Parser;
use dialoguer::console::style;
use photo_import_config::{AppConfig, ImportConfig, Scenario};
use photo_import_session::error::ErrorKind as SessionErrorKind;
use photo_import_session::{HistoryStore, Outcome, Rclone, Session, SessionRequest};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for a session the operator declined at one of the gates.
const EXIT_ABORTED: u8 = 2;

enum Status {
    Done,
    Aborted,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(&cli) {
        Ok(Status::Done) => ExitCode::SUCCESS,
        Ok(Status::Aborted) => ExitCode::from(EXIT_ABORTED),
        Err(err) => {
            eprintln!("{} {}", style("error:").red().bold(), *err);
            if cli.verbose > 0 {
                eprintln!("{err:?}");
            }
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<Status> {
    let app = wrap(AppConfig::load(cli.config.as_deref()), ErrorKind::Config)?;
    match &cli.command {
        Command::Import(args) => import(&app, args),
        Command::Scenarios => {
            let config = load_import_config(&app)?;
            for (name, scenario) in config.scenarios() {
                println!(
                    "{:<16} {} -> {}",
                    style(name).cyan(),
                    scenario.source().display(),
                    config.destination(name, scenario).display()
                );
            }
            Ok(Status::Done)
        },
        Command::History { scenario } => {
            let log = wrap(history_store(&app).read(scenario), ErrorKind::History)?;
            if log.is_empty() {
                println!("No sessions recorded for `{scenario}`.");
            }
            for entry in log.iter() {
                println!("{entry}");
            }
            Ok(Status::Done)
        },
        Command::Devices => {
            for root in devices::list() {
                println!("{root}");
            }
            Ok(Status::Done)
        },
        Command::Config => {
            println!("{:<14} {}", style("import config").bold(), app.user_config.display());
            match &app.rclone {
                Some(path) => println!("{:<14} {}", style("rclone").bold(), path.display()),
                None => println!("{:<14} (looked up on PATH)", style("rclone").bold()),
            }
            println!(
                "{:<14} {} (keeping {} sessions)",
                style("history").bold(),
                app.history.dir.display(),
                app.history.max_entries
            );
            let config = load_import_config(&app)?;
            println!("{:<14} {}", style("target root").bold(), config.target_root().display());
            println!("{:<14} {}", style("include").bold(), join(config.include()));
            println!("{:<14} {}", style("exclude").bold(), join(config.exclude()));
            println!("{:<14} {}", style("scenarios").bold(), join(config.scenarios().keys()));
            Ok(Status::Done)
        },
    }
}

fn import(app: &AppConfig, args: &ImportArgs) -> Result<Status> {
    let config = load_import_config(app)?;
    let scenario = resolve_scenario(&config, &args.scenario)?;
    let tool = match &app.rclone {
        Some(path) => Rclone::at(path),
        None => Rclone::discover(),
    };
    let tool = wrap(tool, |message| ErrorKind::Import(format!("scenario `{}`: {message}", args.scenario)))?;
    // Absolute sources ignore the root, so there is no device to pick.
    let source_root = match &args.source_root {
        Some(root) => root.clone(),
        None if scenario.source().is_absolute() => PathBuf::new(),
        None => devices::choose().ok_or_else(|| exn::Exn::from(ErrorKind::NoSourceRoot))?,
    };
    let request = SessionRequest {
        scenario: args.scenario.clone(),
        source_root,
        from: args.from,
        to: args.to,
        dry_run: args.dry_run,
    };
    let history = history_store(app);
    let mut operator = CliOperator::new(args.yes);
    let outcome = wrap(Session::new(&config, &tool, &history).run(&request, &mut operator), ErrorKind::Import)?;
    match outcome {
        Outcome::Completed(summary) => {
            operator.completed(&summary);
            Ok(Status::Done)
        },
        Outcome::Aborted { gate } => {
            eprintln!("{} at the {gate} confirmation; nothing was copied.", style("Aborted").yellow());
            Ok(Status::Aborted)
        },
    }
}

/// Fails the same way a session would for an unknown scenario, before any
/// device or tool is looked up.
fn resolve_scenario<'a>(config: &'a ImportConfig, name: &str) -> Result<&'a Scenario> {
    match config.scenario(name) {
        Some(scenario) => Ok(scenario),
        None => {
            let unknown = SessionErrorKind::UnknownScenario {
                scenario: name.to_string(),
                known: config.scenarios().keys().cloned().collect(),
            };
            wrap(Err(exn::Exn::from(unknown)), ErrorKind::Import)
        },
    }
}

fn load_import_config(app: &AppConfig) -> Result<ImportConfig> {
    wrap(ImportConfig::load(&app.user_config), ErrorKind::Config)
}

fn history_store(app: &AppConfig) -> HistoryStore {
    HistoryStore::new(&app.history.dir).with_max_entries(app.history.max_entries)
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ImportConfig {
        ImportConfig::new("/srv/photos", ["jpg"], ["db"], [("kittens", Scenario::new("DCIM"))]).unwrap()
    }

    #[test]
    fn test_unknown_scenario_is_reported_by_name() {
        let config = config();
        let err = resolve_scenario(&config, "cats").unwrap_err();
        assert_eq!((*err).to_string(), "unknown scenario `cats` (configured: kittens)");
    }

    #[test]
    fn test_known_scenario_resolves() {
        let config = config();
        assert_eq!(resolve_scenario(&config, "kittens").unwrap().source(), std::path::Path::new("DCIM"));
    }
}
