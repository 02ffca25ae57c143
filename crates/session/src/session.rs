//! Import session orchestration.
//!
//! A session walks a fixed sequence: resolve the scenario, resolve its source
//! under the chosen root, scan, classify, resolve the window, ask the operator,
//! build the command, ask again, copy, and finally record the session in the
//! scenario's history. Any failure stops the sequence where it happened; a
//! declined confirmation stops it with [`Outcome::Aborted`].

use crate::classify::classify;
use crate::command::{self, TransferCommand};
use crate::error::{ErrorKind, Result};
use crate::history::{HistoryLog, HistoryRecord, HistoryStore};
use crate::scan::{self, ScanResult};
use crate::timestamp::Timestamp;
use crate::tool::TransferTool;
use crate::window::{self, TimeWindow};
use derive_more::Display;
use exn::ResultExt;
use photo_import_config::ImportConfig;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::instrument;

/// Everything the operator asked for when starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub scenario: String,
    /// Root the scenario's (relative) source is resolved against, usually a
    /// removable drive's mount point.
    pub source_root: PathBuf,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub dry_run: bool,
}

/// Resolved endpoints of a session, known before anything is scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub scenario: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub dry_run: bool,
}

/// What the operator confirms at the [`Gate::Import`] gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub scan: ScanResult,
    /// Extensions that were found but are neither included nor excluded.
    pub unexpected: BTreeSet<String>,
    pub window: TimeWindow,
}

/// The two points where the operator can stop a session.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// After the scan summary, before a command is built.
    #[display("import")]
    Import,
    /// After the rendered command is shown, before it runs.
    #[display("execute")]
    Execute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub window: TimeWindow,
    pub command: TransferCommand,
    /// Whether the session was written to history (never for dry runs).
    pub recorded: bool,
}

/// How a session ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(Summary),
    /// The operator declined at `gate`. Nothing was copied or recorded.
    Aborted { gate: Gate },
}

/// The interactive side of a session: receives progress and answers the two
/// confirmation gates.
pub trait Operator {
    fn started(&mut self, _plan: &Plan, _history: &HistoryLog) {}
    fn scan_started(&mut self, _plan: &Plan) {}
    /// Called once the scan ends, with `None` when it failed.
    fn scan_finished(&mut self, _scan: Option<&ScanResult>) {}
    fn confirm_import(&mut self, report: &ScanReport) -> bool;
    fn confirm_command(&mut self, command: &TransferCommand, rendered: &str) -> bool;
}

pub struct Session<'a> {
    config: &'a ImportConfig,
    tool: &'a dyn TransferTool,
    history: &'a HistoryStore,
}
impl<'a> Session<'a> {
    pub fn new(config: &'a ImportConfig, tool: &'a dyn TransferTool, history: &'a HistoryStore) -> Self {
        Self { config, tool, history }
    }

    /// Runs one import session to completion, abort, or failure.
    ///
    /// History is only written after a successful, non-dry-run copy. Failing
    /// scans and transfers leave it exactly as it was.
    #[instrument(skip_all, fields(scenario = %request.scenario, dry_run = request.dry_run))]
    pub fn run(&self, request: &SessionRequest, operator: &mut dyn Operator) -> Result<Outcome> {
        let name = request.scenario.as_str();
        let Some(scenario) = self.config.scenario(name) else {
            exn::bail!(ErrorKind::UnknownScenario {
                scenario: name.to_string(),
                known: self.config.scenarios().keys().cloned().collect(),
            });
        };
        tracing::debug!("Scenario resolved");

        let source = request.source_root.join(scenario.source());
        if !source.try_exists().unwrap_or(false) {
            exn::bail!(ErrorKind::SourceUnavailable { scenario: name.to_string(), path: source });
        }
        let plan = Plan {
            scenario: name.to_string(),
            destination: self.config.destination(name, scenario),
            source,
            dry_run: request.dry_run,
        };
        tracing::debug!(source = %plan.source.display(), destination = %plan.destination.display(), "Source resolved");

        let history = self.history.read(name).or_raise(|| ErrorKind::History { scenario: name.to_string() })?;
        operator.started(&plan, &history);

        operator.scan_started(&plan);
        let scanned = scan::scan(self.tool, &plan.source, request.from, request.to);
        operator.scan_finished(scanned.as_ref().ok());
        let scan = scanned.or_raise(|| ErrorKind::Scan { scenario: name.to_string() })?;
        tracing::debug!(files = scan.total(), "Scanned");

        let unexpected = classify(scan.found_extensions().keys(), self.config.include(), self.config.exclude());
        if !unexpected.is_empty() {
            tracing::info!(?unexpected, "Found files that are neither included nor excluded");
        }
        let window = window::resolve(request.from, request.to, scan.oldest(), scan.newest());
        tracing::debug!(?window, "Window resolved");

        let report = ScanReport { scan, unexpected, window };
        if !operator.confirm_import(&report) {
            tracing::info!(gate = %Gate::Import, "Aborted by operator");
            return Ok(Outcome::Aborted { gate: Gate::Import });
        }

        let command = command::build(
            plan.source.clone(),
            plan.destination.clone(),
            &window,
            self.config.include(),
            plan.dry_run,
        );
        let rendered = command.render(self.tool.program());
        tracing::debug!(command = %rendered, "Command built");
        if !operator.confirm_command(&command, &rendered) {
            tracing::info!(gate = %Gate::Execute, "Aborted by operator");
            return Ok(Outcome::Aborted { gate: Gate::Execute });
        }

        tracing::debug!("Executing");
        let status = self
            .tool
            .copy_files(&command)
            .or_raise(|| ErrorKind::TransferFailed { scenario: name.to_string(), code: None })?;
        if !status.success() {
            exn::bail!(ErrorKind::TransferFailed { scenario: name.to_string(), code: status.code });
        }

        let recorded = !plan.dry_run;
        if recorded {
            self.history
                .append(name, &HistoryRecord::from(window))
                .or_raise(|| ErrorKind::History { scenario: name.to_string() })?;
            tracing::debug!("History recorded");
        }
        Ok(Outcome::Completed(Summary { window, command, recorded }))
    }
}
