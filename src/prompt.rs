//! Terminal front-end for import sessions.

use dialoguer::Confirm;
use dialoguer::console::{Term, style};
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use photo_import_session::{Bound, HistoryLog, Operator, Plan, ScanReport, ScanResult, Summary, TransferCommand};
use std::time::Duration;

pub struct CliOperator {
    assume_yes: bool,
    term: Term,
    spinner: Option<ProgressBar>,
}
impl CliOperator {
    /// With `assume_yes`, both gates are confirmed without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes, term: Term::stderr(), spinner: None }
    }

    pub fn completed(&self, summary: &Summary) {
        match summary.recorded {
            true => println!("{} Import complete; session recorded.", style("✓").green()),
            false => println!("{} Dry run complete; history left unchanged.", style("✓").green()),
        }
    }

    /// Anything other than an explicit "yes" declines: no terminal, a failed
    /// prompt, or an interrupted one.
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            tracing::info!(prompt, "Confirmed by --yes");
            return true;
        }
        if !self.term.is_term() {
            tracing::warn!(prompt, "Not a terminal; declining (use --yes to confirm non-interactively)");
            return false;
        }
        match Confirm::new().with_prompt(prompt).default(false).interact_on(&self.term) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation prompt failed; declining");
                false
            },
        }
    }
}

impl Operator for CliOperator {
    fn started(&mut self, plan: &Plan, history: &HistoryLog) {
        println!("{} {}", style("Scenario").bold(), style(&plan.scenario).cyan());
        println!("  from {}", plan.source.display());
        println!("  to   {}", plan.destination.display());
        if plan.dry_run {
            println!("  {}", style("dry run: nothing will be copied").yellow());
        }
        match history.is_empty() {
            true => println!("{}", style("No previous sessions.").dim()),
            false => {
                println!("{}", style("Previous sessions (oldest first):").bold());
                for entry in history.iter() {
                    println!("  {entry}");
                }
            },
        }
    }

    fn scan_started(&mut self, plan: &Plan) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        spinner.set_message(format!("Scanning {}", plan.source.display()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn scan_finished(&mut self, scan: Option<&ScanResult>) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        let Some(scan) = scan else { return };
        println!("{} Found {} files", style("✓").green(), HumanCount(scan.total() as u64));
        for (extension, count) in scan.found_extensions() {
            let extension = match extension.is_empty() {
                true => "(none)",
                false => extension.as_str(),
            };
            println!("  {extension:<8} {:>8}", HumanCount(*count as u64));
        }
    }

    fn confirm_import(&mut self, report: &ScanReport) -> bool {
        println!(
            "{} {} to {}",
            style("Window").bold(),
            describe_bound(&report.window.from),
            describe_bound(&report.window.to)
        );
        if !report.unexpected.is_empty() {
            let unexpected: Vec<&str> = report.unexpected.iter().map(String::as_str).collect();
            println!(
                "{} neither included nor excluded, will be skipped: {}",
                style("Warning:").yellow().bold(),
                unexpected.join(", ")
            );
        }
        self.confirm("Continue with this import?")
    }

    fn confirm_command(&mut self, _command: &TransferCommand, rendered: &str) -> bool {
        println!("{}", style("Command").bold());
        println!("  {rendered}");
        self.confirm("Run this command?")
    }
}

fn describe_bound(bound: &Bound) -> String {
    match bound.value {
        Some(value) => format!("{value} ({})", bound.provenance),
        None => format!("unbounded ({})", bound.provenance),
    }
}
