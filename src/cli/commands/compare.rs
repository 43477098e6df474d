//! Compare command implementation.
//!
//! The `watcher compare runtimes` command queries several hosts at once and
//! shows how consistent each runtime's version is across them.

use std::time::Duration;

use crate::cli::args::CompareRuntimesArgs;
use crate::client::{Connector, RemoteConnector};
use crate::compare::{CompareReport, Comparator, ComparisonSummary};
use crate::config::ResolvedApiKey;
use crate::error::Result;
use crate::render::{comparison_summary, comparison_table, to_structured, OutputFormat};
use crate::ui::UserInterface;

use super::dispatcher::{block_on, Command, CommandResult};

/// The compare command implementation.
pub struct CompareCommand<C: Connector + 'static = RemoteConnector> {
    args: CompareRuntimesArgs,
    format: OutputFormat,
    api_key: Option<ResolvedApiKey>,
    comparator: Comparator<C>,
}

impl CompareCommand<RemoteConnector> {
    /// Create a new compare command that talks to real hosts.
    pub fn new(
        args: CompareRuntimesArgs,
        format: OutputFormat,
        api_key: Option<ResolvedApiKey>,
    ) -> Self {
        Self::with_comparator(args, format, api_key, Comparator::new(RemoteConnector))
    }
}

impl<C: Connector + 'static> CompareCommand<C> {
    /// Create a compare command around an existing comparator.
    pub fn with_comparator(
        args: CompareRuntimesArgs,
        format: OutputFormat,
        api_key: Option<ResolvedApiKey>,
        comparator: Comparator<C>,
    ) -> Self {
        Self {
            args,
            format,
            api_key,
            comparator,
        }
    }

    fn run(&self) -> Result<CompareReport> {
        let api_key = self.api_key.as_ref().map(|k| k.value.as_str());
        block_on(async {
            let deadline = self
                .args
                .timeout
                .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
            self.comparator
                .compare(&self.args.hosts, api_key, deadline)
                .await
        })?
    }
}

impl<C: Connector + 'static> Command for CompareCommand<C> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = if self.format.is_table() {
            let mut spinner =
                ui.start_spinner(&format!("Comparing {} host(s)...", self.args.hosts.len()));
            let report = self.run();
            spinner.finish_clear();
            report?
        } else {
            self.run()?
        };

        for (host, error) in report.failed_hosts() {
            ui.warning(&format!("{}: {}", host, error));
        }

        let outcome = report.outcome();
        let Some(data) = report.comparison.as_ref() else {
            ui.error("No host could be queried");
            return Ok(CommandResult::failure(outcome.exit_code()));
        };

        if let Some(text) = to_structured(data, self.format)? {
            ui.emit(&text);
        } else {
            let table = comparison_table(data, ui.theme());
            ui.show_header("Runtime comparison");
            ui.emit(&table);
            ui.emit(&comparison_summary(&ComparisonSummary::of(data)).join("\n"));
        }

        let code = outcome.exit_code();
        Ok(if code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(code)
        })
    }
}
