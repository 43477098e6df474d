//! Get command implementations.
//!
//! `watcher get runtimes` lists installed runtimes and `watcher get runtime`
//! shows one of them, either on this host or on a remote one.

use crate::cli::args::{GetRuntimeArgs, GetRuntimesArgs};
use crate::client::RemoteClient;
use crate::config::ResolvedApiKey;
use crate::detection::{detector_names, find_detector, Runtime};
use crate::error::Result;
use crate::render::{runtime_table, runtimes_table, to_structured, OutputFormat};
use crate::server::ObservationService;
use crate::ui::UserInterface;

use super::dispatcher::{block_on, Command, CommandResult};

/// The `get runtimes` command implementation.
pub struct GetRuntimesCommand {
    args: GetRuntimesArgs,
    format: OutputFormat,
    api_key: Option<ResolvedApiKey>,
    service: ObservationService,
}

impl GetRuntimesCommand {
    /// Create a new get runtimes command.
    pub fn new(
        args: GetRuntimesArgs,
        format: OutputFormat,
        api_key: Option<ResolvedApiKey>,
    ) -> Self {
        Self::with_service(args, format, api_key, ObservationService::new())
    }

    /// Use `service` for local observation.
    pub fn with_service(
        args: GetRuntimesArgs,
        format: OutputFormat,
        api_key: Option<ResolvedApiKey>,
        service: ObservationService,
    ) -> Self {
        Self {
            args,
            format,
            api_key,
            service,
        }
    }

    fn observe(&self, ui: &mut dyn UserInterface) -> Result<Vec<Runtime>> {
        let Some(host) = self.args.host.as_deref() else {
            if self.format.is_table() {
                ui.message("Observing local runtimes...");
            }
            return Ok(self.service.observe(&self.args.runtime).runtimes);
        };

        if self.format.is_table() {
            ui.message(&format!("Observing runtimes on {}...", host));
        }
        let api_key = self.api_key.as_ref().map(|k| k.value.as_str());
        block_on(async {
            let mut client = RemoteClient::connect(host, api_key).await?;
            let runtimes = client.observe_filtered(&self.args.runtime).await;
            client.close();
            runtimes
        })?
    }
}

impl Command for GetRuntimesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runtimes = self.observe(ui)?;

        if let Some(text) = to_structured(&runtimes, self.format)? {
            ui.emit(&text);
            return Ok(CommandResult::success());
        }

        if runtimes.is_empty() {
            ui.warning("No runtimes detected");
            return Ok(CommandResult::success());
        }

        let title = match &self.args.host {
            Some(host) => format!("Runtimes on {}", host),
            None => "Installed runtimes".to_string(),
        };
        ui.show_header(&title);
        ui.emit(&runtimes_table(&runtimes));
        ui.success(&format!("Found {} runtime(s)", runtimes.len()));

        Ok(CommandResult::success())
    }
}

/// The `get runtime` command implementation.
pub struct GetRuntimeCommand {
    args: GetRuntimeArgs,
    format: OutputFormat,
    api_key: Option<ResolvedApiKey>,
}

impl GetRuntimeCommand {
    /// Create a new get runtime command.
    pub fn new(
        args: GetRuntimeArgs,
        format: OutputFormat,
        api_key: Option<ResolvedApiKey>,
    ) -> Self {
        Self {
            args,
            format,
            api_key,
        }
    }

    fn observe(&self, ui: &mut dyn UserInterface) -> Result<Runtime> {
        let name = self.args.name.as_str();

        let Some(host) = self.args.host.as_deref() else {
            let detector = match find_detector(name) {
                Ok(detector) => detector,
                Err(e) => {
                    if self.format.is_table() {
                        ui.message(&format!("Supported runtimes: {}", detector_names().join(", ")));
                    }
                    return Err(e);
                }
            };
            if self.format.is_table() {
                ui.message(&format!("Observing {} runtime...", name));
            }
            return detector.detect();
        };

        if self.format.is_table() {
            ui.message(&format!("Observing {} on {}...", name, host));
        }
        let api_key = self.api_key.as_ref().map(|k| k.value.as_str());
        block_on(async {
            let mut client = RemoteClient::connect(host, api_key).await?;
            let runtime = client.observe_runtime(name).await;
            client.close();
            runtime
        })?
    }
}

impl Command for GetRuntimeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runtime = self.observe(ui)?;

        if let Some(text) = to_structured(&runtime, self.format)? {
            ui.emit(&text);
            return Ok(CommandResult::success());
        }

        if !runtime.is_found() {
            ui.warning(&format!("{} is not installed", self.args.name));
            return Ok(CommandResult::success());
        }

        ui.success(&format!("{} detected", runtime.name()));
        ui.emit(&runtime_table(&runtime));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatcherError;
    use crate::server::observation::testing::stub_fleet;
    use crate::ui::MockUI;
    use httpmock::prelude::*;
    use serde_json::json;

    fn local_command(runtime: &[&str], format: OutputFormat) -> GetRuntimesCommand {
        GetRuntimesCommand::with_service(
            GetRuntimesArgs {
                host: None,
                runtime: runtime.iter().map(|s| s.to_string()).collect(),
            },
            format,
            None,
            ObservationService::with_provider(stub_fleet),
        )
    }

    #[test]
    fn local_table_lists_found_runtimes() {
        let mut ui = MockUI::new();
        let result = local_command(&[], OutputFormat::Table).execute(&mut ui).unwrap();

        assert!(result.success);
        let text = ui.emitted_text();
        assert!(text.contains("java"));
        assert!(text.contains("17.0.8"));
        assert!(text.contains("go"));
        assert!(!text.contains("python"));
        assert!(ui.has_message("Observing local runtimes"));
    }

    #[test]
    fn local_json_is_clean() {
        let mut ui = MockUI::new();
        local_command(&["go"], OutputFormat::Json)
            .execute(&mut ui)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&ui.emitted_text()).unwrap();
        assert_eq!(parsed[0]["name"], "go");
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn empty_result_warns() {
        let mut ui = MockUI::new();
        local_command(&["redis"], OutputFormat::Table)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.warnings(), ["No runtimes detected"]);
    }

    #[test]
    fn unknown_local_runtime_is_an_error() {
        let mut ui = MockUI::new();
        let cmd = GetRuntimeCommand::new(
            GetRuntimeArgs {
                name: "cobol".into(),
                host: None,
            },
            OutputFormat::Table,
            None,
        );

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, WatcherError::UnknownRuntime { ref name } if name == "cobol"));
        assert!(ui.has_message("Supported runtimes: java, python"));
    }

    fn snapshot_body() -> serde_json::Value {
        json!({
            "runtimes": [
                {"name": "java", "version": "17.0.8", "path": "/usr/bin/java", "found": true},
                {"name": "node", "version": "20.18.0", "path": "/usr/bin/node", "found": true}
            ],
            "system_info": {"hostname": "web1", "os": "linux", "kernel": "6.1"},
            "timestamp": 1700000000
        })
    }

    #[test]
    fn remote_runtimes_send_key_and_filter() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/observe")
                .header("x-api-key", "secret")
                .json_body(json!({"runtime_filter": ["java"]}));
            then.status(200).json_body(snapshot_body());
        });

        let cmd = GetRuntimesCommand::new(
            GetRuntimesArgs {
                host: Some(server.base_url()),
                runtime: vec!["java".into()],
            },
            OutputFormat::Table,
            Some(ResolvedApiKey {
                value: "secret".into(),
                source: crate::config::ApiKeySource::Flag,
            }),
        );
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        mock.assert();
        assert!(ui.emitted_text().contains("20.18.0"));
    }

    #[test]
    fn remote_runtime_not_installed_warns() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/observe");
            then.status(200).json_body(snapshot_body());
        });

        let cmd = GetRuntimeCommand::new(
            GetRuntimeArgs {
                name: "redis".into(),
                host: Some(server.base_url()),
            },
            OutputFormat::Table,
            None,
        );
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(ui.warnings(), ["redis is not installed"]);
    }

    #[test]
    fn remote_permission_denied_propagates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/observe");
            then.status(403)
                .json_body(json!({"code": "permission_denied", "message": "invalid API key"}));
        });

        let cmd = GetRuntimeCommand::new(
            GetRuntimeArgs {
                name: "java".into(),
                host: Some(server.base_url()),
            },
            OutputFormat::Json,
            None,
        );
        let err = cmd.execute(&mut MockUI::new()).unwrap_err();
        assert!(matches!(err, WatcherError::PermissionDenied { .. }));
    }
}
