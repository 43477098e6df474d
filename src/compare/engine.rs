//! Concurrent multi-host fetch and reconciliation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::client::Connector;
use crate::detection::Runtime;
use crate::error::{Result, WatcherError};

use super::status::{ComparisonStatus, VersionCell};

/// Upper bound on fetching one host, connection included.
pub const HOST_TIMEOUT: Duration = Duration::from_secs(10);

/// What one host reported, or why it could not.
#[derive(Debug)]
pub struct ServerRuntimes {
    /// Host as given by the caller.
    pub host: String,
    /// Found runtimes keyed by name.
    pub result: Result<BTreeMap<String, Runtime>>,
}

impl ServerRuntimes {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// One runtime's values across all hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeComparison {
    pub name: String,
    /// One entry per host, in host order.
    pub versions: Vec<String>,
    pub status: ComparisonStatus,
}

/// The full comparison matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonData {
    /// Display labels, one per host.
    pub hosts: Vec<String>,
    /// Rows sorted by runtime name.
    pub runtimes: Vec<RuntimeComparison>,
}

/// How many hosts answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    /// Every host answered.
    Complete,
    /// Some hosts failed; the comparison covers the rest.
    Partial,
    /// No host answered.
    Failed,
}

impl CompareOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            CompareOutcome::Complete => 0,
            CompareOutcome::Partial => 3,
            CompareOutcome::Failed => 1,
        }
    }
}

/// Everything a comparison produced.
#[derive(Debug)]
pub struct CompareReport {
    /// Per-host results, in the order the hosts were given.
    pub servers: Vec<ServerRuntimes>,
    /// The matrix, absent when no host answered.
    pub comparison: Option<ComparisonData>,
}

impl CompareReport {
    fn from_servers(servers: Vec<ServerRuntimes>) -> Self {
        let comparison = servers
            .iter()
            .any(ServerRuntimes::is_ok)
            .then(|| build_comparison(&servers));
        Self {
            servers,
            comparison,
        }
    }

    pub fn outcome(&self) -> CompareOutcome {
        let failed = self.failed_hosts().count();
        if failed == 0 {
            CompareOutcome::Complete
        } else if failed < self.servers.len() {
            CompareOutcome::Partial
        } else {
            CompareOutcome::Failed
        }
    }

    /// Hosts that could not be queried, with the reason.
    pub fn failed_hosts(&self) -> impl Iterator<Item = (&str, &WatcherError)> {
        self.servers
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.host.as_str(), e)))
    }
}

/// Per-status row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub total: usize,
    pub same: usize,
    pub diff: usize,
    pub partial: usize,
    pub missing: usize,
    pub error: usize,
}

impl ComparisonSummary {
    pub fn of(data: &ComparisonData) -> Self {
        let mut summary = Self {
            total: data.runtimes.len(),
            ..Self::default()
        };
        for row in &data.runtimes {
            match row.status {
                ComparisonStatus::Same => summary.same += 1,
                ComparisonStatus::Diff => summary.diff += 1,
                ComparisonStatus::Partial => summary.partial += 1,
                ComparisonStatus::Missing => summary.missing += 1,
                ComparisonStatus::Error => summary.error += 1,
            }
        }
        summary
    }

    /// Whether any runtime differs or is only partly installed.
    pub fn has_drift(&self) -> bool {
        self.diff > 0 || self.partial > 0
    }
}

/// Build the comparison matrix from per-host results.
///
/// Rows are the union of runtime names over hosts that answered, sorted by
/// name. Failed hosts still get a column, filled with
/// [`ERROR_MARKER`](super::ERROR_MARKER).
pub fn build_comparison(servers: &[ServerRuntimes]) -> ComparisonData {
    let names: BTreeSet<&str> = servers
        .iter()
        .filter_map(|s| s.result.as_ref().ok())
        .flat_map(|runtimes| runtimes.keys().map(String::as_str))
        .collect();

    let hosts = servers
        .iter()
        .map(|s| {
            let label = host_label(&s.host);
            if s.is_ok() {
                label
            } else {
                format!("{} (ERR)", label)
            }
        })
        .collect();

    let runtimes = names
        .into_iter()
        .map(|name| {
            let cells: Vec<VersionCell<'_>> = servers
                .iter()
                .map(|s| match &s.result {
                    Err(_) => VersionCell::Error,
                    Ok(runtimes) => runtimes
                        .get(name)
                        .and_then(Runtime::version)
                        .map_or(VersionCell::Missing, VersionCell::Version),
                })
                .collect();
            RuntimeComparison {
                name: name.to_string(),
                status: ComparisonStatus::classify(&cells),
                versions: cells.iter().map(|c| c.as_str().to_string()).collect(),
            }
        })
        .collect();

    ComparisonData { hosts, runtimes }
}

/// Short display label for a host: scheme, path and port removed.
///
/// Bracketed IPv6 addresses keep their brackets.
pub fn host_label(host: &str) -> String {
    let without_scheme = host.split_once("://").map_or(host, |(_, rest)| rest);
    let authority = without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme);

    if authority.starts_with('[') {
        if let Some(end) = authority.find(']') {
            return authority[..=end].to_string();
        }
        return authority.to_string();
    }

    match authority.split_once(':') {
        // a second colon means an unbracketed IPv6 address
        Some((name, port)) if !port.contains(':') => name.to_string(),
        _ => authority.to_string(),
    }
}

/// Fans out runtime fetches to many hosts.
pub struct Comparator<C: Connector + 'static> {
    connector: Arc<C>,
    host_timeout: Duration,
}

impl<C: Connector + 'static> Comparator<C> {
    pub fn new(connector: C) -> Self {
        Self::with_timeout(connector, HOST_TIMEOUT)
    }

    pub fn with_timeout(connector: C, host_timeout: Duration) -> Self {
        Self {
            connector: Arc::new(connector),
            host_timeout,
        }
    }

    /// Fetch every host concurrently and compare the results.
    ///
    /// Each host is bounded by the host timeout and, when given, by
    /// `deadline`, whichever comes first. Host failures are recorded in the
    /// report rather than returned. Dropping the returned future cancels all
    /// in-flight fetches.
    pub async fn compare(
        &self,
        hosts: &[String],
        api_key: Option<&str>,
        deadline: Option<Instant>,
    ) -> Result<CompareReport> {
        if hosts.is_empty() {
            return Err(WatcherError::NoHosts);
        }

        let mut tasks = JoinSet::new();
        for (index, host) in hosts.iter().enumerate() {
            let connector = Arc::clone(&self.connector);
            let host = host.clone();
            let api_key = api_key.map(str::to_string);
            let own_deadline = Instant::now() + self.host_timeout;
            let until = deadline.map_or(own_deadline, |d| d.min(own_deadline));

            tasks.spawn(async move {
                let fetched = tokio::time::timeout_at(
                    until,
                    fetch_host(connector.as_ref(), &host, api_key.as_deref()),
                )
                .await;
                let result = match fetched {
                    Ok(result) => result,
                    Err(_) => Err(WatcherError::Timeout { host }),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<BTreeMap<String, Runtime>>>> =
            hosts.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => tracing::warn!("Host fetch task failed: {}", e),
            }
        }

        let servers: Vec<ServerRuntimes> = hosts
            .iter()
            .zip(slots)
            .map(|(host, slot)| {
                let result = slot.unwrap_or_else(|| {
                    Err(WatcherError::Other(anyhow::anyhow!(
                        "fetch task for {} did not complete",
                        host
                    )))
                });
                if let Err(e) = &result {
                    tracing::warn!("Failed to fetch runtimes from {}: {}", host, e);
                }
                ServerRuntimes {
                    host: host.clone(),
                    result,
                }
            })
            .collect();

        Ok(CompareReport::from_servers(servers))
    }
}

async fn fetch_host<C: Connector + ?Sized>(
    connector: &C,
    host: &str,
    api_key: Option<&str>,
) -> Result<BTreeMap<String, Runtime>> {
    let mut source = connector.connect(host, api_key).await?;
    let observed = source.observe_runtimes().await;
    source.close().await;

    Ok(observed?
        .into_iter()
        .filter(Runtime::is_found)
        .map(|runtime| (runtime.name().to_string(), runtime))
        .collect())
}
