//! Runtime inventory tables.

use crate::detection::Runtime;
use crate::ui::Table;

/// Table of found runtimes: name, version and path.
pub fn runtimes_table(runtimes: &[Runtime]) -> String {
    let mut table = Table::new(vec!["Runtime", "Version", "Path"]);
    for runtime in runtimes {
        if let (Some(version), Some(path)) = (runtime.version(), runtime.path()) {
            table.add_row(vec![
                runtime.name().to_string(),
                version.to_string(),
                path.display().to_string(),
            ]);
        }
    }
    table.render()
}

/// Property table for one found runtime.
pub fn runtime_table(runtime: &Runtime) -> String {
    let mut table = Table::new(vec!["Property", "Value"]);
    table.add_row(vec!["Name", runtime.name()]);
    table.add_row(vec!["Version", runtime.version().unwrap_or("-")]);
    let path = runtime
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    table.add_row(vec!["Path".to_string(), path]);
    table.render()
}
