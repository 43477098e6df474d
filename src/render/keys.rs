//! Key listings.

use crate::auth::{mask_key, KeyInfo};
use crate::ui::Table;

/// Server keystore listing with masked keys.
pub fn server_keys_table(keys: &[KeyInfo]) -> String {
    let mut table = Table::new(vec!["Key", "Description", "Created"]);
    for info in keys {
        table.add_row(vec![
            mask_key(&info.key),
            info.description.clone(),
            info.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ]);
    }
    table.render()
}

/// Client key listing with masked keys.
pub fn client_keys_table(keys: &[(String, String)]) -> String {
    let mut table = Table::new(vec!["Name", "Key"]);
    for (name, key) in keys {
        table.add_row(vec![name.clone(), mask_key(key)]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn server_keys_are_masked() {
        let info = KeyInfo {
            key: "watcher_0123456789abcdef".into(),
            description: "ops".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        let output = server_keys_table(&[info]);

        assert!(output.contains("watcher_01...cdef"));
        assert!(!output.contains("0123456789abcdef"));
        assert!(output.contains("2024-05-01 12:00:00 UTC"));
    }

    #[test]
    fn client_keys_are_masked() {
        let output = client_keys_table(&[(
            "default".to_string(),
            "watcher_ffffffffffff0000".to_string(),
        )]);
        assert!(output.contains("default"));
        assert!(output.contains("watcher_ff...0000"));
    }
}
