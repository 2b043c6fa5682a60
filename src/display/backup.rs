//! Backup listing and rotation display

use crate::backup::{BackupEntry, RotationReport};
use crate::config::RetentionPolicy;

/// Format the backup listing with 1-based selection numbers
pub fn format_backup_list(backups: &[BackupEntry]) -> String {
    if backups.is_empty() {
        return "No backups found.\n".to_string();
    }

    let mut output = String::from("Available Backups:\n");
    for (i, backup) in backups.iter().enumerate() {
        let status = if backup.is_valid { "" } else { "  [invalid size]" };
        output.push_str(&format!(
            "{:>3}. {}  {:>10}  {}{}\n",
            i + 1,
            backup.created_at.format("%Y-%m-%d %H:%M:%S"),
            format_size(backup.size_bytes),
            backup.filename,
            status
        ));
    }
    output
}

/// Describe the active retention policy
pub fn format_policy(policy: &RetentionPolicy) -> String {
    let count = if policy.count_enabled() {
        format!("Keep last {} backups", policy.retain_count)
    } else {
        "Count limit disabled".to_string()
    };
    let age = if policy.age_enabled() {
        format!("Delete backups older than {} days", policy.retain_days)
    } else {
        "Age limit disabled".to_string()
    };
    format!("Current Retention Policy:\n - {}\n - {}\n", count, age)
}

/// Summarize a rotation run
pub fn format_rotation_report(report: &RotationReport) -> String {
    if report.is_empty() {
        return "Rotation completed. No backups removed.\n".to_string();
    }

    let mut output = format!(
        "Rotation completed. {} removed, {} failed.\n",
        report.deleted.len(),
        report.failed.len()
    );
    for path in &report.deleted {
        output.push_str(&format!("  - {}\n", path.display()));
    }
    for (path, reason) in &report.failed {
        output.push_str(&format!("  ! {}: {}\n", path.display(), reason));
    }
    output
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn entry(name: &str, size: u64, valid: bool) -> BackupEntry {
        BackupEntry {
            filename: name.to_string(),
            path: PathBuf::from(name),
            created_at: NaiveDate::from_ymd_opt(2025, 2, 3)
                .unwrap()
                .and_hms_opt(4, 5, 6)
                .unwrap(),
            sequence: 0,
            size_bytes: size,
            is_valid: valid,
        }
    }

    #[test]
    fn test_backup_list_is_one_based() {
        let output = format_backup_list(&[
            entry("inventory_20250203_040506.bak", 192, true),
            entry("inventory_20250203_040506_1.bak", 2048, false),
        ]);

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].starts_with("  1. 2025-02-03 04:05:06"));
        assert!(lines[1].contains("192 B"));
        assert!(lines[2].contains("2.0 KB"));
        assert!(lines[2].ends_with("[invalid size]"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_backup_list(&[]), "No backups found.\n");
    }

    #[test]
    fn test_policy() {
        let output = format_policy(&RetentionPolicy {
            retain_count: 5,
            retain_days: 0,
        });
        assert!(output.contains("Keep last 5 backups"));
        assert!(output.contains("Age limit disabled"));
    }

    #[test]
    fn test_rotation_report() {
        let report = RotationReport {
            deleted: vec![PathBuf::from("a.bak")],
            failed: vec![(PathBuf::from("b.bak"), "Deletion failed: gone".to_string())],
        };
        let output = format_rotation_report(&report);
        assert!(output.starts_with("Rotation completed. 1 removed, 1 failed."));
        assert!(output.contains("! b.bak: Deletion failed: gone"));
    }
}
