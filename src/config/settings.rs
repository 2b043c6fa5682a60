//! Backup retention settings
//!
//! The retention policy lives in a small `key=value` text file so it can be
//! edited by hand. Unknown or malformed lines are ignored, missing keys fall
//! back to their defaults.

use serde::{Deserialize, Serialize};

use super::paths::InventoryPaths;
use crate::error::InventoryError;

const DEFAULT_RETAIN_COUNT: i32 = 7;
const DEFAULT_RETAIN_DAYS: i32 = 30;

/// Rules governing which snapshots are eligible for deletion
///
/// A zero threshold disables the corresponding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Keep the N most recent snapshots
    pub retain_count: i32,
    /// Delete snapshots older than N days
    pub retain_days: i32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            retain_count: DEFAULT_RETAIN_COUNT,
            retain_days: DEFAULT_RETAIN_DAYS,
        }
    }
}

impl RetentionPolicy {
    /// Parse policy text, starting from the defaults
    pub fn parse(contents: &str) -> Self {
        let mut policy = Self::default();

        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let Ok(value) = value.trim().parse::<i32>() else {
                continue;
            };
            match key.trim() {
                "retain_count" => policy.retain_count = value,
                "retain_days" => policy.retain_days = value,
                _ => {}
            }
        }

        policy
    }

    /// Load the policy from disk, or the defaults if the file doesn't exist
    pub fn load(paths: &InventoryPaths) -> Result<Self, InventoryError> {
        let config_path = paths.retention_config();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            InventoryError::Io(format!("Failed to read retention config: {}", e))
        })?;

        Ok(Self::parse(&contents))
    }

    /// Render the policy in its on-disk form
    pub fn to_config_string(&self) -> String {
        format!(
            "retain_count={}\nretain_days={}\n",
            self.retain_count, self.retain_days
        )
    }

    /// Save the policy to disk
    pub fn save(&self, paths: &InventoryPaths) -> Result<(), InventoryError> {
        self.validate()?;
        std::fs::create_dir_all(paths.base_dir())
            .map_err(|e| InventoryError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::write(paths.retention_config(), self.to_config_string()).map_err(|e| {
            InventoryError::Io(format!("Failed to write retention config: {}", e))
        })?;

        Ok(())
    }

    /// Reject thresholds that cannot be enforced
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.retain_count < 0 {
            return Err(InventoryError::InvalidArgument(format!(
                "retain_count must be zero or positive, got {}",
                self.retain_count
            )));
        }
        if self.retain_days < 0 {
            return Err(InventoryError::InvalidArgument(format!(
                "retain_days must be zero or positive, got {}",
                self.retain_days
            )));
        }
        Ok(())
    }

    /// Check if the count pass is enabled
    pub fn count_enabled(&self) -> bool {
        self.retain_count > 0
    }

    /// Check if the age pass is enabled
    pub fn age_enabled(&self) -> bool {
        self.retain_days > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_policy() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.retain_count, 7);
        assert_eq!(policy.retain_days, 30);
    }

    #[test]
    fn test_parse_ignores_unknown_and_malformed_lines() {
        let policy = RetentionPolicy::parse("# comment\nretain_days=12\nfoo=bar\nretain_count=abc\n");
        assert_eq!(policy.retain_days, 12);
        assert_eq!(policy.retain_count, 7);
    }

    #[test]
    fn test_parse_is_order_independent() {
        let a = RetentionPolicy::parse("retain_count=3\nretain_days=9\n");
        let b = RetentionPolicy::parse("retain_days=9\nretain_count=3\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(RetentionPolicy::load(&paths).unwrap(), RetentionPolicy::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());

        let policy = RetentionPolicy {
            retain_count: 3,
            retain_days: 0,
        };
        policy.save(&paths).unwrap();

        let loaded = RetentionPolicy::load(&paths).unwrap();
        assert_eq!(loaded, policy);
        assert!(!loaded.age_enabled());
    }

    #[test]
    fn test_negative_policy_rejected() {
        let policy = RetentionPolicy {
            retain_count: -1,
            retain_days: 30,
        };
        assert!(policy.validate().unwrap_err().is_invalid_argument());
    }
}
