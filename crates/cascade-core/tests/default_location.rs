//! Integration tests for the default config location under the home directory.
//!
//! Kept in its own test binary because it points `HOME` at a temporary directory.

#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        unsafe_code,
        reason = "Test allows"
    )
)]

use cascade_core::{CascadeConfig, Result};
use std::{env, fs};
use tempfile::TempDir;

#[test]
fn test_load_or_create_writes_then_reads_home_config() -> Result<()> {
    let home = TempDir::new()?;
    // SAFETY: the only test in this binary, set before anything reads the environment
    unsafe {
        env::set_var("HOME", home.path());
    }

    let expected_dir = home.path().join(".cascade");
    assert_eq!(CascadeConfig::config_dir()?, expected_dir);
    assert_eq!(CascadeConfig::config_path()?, expected_dir.join("config.toml"));

    let created = CascadeConfig::load_or_create()?;
    assert_eq!(created, CascadeConfig::default());
    let path = CascadeConfig::config_path()?;
    assert!(path.exists());

    let mut edited = created;
    edited.availability.load_ceilings.secondary = 3;
    edited.save_to_file(&path)?;
    assert_eq!(fs::read_to_string(&path)?.lines().next(), Some("# Cascade Router Configuration File"));

    let reloaded = CascadeConfig::load_or_create()?;
    assert_eq!(reloaded.availability.load_ceilings.secondary, 3);
    Ok(())
}
