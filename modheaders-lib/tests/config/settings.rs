use std::io::Write;

use modheaders_lib::config::load_settings;
use modheaders_lib::ModHeadersError;
use tempfile::NamedTempFile;

use crate::TestResult;

#[test]
fn test_settings_missing_file_uses_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let settings = load_settings(dir.path().join("absent.toml"))?;
    assert_eq!(settings.store.path.to_string_lossy(), ".modheaders");
    assert_eq!(settings.logging.level, "info");
    assert!(!settings.logging.show_target);
    assert!(!settings.watch.enabled);
    assert_eq!(settings.watch.debounce_ms, 200);
    Ok(())
}

#[test]
fn test_settings_loads_sections() -> TestResult {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
[store]
path = "/var/lib/modheaders"

[logging]
level = "debug"
show_target = true

[watch]
enabled = true
debounce_ms = 50
"#
    )?;

    let settings = load_settings(file.path())?;
    assert_eq!(settings.store.path.to_string_lossy(), "/var/lib/modheaders");
    assert_eq!(settings.logging.level, "debug");
    assert!(settings.logging.show_target);
    assert!(settings.watch.enabled);
    assert_eq!(settings.watch.debounce_ms, 50);
    Ok(())
}

#[test]
fn test_settings_rejects_zero_debounce() -> TestResult {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "[watch]\ndebounce_ms = 0")?;
    assert!(matches!(load_settings(file.path()), Err(ModHeadersError::Config(_))));
    Ok(())
}
