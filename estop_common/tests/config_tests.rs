//! File-based configuration loading tests.

use std::io::Write;

use estop_common::config::{ConfigError, load_config};
use estop_common::consts::period_ticks;
use estop_common::indicator::ChannelId;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn load_config_from_file() {
    let file = write_config(
        r#"
clock_hz = 80000000

[stop_line]
line = 4

[indicators]
foreground = 1
periodic = 2
"#,
    );
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.clock_hz, 80_000_000);
    assert_eq!(config.indicators.periodic, ChannelId(2));
    // The configured clock yields an exact 100 Hz reload value.
    assert_eq!(period_ticks(config.clock_hz), 800_000);
}

#[test]
fn missing_file_reports_path() {
    let err = load_config(std::path::Path::new("/nonexistent/monitor.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().contains("/nonexistent/monitor.toml"));
}

#[test]
fn invalid_file_rejected() {
    let file = write_config(
        r#"
[stop_line]
line = 4

[indicators]
foreground = 3
periodic = 3
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}
