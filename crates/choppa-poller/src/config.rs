use thiserror::Error;

pub const DEFAULT_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("interval must be a whole number of seconds, got {0:?}")]
    NotAnInteger(String),
    #[error("Interval must be at least 1 second.")]
    NotPositive(i64),
}

/// Seconds between checks. Absent means the default.
pub fn parse_interval(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_INTERVAL_SECS);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotAnInteger(raw.to_string()))?;

    if value < 1 {
        return Err(ConfigError::NotPositive(value));
    }

    Ok(value.unsigned_abs())
}

pub fn usage(program: &str) -> String {
    format!("Usage: {program} [interval_in_seconds]\nExample: {program} 10")
}
