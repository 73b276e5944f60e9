//! Shared data structures for the choppa connectivity monitor.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TARGET: &str = "8.8.8.8";
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Slack on top of the ping timeout before the child process is killed.
const DEADLINE_GRACE: Duration = Duration::from_secs(1);

const QUOTES: [&str; 6] = [
    "GET TO THE CHOPPA! 🚁",
    "I'll be back... when the WiFi is fixed.",
    "Come with me if you want to connect.",
    "Hasta la vista, bad connection!",
    "It's not a tumor... it's your router!",
    "Consider this a divorce from your ISP.",
];

const ESCAPE_ROUTES: [&str; 6] = [
    "☕ Find a coffee shop with free WiFi",
    "📱 Enable mobile hotspot on your phone",
    "🔌 Switch to ethernet cable (old school!)",
    "🏢 Go to the library",
    "👨‍💻 Visit a coworking space",
    "🏠 Ask your neighbor for their WiFi password",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub program: String,
    pub target: String,
    pub timeout_ms: u64,
    pub platform: Platform,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            program: "ping".to_string(),
            target: DEFAULT_TARGET.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            platform: Platform::current(),
        }
    }
}

impl ProbeSettings {
    /// Timeout rounded up to whole seconds, never below one.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_ms.div_ceil(1000).max(1)
    }

    /// Wall-clock bound on a single ping invocation.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.timeout_ms).saturating_add(DEADLINE_GRACE)
    }
}

/// Text shown alongside a failed check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlavorText {
    pub quotes: Vec<String>,
    pub escape_routes: Vec<String>,
}

impl Default for FlavorText {
    fn default() -> Self {
        Self {
            quotes: QUOTES.iter().map(|s| s.to_string()).collect(),
            escape_routes: ESCAPE_ROUTES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FlavorText {
    pub fn new(quotes: Vec<String>, escape_routes: Vec<String>) -> Result<Self> {
        let flavor = Self {
            quotes,
            escape_routes,
        };
        flavor.validate()?;
        Ok(flavor)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let flavor: FlavorText =
            serde_json::from_str(text).map_err(|err| anyhow!("invalid flavor text: {err}"))?;
        flavor.validate()?;
        Ok(flavor)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read flavor file {:?}", path))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("failed to parse flavor file {:?}", path))
    }

    fn validate(&self) -> Result<()> {
        if self.quotes.is_empty() {
            return Err(anyhow!("flavor text needs at least one quote"));
        }
        if self.escape_routes.is_empty() {
            return Err(anyhow!("flavor text needs at least one escape route"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_tables_are_populated() {
        let flavor = FlavorText::default();
        assert_eq!(flavor.quotes.len(), 6);
        assert_eq!(flavor.escape_routes.len(), 6);
        assert_eq!(flavor.quotes[0], "GET TO THE CHOPPA! 🚁");
    }

    #[test]
    fn timeout_rounds_up_to_seconds() {
        let mut settings = ProbeSettings::default();
        assert_eq!(settings.timeout_secs(), 2);
        settings.timeout_ms = 2500;
        assert_eq!(settings.timeout_secs(), 3);
        settings.timeout_ms = 10;
        assert_eq!(settings.timeout_secs(), 1);
    }

    #[test]
    fn default_deadline_is_three_seconds() {
        assert_eq!(ProbeSettings::default().deadline(), Duration::from_secs(3));
    }

    #[test]
    fn flavor_json_requires_both_tables() {
        let ok = FlavorText::from_json_str(r#"{"quotes":["a"],"escape_routes":["b"]}"#).unwrap();
        assert_eq!(ok.quotes, vec!["a".to_string()]);

        let empty = FlavorText::from_json_str(r#"{"quotes":[],"escape_routes":["b"]}"#);
        assert!(empty.is_err());

        let missing = FlavorText::from_json_str(r#"{"quotes":["a"]}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn flavor_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"quotes":["I'll be back."],"escape_routes":["Use the phone"]}}"#
        )
        .unwrap();

        let flavor = FlavorText::load(file.path()).unwrap();
        assert_eq!(flavor.escape_routes, vec!["Use the phone".to_string()]);
    }

    #[test]
    fn new_rejects_empty_routes() {
        assert!(FlavorText::new(vec!["q".to_string()], Vec::new()).is_err());
    }
}
