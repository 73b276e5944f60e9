//! The connectivity poller: state, status lines and the polling loop.

pub mod config;
pub mod pick;
pub mod poller;
pub mod shutdown;

pub use config::{parse_interval, usage, ConfigError, DEFAULT_INTERVAL_SECS};
pub use pick::{CyclePicker, FirstPicker, Picker, RandomPicker};
pub use poller::{Poller, StatusReport, BANNER_WIDTH};
pub use shutdown::{Shutdown, Sleeper};
