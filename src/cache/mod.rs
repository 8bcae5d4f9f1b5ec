//! Caching of read-mostly configuration from the rate service.

mod clock;
mod config_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config_cache::{ConfigCache, ConfigKind, ConfigSource, ConfigValue};
