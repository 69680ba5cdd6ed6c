//! Kernel utilities shared by the broker binary and its tests.
//! Keep this crate lightweight: config loading, the shared API state and the system routes.
//!
//! ## Config loading
//! ```rust,no_run
//! use osb_kernel::config::{BrokerSettings, load_config};
//!
//! let settings: BrokerSettings = load_config(None::<&str>).unwrap_or_default();
//! let config = settings.resolve().unwrap();
//! assert!(!config.broker.service_name.is_empty());
//! ```
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use osb_broker as broker;
pub use osb_domain as domain;
