//! # Broker
//!
//! The provider side of the Open Service Broker v2 protocol, without any HTTP.
//!
//! [`Broker`] implements every lifecycle operation against two in-memory
//! [`Registry`] instances and a fixed [`Catalog`]. It never provisions a real
//! resource: it is a reference/test double whose answers are driven by the
//! `fake_async` and `fake_stateful` flags of [`BrokerConfig`].
//!
//! ```rust
//! use osb_broker::Broker;
//! use osb_domain::config::BrokerConfig;
//! use osb_domain::protocol::{ProvisionDetails, RawParameters};
//!
//! let broker = Broker::new(BrokerConfig::default());
//! let details = ProvisionDetails {
//!     service_id: "s".to_owned(),
//!     plan_id: "p".to_owned(),
//!     raw_parameters: RawParameters::new(r#"{"x":1}"#),
//!     ..ProvisionDetails::default()
//! };
//!
//! let result = broker.provision("i1", details, false);
//! assert!(!result.is_async);
//! assert_eq!(broker.get_instance("i1").unwrap().plan_id, "p");
//! ```

pub mod catalog;
pub mod engine;
mod error;
pub mod registry;

pub use crate::catalog::Catalog;
pub use crate::engine::Broker;
pub use crate::error::{BrokerError, BrokerErrorExt, BrokerResult};
pub use crate::registry::{Missing, Registry};

use osb_domain::config::BrokerConfig;

/// Initialize the broker core from the resolved configuration.
#[must_use]
pub fn init(config: &BrokerConfig) -> Broker {
    tracing::info!(
        service_id = %config.service_id(),
        plan_id = %config.plan_id(),
        fake_async = config.fake_async,
        fake_stateful = config.fake_stateful,
        "Broker core initialized"
    );

    Broker::new(config.clone())
}
