//! The broker's self-description.
//!
//! One service offering with one plan, both derived from [`BrokerConfig`] and fixed
//! for the lifetime of the process.

use osb_domain::config::BrokerConfig;
use osb_domain::protocol::{CatalogResponse, Service, ServiceMetadata, ServicePlan};

const SYSLOG_DRAIN_PERMISSION: &str = "syslog_drain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    #[must_use]
    pub fn from_config(config: &BrokerConfig) -> Self {
        let description = format!("Shared service for {}", config.service_name);

        let metadata = ServiceMetadata {
            display_name: config.service_name.clone(),
            image_url: config.image_url.clone(),
        };

        let plan = ServicePlan {
            id: config.plan_id(),
            name: config.plan_name.clone(),
            description: description.clone(),
            free: true,
        };

        let requires = config
            .syslog_drain_url
            .as_ref()
            .map(|_| vec![SYSLOG_DRAIN_PERMISSION.to_owned()])
            .unwrap_or_default();

        let service = Service {
            id: config.service_id(),
            name: config.service_name.clone(),
            description,
            bindable: true,
            instances_retrievable: config.fake_stateful,
            bindings_retrievable: config.fake_stateful,
            plan_updateable: true,
            tags: config.tags.clone(),
            requires,
            metadata: Some(metadata),
            plans: vec![plan],
        };

        Self { services: vec![service] }
    }

    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// True when `plan_id` is a plan of the service `service_id`.
    #[must_use]
    pub fn contains_plan(&self, service_id: &str, plan_id: &str) -> bool {
        self.services
            .iter()
            .filter(|service| service.id == service_id)
            .flat_map(|service| &service.plans)
            .any(|plan| plan.id == plan_id)
    }

    #[must_use]
    pub fn to_response(&self) -> CatalogResponse {
        CatalogResponse { services: self.services.clone() }
    }
}
