//! Lifecycle engine: the protocol state machine behind every `/v2` operation.
//!
//! Per instance: `Unprovisioned -> Provisioned -> Deprovisioned`, with provision and
//! update looping on `Provisioned`. Per binding: `Unbound -> Bound -> Unbound`.
//! No operation does real work, so `is_async` is only a protocol signal driven by
//! `fake_async` and every poll reports success.

use crate::catalog::Catalog;
use crate::error::{BrokerError, BrokerResult};
use crate::registry::Registry;
use osb_domain::config::BrokerConfig;
use osb_domain::constants::{
    DEPROVISION_OPERATION, GET_BINDING, GET_INSTANCE, LAST_BINDING_OPERATION, PROVISION_OPERATION,
    UPDATE_OPERATION,
};
use osb_domain::protocol::{
    BindDetails, BindingDetails, BindingResult, DeprovisionDetails, DeprovisionResult,
    InstanceDetails, LastOperation, OperationState, PollDetails, ProvisionDetails,
    ProvisionResult, RawParameters, UnbindDetails, UnbindResult, UpdateDetails, UpdateResult,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct BrokerInner {
    config: BrokerConfig,
    catalog: Catalog,
    instances: Registry<InstanceDetails>,
    bindings: Registry<BindingDetails>,
}

/// The broker. Owns its catalog and registries; clones share them.
#[derive(Debug, Clone)]
pub struct Broker {
    inner: Arc<BrokerInner>,
}

impl Broker {
    /// Creates a broker with empty registries.
    #[must_use]
    pub fn new(config: BrokerConfig) -> Self {
        Self::with_registries(config, Registry::new(), Registry::new())
    }

    /// Creates a broker over existing registries.
    #[must_use]
    pub fn with_registries(
        config: BrokerConfig,
        instances: Registry<InstanceDetails>,
        bindings: Registry<BindingDetails>,
    ) -> Self {
        let catalog = Catalog::from_config(&config);
        Self { inner: Arc::new(BrokerInner { config, catalog, instances, bindings }) }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn config(&self) -> &BrokerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn instances(&self) -> &Registry<InstanceDetails> {
        &self.inner.instances
    }

    #[must_use]
    pub fn bindings(&self) -> &Registry<BindingDetails> {
        &self.inner.bindings
    }

    fn async_operation(&self, operation: &'static str) -> (bool, Option<String>) {
        let is_async = self.inner.config.fake_async;
        (is_async, is_async.then(|| operation.to_owned()))
    }

    /// Stores the instance, replacing any previous record under the same id.
    pub fn provision(
        &self,
        instance_id: &str,
        details: ProvisionDetails,
        async_allowed: bool,
    ) -> ProvisionResult {
        let parameters = lenient_parameters(&details.raw_parameters, instance_id, "provision");
        let record =
            InstanceDetails { service_id: details.service_id, plan_id: details.plan_id, parameters };

        let previous = self.inner.instances.put(instance_id, record.clone());
        let already_exists = previous.as_ref() == Some(&record);
        let (is_async, operation_data) = self.async_operation(PROVISION_OPERATION);

        info!(
            instance_id,
            service_id = %record.service_id,
            plan_id = %record.plan_id,
            replaced = previous.is_some(),
            already_exists,
            is_async,
            async_allowed,
            "Provisioned service instance"
        );

        ProvisionResult { is_async, already_exists, dashboard_url: None, operation_data }
    }

    /// Removes the instance if present. Unknown instances are not an error.
    pub fn deprovision(
        &self,
        instance_id: &str,
        details: DeprovisionDetails,
        async_allowed: bool,
    ) -> DeprovisionResult {
        let existed = self.inner.instances.delete(instance_id).is_some();
        let (is_async, operation_data) = self.async_operation(DEPROVISION_OPERATION);

        info!(
            instance_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            existed,
            is_async,
            async_allowed,
            "Deprovisioned service instance"
        );

        DeprovisionResult { is_async, operation_data }
    }

    pub fn get_instance(&self, instance_id: &str) -> BrokerResult<InstanceDetails> {
        debug!(instance_id, "Fetching service instance");
        self.inner.instances.get(instance_id).map_err(|_| {
            BrokerError::not_found(format!("Unknown instance ID {instance_id}"), GET_INSTANCE)
        })
    }

    /// Accepts the update without touching the stored record.
    pub fn update(
        &self,
        instance_id: &str,
        details: UpdateDetails,
        async_allowed: bool,
    ) -> UpdateResult {
        let (is_async, operation_data) = self.async_operation(UPDATE_OPERATION);

        info!(
            instance_id,
            service_id = %details.service_id,
            plan_id = details.plan_id.as_deref().unwrap_or_default(),
            has_parameters = !details.raw_parameters.is_empty(),
            is_async,
            async_allowed,
            "Updated service instance (parameters discarded)"
        );

        UpdateResult { is_async, dashboard_url: None, operation_data }
    }

    /// Binds with the broker-wide credentials. The instance is not required to exist.
    pub fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: BindDetails,
        async_allowed: bool,
    ) -> BindingResult {
        let parameters = lenient_parameters(&details.raw_parameters, binding_id, "bind");
        let credentials = self.inner.config.credentials.clone();
        let record = BindingDetails { credentials: credentials.clone(), parameters };

        let previous = self.inner.bindings.put(binding_id, record.clone());
        let already_exists = previous.as_ref() == Some(&record);

        info!(
            instance_id,
            binding_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            instance_known = self.inner.instances.contains(instance_id),
            already_exists,
            async_allowed,
            "Bound service instance"
        );

        BindingResult {
            credentials,
            syslog_drain_url: self.inner.config.syslog_drain_url.clone(),
            already_exists,
        }
    }

    /// Removes the binding if present. Unknown bindings are not an error.
    pub fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: UnbindDetails,
        async_allowed: bool,
    ) -> UnbindResult {
        let existed = self.inner.bindings.delete(binding_id).is_some();

        info!(
            instance_id,
            binding_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            existed,
            async_allowed,
            "Unbound service instance"
        );

        UnbindResult::default()
    }

    /// Looks the binding up by `binding_id` alone; the binding namespace is flat.
    pub fn get_binding(&self, instance_id: &str, binding_id: &str) -> BrokerResult<BindingDetails> {
        debug!(instance_id, binding_id, "Fetching service binding");
        self.inner.bindings.get(binding_id).map_err(|_| {
            BrokerError::not_found(format!("Unknown binding ID {binding_id}"), GET_BINDING)
        })
    }

    /// Nothing is ever in flight, so every poll observes completion.
    pub fn last_operation(&self, instance_id: &str, details: PollDetails) -> LastOperation {
        debug!(
            instance_id,
            operation = details.operation_data.as_deref().unwrap_or_default(),
            "Polled last operation"
        );
        LastOperation { state: OperationState::Succeeded, description: None }
    }

    /// Bindings never complete asynchronously, so polling them is unsupported.
    pub fn last_binding_operation(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: PollDetails,
    ) -> BrokerResult<LastOperation> {
        warn!(
            instance_id,
            binding_id,
            operation = details.operation_data.as_deref().unwrap_or_default(),
            "Rejected binding operation poll"
        );
        Err(BrokerError::unsupported(LAST_BINDING_OPERATION))
    }
}

/// Malformed parameter documents count as "no parameters".
fn lenient_parameters(raw: &RawParameters, id: &str, operation: &'static str) -> Value {
    raw.parse().unwrap_or_else(|err| {
        warn!(id, operation, error = %err, "Ignoring malformed parameters");
        Value::Null
    })
}
