//! In-memory facade over the aggregation server RPCs.

use proofrelay_primitives::{
    AggregatedTransaction, AggregatorConfiguration, NestedSnark, NestedTier, NestedTransaction,
    VerificationKey, WrapperSnark, WrapperTier,
};
use url::Url;

use crate::api::{AggregatorApi, HttpAggregatorApi};
use crate::error::{ClientError, Result};

/// Pure request/response client: converts between wire JSON and typed
/// value objects through the tier snark handles, one RPC per method. Retry
/// and batching policy belong to callers.
#[derive(Clone, Debug)]
pub struct AggregatorClient<A> {
    api: A,
}

impl AggregatorClient<HttpAggregatorApi> {
    pub fn new(server_url: Url) -> Self {
        Self {
            api: HttpAggregatorApi::new(server_url),
        }
    }
}

impl<A: AggregatorApi> AggregatorClient<A> {
    pub fn with_api(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn get_configuration(&self) -> Result<AggregatorConfiguration> {
        let value = self.api.get_configuration().await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::ConfigError(format!("invalid server configuration: {e}")))
    }

    /// The aggregator's own (wrapper tier) verification key, as deployed
    /// into the dispatcher contract.
    pub async fn get_verification_key(
        &self,
        wrapper_snark: &WrapperSnark,
    ) -> Result<VerificationKey<WrapperTier>> {
        let value = self.api.get_verification_key().await?;
        Ok(wrapper_snark.verification_key_from_json(&value)?)
    }

    /// Hash of an unregistered application verification key, as the server
    /// will identify it once registered.
    pub async fn get_nested_verification_key_hash(
        &self,
        nested_snark: &NestedSnark,
        vk: &VerificationKey<NestedTier>,
    ) -> Result<String> {
        let vk_json = nested_snark.verification_key_to_json(vk)?;
        self.api.get_nested_verification_key_hash(&vk_json).await
    }

    pub async fn register_application(
        &self,
        nested_snark: &NestedSnark,
        vk: &VerificationKey<NestedTier>,
        application_name: &str,
    ) -> Result<()> {
        let vk_json = nested_snark.verification_key_to_json(vk)?;
        tracing::info!("registering application '{application_name}'");
        self.api.register_application(application_name, &vk_json).await
    }

    /// Enqueue a nested transaction for a future batch. No synchronous
    /// acknowledgment of batch membership is given.
    pub async fn submit_nested_transaction(&self, transaction: &NestedTransaction) -> Result<()> {
        let tx_json = transaction.to_json()?;
        tracing::info!(
            "submitting nested transaction for '{}'",
            transaction.application_name
        );
        self.api.submit_nested_transaction(&tx_json).await
    }

    /// Request the next available batch for an application. Returns
    /// [`ClientError::BatchNotReady`] while the aggregator has nothing,
    /// which callers may poll on.
    pub async fn get_aggregated_transaction(
        &self,
        wrapper_snark: &WrapperSnark,
        application_name: &str,
    ) -> Result<AggregatedTransaction> {
        let value = self.api.get_aggregated_transaction(application_name).await?;
        Ok(AggregatedTransaction::from_json(wrapper_snark, &value)?)
    }
}
