//! Long-lived session state for one application talking to one
//! aggregator and one chain: lazily constructed client, cached
//! configuration and dispatcher binding.

use core::fmt;
use std::path::PathBuf;

use alloy::network::Network;
use alloy::providers::Provider;
use alloy::transports::Transport;
use proofrelay_primitives::{AggregatedTransaction, AggregatorConfiguration};
use url::Url;

use crate::api::{ConnectApi, HttpAggregatorApi};
use crate::batch::{check_batch_results, ResultEncoding};
use crate::client::AggregatorClient;
use crate::config_cache::get_or_fetch_configuration;
use crate::dispatcher::{DispatcherContract, InstanceDescriptor};
use crate::error::{ClientError, Result};

pub struct SessionContext<T, P, N, A = HttpAggregatorApi> {
    aggregator_url: Url,
    config_cache_path: PathBuf,
    instance_path: PathBuf,
    result_encoding: ResultEncoding,
    rpc_provider: P,
    client: Option<AggregatorClient<A>>,
    configuration: Option<AggregatorConfiguration>,
    dispatcher: Option<DispatcherContract<T, P, N>>,
}

impl<T, P, N, A> SessionContext<T, P, N, A>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
    A: ConnectApi,
{
    pub fn new(
        aggregator_url: Url,
        config_cache_path: PathBuf,
        instance_path: PathBuf,
        result_encoding: ResultEncoding,
        rpc_provider: P,
    ) -> Self {
        Self {
            aggregator_url,
            config_cache_path,
            instance_path,
            result_encoding,
            rpc_provider,
            client: None,
            configuration: None,
            dispatcher: None,
        }
    }

    pub fn result_encoding(&self) -> ResultEncoding {
        self.result_encoding
    }

    pub fn rpc_provider(&self) -> &P {
        &self.rpc_provider
    }

    /// The aggregation server client, constructed on first use by opening
    /// the session's transport against its endpoint.
    pub fn aggregator_client(&mut self) -> &AggregatorClient<A> {
        let url = self.aggregator_url.clone();
        self.client
            .get_or_insert_with(|| AggregatorClient::with_api(A::connect(url)))
    }

    /// The aggregator configuration, resolved once per session through the
    /// on-disk cache. Later calls return the memoized value without
    /// touching the cache or the server.
    pub async fn configuration(&mut self) -> Result<&AggregatorConfiguration> {
        if self.configuration.is_none() {
            let cache_path = self.config_cache_path.clone();
            let client = self.aggregator_client().clone();
            let config = get_or_fetch_configuration(&client, &cache_path).await?;
            self.configuration = Some(config);
        }
        self.configuration
            .as_ref()
            .ok_or_else(|| ClientError::ConfigError("configuration unavailable".to_string()))
    }

    /// The dispatcher binding, loaded once from the session's instance
    /// file. Requires a prior deployment recorded via
    /// [`Self::record_dispatcher`] or an existing instance file.
    pub fn dispatcher(&mut self) -> Result<&DispatcherContract<T, P, N>> {
        if self.dispatcher.is_none() {
            let instance = InstanceDescriptor::load(&self.instance_path)?;
            self.dispatcher = Some(DispatcherContract::from_instance(
                self.rpc_provider.clone(),
                &instance,
            ));
        }
        self.dispatcher
            .as_ref()
            .ok_or_else(|| ClientError::InstanceError("dispatcher unavailable".to_string()))
    }

    /// Persist a fresh deployment and adopt it for the rest of the
    /// session.
    pub fn record_dispatcher(
        &mut self,
        contract: DispatcherContract<T, P, N>,
        instance: &InstanceDescriptor,
    ) -> Result<()> {
        instance.save(&self.instance_path)?;
        self.dispatcher = Some(contract);
        Ok(())
    }

    /// Full local validation of a received batch: structural consistency
    /// against the expected size, then the per-proof results under the
    /// session's result encoding.
    pub fn check_batch(&self, batch: &AggregatedTransaction, batch_size: usize) -> Result<()> {
        batch.ensure_batch_size(batch_size)?;
        check_batch_results(self.result_encoding, &batch.ext_proof.inputs, batch_size)
    }
}

impl<T, P, N, A> fmt::Debug for SessionContext<T, P, N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("aggregator_url", &self.aggregator_url)
            .field("config_cache_path", &self.config_cache_path)
            .field("instance_path", &self.instance_path)
            .field("result_encoding", &self.result_encoding)
            .finish_non_exhaustive()
    }
}
