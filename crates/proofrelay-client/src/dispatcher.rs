//! Wrapper around the on-chain dispatcher contract: deployment with an
//! embedded wrapper verification key, batch submission, and diagnostic
//! log decoding.

use core::fmt;
use std::marker::PhantomData;
use std::path::Path;

use alloy::network::{Network, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolValue;
use alloy::transports::Transport;
use proofrelay_primitives::encoding::hex_list_to_u256_words;
use proofrelay_primitives::{
    AggregatedTransaction, PairingParameters, VerificationKey, WrapperSnark, WrapperTier,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use crate::error::{ClientError, Result};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract Dispatcher {
        event Diagnostic(string message, uint256 value);

        function process_batch(
            uint256[] calldata proof,
            uint256[] calldata inputs,
            uint256[] calldata nested_parameters,
            address application
        ) external returns (uint256);
    }
}

/// Serializable handle to a deployed dispatcher: address plus interface
/// descriptor, persisted between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    pub address: Address,
    pub abi: Value,
}

impl InstanceDescriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::InstanceError(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ClientError::InstanceError(format!("invalid instance file {}: {e}", path.display()))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| ClientError::InstanceError(e.to_string()))?;
        std::fs::write(path, serialized).map_err(|e| {
            ClientError::InstanceError(format!("failed to write {}: {e}", path.display()))
        })
    }
}

fn dispatcher_abi() -> Value {
    json!([
        {
            "type": "constructor",
            "inputs": [{ "name": "verification_key", "type": "uint256[]" }],
        },
        {
            "type": "function",
            "name": "process_batch",
            "inputs": [
                { "name": "proof", "type": "uint256[]" },
                { "name": "inputs", "type": "uint256[]" },
                { "name": "nested_parameters", "type": "uint256[]" },
                { "name": "application", "type": "address" },
            ],
            "outputs": [{ "name": "", "type": "uint256" }],
            "stateMutability": "nonpayable",
        },
        {
            "type": "event",
            "name": "Diagnostic",
            "inputs": [
                { "name": "message", "type": "string", "indexed": false },
                { "name": "value", "type": "uint256", "indexed": false },
            ],
        },
    ])
}

/// Flatten the per-nested-transaction parameter blobs into one word
/// sequence. The on-chain entry point takes a flat array; the contract
/// reconstitutes per-item boundaries by fixed stride, so the encoding is
/// plain concatenation with no length prefixes.
pub fn flatten_nested_parameters(
    nested_parameters: &[Vec<String>],
) -> core::result::Result<Vec<U256>, proofrelay_primitives::PrimitivesError> {
    let mut words = Vec::new();
    for blob in nested_parameters {
        words.extend(hex_list_to_u256_words(blob)?);
    }
    Ok(words)
}

pub struct DispatcherContract<T, P, N> {
    rpc_provider: P,
    address: Address,
    phantom_data: PhantomData<(T, N)>,
}

impl<T, P, N> fmt::Debug for DispatcherContract<T, P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherContract")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<T, P, N> DispatcherContract<T, P, N>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
{
    /// Re-attach to a previously deployed dispatcher.
    pub fn from_instance(rpc_provider: P, instance: &InstanceDescriptor) -> Self {
        Self {
            rpc_provider,
            address: instance.address,
            phantom_data: PhantomData,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Deploy the dispatcher with the aggregator's verification key baked
    /// in as its immutable trust root. Contract compilation is external:
    /// the caller supplies the creation bytecode, this encodes the key as
    /// the single constructor argument. The sending identity is the one
    /// carried by the rpc provider's wallet.
    pub async fn deploy(
        rpc_provider: P,
        bytecode: Bytes,
        wrapper_snark: &WrapperSnark,
        pairing: &PairingParameters,
        vk: &VerificationKey<WrapperTier>,
    ) -> Result<(Self, InstanceDescriptor)> {
        let vk_words = wrapper_snark.verification_key_to_contract_parameters(vk, pairing)?;
        let constructor_args = (vk_words,).abi_encode_params();
        let deploy_code = [bytecode.to_vec(), constructor_args].concat();

        let request = N::TransactionRequest::default().with_deploy_code(deploy_code);
        let receipt = rpc_provider
            .send_transaction(request)
            .await
            .map_err(|e| ClientError::TransactionError(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ClientError::TransactionFailure(e.to_string()))?;

        let address = receipt.contract_address().ok_or_else(|| {
            ClientError::TransactionFailure(
                "deploy receipt carries no contract address".to_string(),
            )
        })?;
        tracing::info!("dispatcher deployed at {address}");

        let descriptor = InstanceDescriptor {
            address,
            abi: dispatcher_abi(),
        };
        Ok((
            Self {
                rpc_provider,
                address,
                phantom_data: PhantomData,
            },
            descriptor,
        ))
    }

    /// Encode an aggregated transaction and invoke the contract's batch
    /// entry point. Returns the broadcast transaction hash; confirmation
    /// is a separate, caller-timed step ([`Self::wait_for_confirmation`]).
    pub async fn process_batch(
        &self,
        wrapper_snark: &WrapperSnark,
        pairing: &PairingParameters,
        batch: &AggregatedTransaction,
        application_address: Address,
    ) -> Result<B256> {
        let proof_words =
            wrapper_snark.proof_to_contract_parameters(&batch.ext_proof.proof, pairing)?;
        let input_words = hex_list_to_u256_words(&batch.ext_proof.inputs)?;
        let nested_parameter_words = flatten_nested_parameters(&batch.nested_parameters)?;

        let contract = Dispatcher::new(self.address, self.rpc_provider.clone());
        let pending = contract
            .process_batch(
                proof_words,
                input_words,
                nested_parameter_words,
                application_address,
            )
            .send()
            .await
            .map_err(|e| ClientError::TransactionError(e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(
            "batch for '{}' broadcast as {tx_hash}",
            batch.application_name
        );
        Ok(tx_hash)
    }

    /// Wait until the transaction is mined or `timeout` elapses. A receipt
    /// with a non-success status is always a processing failure, never
    /// ambiguous; exceeding the timeout is a reported failure, not a
    /// silent retry.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<N::ReceiptResponse> {
        let poll_interval = Duration::from_secs(1);
        let wait = async {
            loop {
                match self.rpc_provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok(receipt),
                    Ok(None) => sleep(poll_interval).await,
                    Err(e) => return Err(ClientError::CommunicationError(e.to_string())),
                }
            }
        };
        let receipt = tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| {
                ClientError::ConfirmationTimeout(format!(
                    "no receipt for {tx_hash} within {timeout:?}"
                ))
            })??;
        if !receipt.status() {
            return Err(ClientError::TransactionFailure(format!(
                "transaction {tx_hash} reverted"
            )));
        }
        Ok(receipt)
    }

    /// Decode and print the dispatcher's diagnostic events from a mined
    /// transaction's logs. Observational only.
    pub fn dump_logs(&self, logs: &[Log]) {
        for log in logs {
            if log.address() != self.address {
                continue;
            }
            match log.log_decode::<Dispatcher::Diagnostic>() {
                Ok(decoded) => {
                    let event = decoded.inner.data;
                    tracing::info!(
                        message = %event.message,
                        value = %event.value,
                        "dispatcher diagnostic"
                    );
                }
                Err(e) => {
                    tracing::debug!("undecodable dispatcher log: {e}");
                }
            }
        }
    }
}
