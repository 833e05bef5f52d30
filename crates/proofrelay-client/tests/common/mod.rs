use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proofrelay_client::api::{AggregatorApi, ConnectApi};
use proofrelay_client::error::{ClientError, Result};
use serde_json::{json, Value};
use url::Url;

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

pub(crate) fn groth16_vk_json() -> Value {
    json!({
        "alpha": ["0x01", "0x02"],
        "beta": [["0x03", "0x04"], ["0x05", "0x06"]],
        "delta": [["0x07", "0x08"], ["0x09", "0x0a"]],
        "ABC": [["0x0b", "0x0c"], ["0x0d", "0x0e"]],
    })
}

pub(crate) fn bn254_pairing_json() -> Value {
    json!({
        "name": "bn254",
        "r": "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
        "q": "0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47",
        "generator_g1": ["0x01", "0x02"],
        "generator_g2": [
            [
                "0x1800deef121f1e76426a00665e5c4479674322d4f75edadd46debd5cd992f6ed",
                "0x198e9393920d483a7260bfb731fb5d25f1aa493335a9e71297e485b7aef312c2"
            ],
            [
                "0x12c85ea5db8c6deb4aab71808dcb408fe3d1e7690c43d37b4ce6cc0166fa7daa",
                "0x090689d0585ff075ec9e99ad690c3395bc4b313370b38ef355acdadcd122975b"
            ]
        ],
    })
}

pub(crate) fn configuration_json() -> Value {
    json!({
        "nested_snark_name": "groth16",
        "wrapper_snark_name": "groth16",
        "nested_pairing_parameters": bn254_pairing_json(),
        "wrapper_pairing_parameters": bn254_pairing_json(),
    })
}

/// Batch of two nested proofs under the packed-bitfield result encoding:
/// input word 1 is `0x3`, both validity bits set.
pub(crate) fn aggregated_transaction_json() -> Value {
    json!({
        "application_name": "zeth",
        "proof": {
            "a": ["0x01", "0x02"],
            "b": [["0x03", "0x04"], ["0x05", "0x06"]],
            "c": ["0x07", "0x08"],
        },
        "inputs": ["0xaa", "0x3"],
        "nested_parameters": [["0x11", "0x12"], ["0x21", "0x22"]],
    })
}

pub(crate) fn nested_transaction_json() -> Value {
    json!({
        "application_name": "zeth",
        "extended_proof": {
            "proof": {
                "a": ["0x01", "0x02"],
                "b": [["0x03", "0x04"], ["0x05", "0x06"]],
                "c": ["0x07", "0x08"],
            },
            "inputs": ["0x09"],
        },
        "fee": 7,
    })
}

#[derive(Default)]
pub(crate) struct CallCounts {
    pub(crate) get_configuration: AtomicUsize,
    pub(crate) get_verification_key: AtomicUsize,
    pub(crate) get_nested_verification_key_hash: AtomicUsize,
    pub(crate) register_application: AtomicUsize,
    pub(crate) submit_nested_transaction: AtomicUsize,
    pub(crate) get_aggregated_transaction: AtomicUsize,
}

/// Canned-response transport double. Counts every call so tests can
/// assert the one-RPC-per-method contract, and records submitted bodies.
#[derive(Clone)]
pub(crate) struct FakeAggregatorApi {
    pub(crate) calls: Arc<CallCounts>,
    pub(crate) batch_ready: bool,
    pub(crate) registered: Arc<Mutex<Vec<(String, Value)>>>,
    pub(crate) submitted: Arc<Mutex<Vec<Value>>>,
}

impl FakeAggregatorApi {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(CallCounts::default()),
            batch_ready: true,
            registered: Arc::new(Mutex::new(Vec::new())),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_batch_pending() -> Self {
        Self {
            batch_ready: false,
            ..Self::new()
        }
    }
}

impl ConnectApi for FakeAggregatorApi {
    fn connect(_server_url: Url) -> Self {
        Self::new()
    }
}

#[async_trait]
impl AggregatorApi for FakeAggregatorApi {
    async fn get_configuration(&self) -> Result<Value> {
        self.calls.get_configuration.fetch_add(1, Ordering::SeqCst);
        Ok(configuration_json())
    }

    async fn get_verification_key(&self) -> Result<Value> {
        self.calls
            .get_verification_key
            .fetch_add(1, Ordering::SeqCst);
        Ok(groth16_vk_json())
    }

    async fn get_nested_verification_key_hash(&self, _vk: &Value) -> Result<String> {
        self.calls
            .get_nested_verification_key_hash
            .fetch_add(1, Ordering::SeqCst);
        Ok("0xdeadbeef".to_string())
    }

    async fn register_application(&self, application_name: &str, vk: &Value) -> Result<()> {
        self.calls
            .register_application
            .fetch_add(1, Ordering::SeqCst);
        self.registered
            .lock()
            .unwrap()
            .push((application_name.to_string(), vk.clone()));
        Ok(())
    }

    async fn submit_nested_transaction(&self, transaction: &Value) -> Result<()> {
        self.calls
            .submit_nested_transaction
            .fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    async fn get_aggregated_transaction(&self, application_name: &str) -> Result<Value> {
        self.calls
            .get_aggregated_transaction
            .fetch_add(1, Ordering::SeqCst);
        if !self.batch_ready {
            return Err(ClientError::BatchNotReady(format!(
                "no batch ready for application '{application_name}'"
            )));
        }
        Ok(aggregated_transaction_json())
    }
}
