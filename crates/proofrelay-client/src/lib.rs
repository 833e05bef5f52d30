pub mod api;
pub mod batch;
pub mod client;
pub mod config_cache;
pub mod context;
pub mod dispatcher;
pub mod error;

pub use api::{AggregatorApi, ConnectApi, HttpAggregatorApi};
pub use batch::{check_batch_results, ResultEncoding};
pub use client::AggregatorClient;
pub use config_cache::get_or_fetch_configuration;
pub use context::SessionContext;
pub use dispatcher::{DispatcherContract, InstanceDescriptor};
pub use error::{ClientError, Result};
