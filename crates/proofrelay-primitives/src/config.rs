use serde::{Deserialize, Serialize};

use crate::pairing::PairingParameters;
use crate::snark::{NestedSnark, SnarkId, WrapperSnark};

/// The snark schemes and pairing parameters in force for one aggregation
/// endpoint. Fetched once from the server, cached client-side; immutable
/// after construction. Every key, proof and transaction exchanged with the
/// endpoint is interpreted through the handles this configuration mints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfiguration {
    pub nested_snark_name: SnarkId,
    pub wrapper_snark_name: SnarkId,
    pub nested_pairing_parameters: PairingParameters,
    pub wrapper_pairing_parameters: PairingParameters,
}

impl AggregatorConfiguration {
    pub fn nested_snark(&self) -> NestedSnark {
        NestedSnark::new(self.nested_snark_name)
    }

    pub fn wrapper_snark(&self) -> WrapperSnark {
        WrapperSnark::new(self.wrapper_snark_name)
    }
}
