//! Proving-system identifiers and the tiered capability handles used to
//! interpret verification keys and proofs.
//!
//! Two snark tiers are in play at once: the *nested* tier used by
//! applications and the *wrapper* tier used by the aggregator and verified
//! on-chain. The tier is part of every handle's type, so a nested key can
//! never reach a wrapper operation (or vice versa). Scheme mismatches
//! within a tier are caught at runtime as consistency errors.

use core::fmt;
use core::marker::PhantomData;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PrimitivesError, Result};
use crate::pairing::PairingParameters;
use crate::snark::groth16::{Groth16Proof, Groth16VerificationKey};
use crate::snark::pghr13::{Pghr13Proof, Pghr13VerificationKey};

pub mod groth16;
pub mod pghr13;

// Macro for generating scheme ids and their string forms.
macro_rules! snark_schemes {
    (
        $(
            ($variant:ident, $str:literal)
        ),* $(,)?
    ) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SnarkId {
            $(
                #[serde(rename = $str)]
                $variant
            ),*
        }

        impl SnarkId {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str),*
                }
            }

            pub const fn all() -> &'static [SnarkId] {
                &[$(SnarkId::$variant),*]
            }
        }

        impl TryFrom<&str> for SnarkId {
            type Error = PrimitivesError;

            fn try_from(s: &str) -> Result<Self> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)*
                    other => Err(PrimitivesError::InvalidScheme(other.to_string())),
                }
            }
        }
    }
}

snark_schemes! {
    (Groth16, "groth16"),
    (Pghr13, "pghr13"),
}

impl fmt::Display for SnarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::NestedTier {}
    impl Sealed for super::WrapperTier {}
}

/// Marker trait for the two proof tiers.
pub trait ProofTier:
    sealed::Sealed + Clone + Copy + fmt::Debug + Send + Sync + 'static
{
    const LABEL: &'static str;
}

/// Tier of proofs produced by individual applications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NestedTier;

/// Tier of the aggregator's batch proofs, verified on-chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapperTier;

impl ProofTier for NestedTier {
    const LABEL: &'static str = "nested";
}

impl ProofTier for WrapperTier {
    const LABEL: &'static str = "wrapper";
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemeVerificationKey {
    Groth16(Groth16VerificationKey),
    Pghr13(Pghr13VerificationKey),
}

impl SchemeVerificationKey {
    pub fn scheme(&self) -> SnarkId {
        match self {
            Self::Groth16(_) => SnarkId::Groth16,
            Self::Pghr13(_) => SnarkId::Pghr13,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemeProof {
    Groth16(Groth16Proof),
    Pghr13(Pghr13Proof),
}

impl SchemeProof {
    pub fn scheme(&self) -> SnarkId {
        match self {
            Self::Groth16(_) => SnarkId::Groth16,
            Self::Pghr13(_) => SnarkId::Pghr13,
        }
    }
}

/// A verification key bound to a proof tier. Only mintable through the
/// matching [`SnarkHandle`], so tiers cannot be mixed up downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationKey<T: ProofTier> {
    key: SchemeVerificationKey,
    tier: PhantomData<T>,
}

impl<T: ProofTier> VerificationKey<T> {
    pub fn scheme(&self) -> SnarkId {
        self.key.scheme()
    }

    pub fn as_scheme_key(&self) -> &SchemeVerificationKey {
        &self.key
    }
}

impl<T: ProofTier> Serialize for VerificationKey<T> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> core::result::Result<S::Ok, S::Error> {
        self.key.serialize(serializer)
    }
}

/// A proof bound to a proof tier.
#[derive(Clone, Debug, PartialEq)]
pub struct Proof<T: ProofTier> {
    proof: SchemeProof,
    tier: PhantomData<T>,
}

impl<T: ProofTier> Proof<T> {
    pub fn scheme(&self) -> SnarkId {
        self.proof.scheme()
    }

    pub fn as_scheme_proof(&self) -> &SchemeProof {
        &self.proof
    }
}

impl<T: ProofTier> Serialize for Proof<T> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> core::result::Result<S::Ok, S::Error> {
        self.proof.serialize(serializer)
    }
}

/// Capability handle for one proving system at one tier: JSON codec plus
/// on-chain parameter encoding for keys and proofs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnarkHandle<T: ProofTier> {
    scheme: SnarkId,
    tier: PhantomData<T>,
}

pub type NestedSnark = SnarkHandle<NestedTier>;
pub type WrapperSnark = SnarkHandle<WrapperTier>;

impl<T: ProofTier> SnarkHandle<T> {
    pub fn new(scheme: SnarkId) -> Self {
        Self {
            scheme,
            tier: PhantomData,
        }
    }

    pub fn scheme(&self) -> SnarkId {
        self.scheme
    }

    pub(crate) fn ensure_scheme(&self, found: SnarkId, what: &str) -> Result<()> {
        if found != self.scheme {
            return Err(PrimitivesError::ConsistencyError(format!(
                "{what} uses scheme {found} but the {} tier is configured for {}",
                T::LABEL,
                self.scheme
            )));
        }
        Ok(())
    }

    pub fn verification_key_from_json(&self, value: &Value) -> Result<VerificationKey<T>> {
        let key = match self.scheme {
            SnarkId::Groth16 => serde_json::from_value::<Groth16VerificationKey>(value.clone())
                .map(SchemeVerificationKey::Groth16),
            SnarkId::Pghr13 => serde_json::from_value::<Pghr13VerificationKey>(value.clone())
                .map(SchemeVerificationKey::Pghr13),
        }
        .map_err(|e| {
            PrimitivesError::SerializationError(format!(
                "invalid {} verification key: {e}",
                self.scheme
            ))
        })?;
        Ok(VerificationKey {
            key,
            tier: PhantomData,
        })
    }

    pub fn verification_key_to_json(&self, vk: &VerificationKey<T>) -> Result<Value> {
        self.ensure_scheme(vk.scheme(), "verification key")?;
        serde_json::to_value(&vk.key).map_err(|e| PrimitivesError::SerializationError(e.to_string()))
    }

    pub fn verification_key_to_contract_parameters(
        &self,
        vk: &VerificationKey<T>,
        pairing: &PairingParameters,
    ) -> Result<Vec<U256>> {
        self.ensure_scheme(vk.scheme(), "verification key")?;
        match &vk.key {
            SchemeVerificationKey::Groth16(key) => key.to_contract_parameters(pairing),
            SchemeVerificationKey::Pghr13(key) => key.to_contract_parameters(pairing),
        }
    }

    pub fn proof_from_json(&self, value: &Value) -> Result<Proof<T>> {
        let proof = match self.scheme {
            SnarkId::Groth16 => {
                serde_json::from_value::<Groth16Proof>(value.clone()).map(SchemeProof::Groth16)
            }
            SnarkId::Pghr13 => {
                serde_json::from_value::<Pghr13Proof>(value.clone()).map(SchemeProof::Pghr13)
            }
        }
        .map_err(|e| {
            PrimitivesError::SerializationError(format!("invalid {} proof: {e}", self.scheme))
        })?;
        Ok(Proof {
            proof,
            tier: PhantomData,
        })
    }

    pub fn proof_to_json(&self, proof: &Proof<T>) -> Result<Value> {
        self.ensure_scheme(proof.scheme(), "proof")?;
        serde_json::to_value(&proof.proof)
            .map_err(|e| PrimitivesError::SerializationError(e.to_string()))
    }

    pub fn proof_to_contract_parameters(
        &self,
        proof: &Proof<T>,
        pairing: &PairingParameters,
    ) -> Result<Vec<U256>> {
        self.ensure_scheme(proof.scheme(), "proof")?;
        match &proof.proof {
            SchemeProof::Groth16(p) => p.to_contract_parameters(pairing),
            SchemeProof::Pghr13(p) => p.to_contract_parameters(pairing),
        }
    }
}
