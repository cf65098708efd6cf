//! Output blinding for confidential transactions.
//!
//! Every non-fee output gets a random asset blinding factor and a random value blinding factor,
//! except the last one whose value blinding factor balances the generator blinding equation
//!
//! ```text
//! Σ_inputs (v·abf + vbf) = Σ_outputs (v·abf + vbf)   (mod n)
//! ```
//!
//! so that the value commitments of inputs and outputs sum to the same point. The commitments
//! are then written into the transaction so the sighashes cover them.

use elements::{
    confidential::{Asset, AssetBlindingFactor, Value, ValueBlindingFactor},
    encode::serialize,
    secp256k1_zkp::{Secp256k1, Signing},
    AssetId,
};
use k256::{elliptic_curve::PrimeField, FieldBytes, Scalar};
use rand::{rngs::OsRng, RngCore};
use soft_signer_primitives::byte_order::to_display_hex;
use soft_signer_proto::{BlindingData, TransactionDetails};
use tracing::debug;

use crate::{
    fields::{display_order, required},
    SignerError,
};

/// A blinding factor as a 32-byte big-endian scalar.
type Blinder = [u8; 32];

/// One side of the balancing equation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint {
    pub(crate) value: u64,
    pub(crate) abf: Blinder,
    pub(crate) vbf: Blinder,
}

fn scalar(bytes: &Blinder) -> Result<Scalar, SignerError> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or(SignerError::InvalidBlindingFactor)
}

/// `v·abf + vbf`.
fn contribution(endpoint: &Endpoint) -> Result<Scalar, SignerError> {
    Ok(Scalar::from(endpoint.value) * scalar(&endpoint.abf)? + scalar(&endpoint.vbf)?)
}

/// Computes the value blinding factor of the last endpoint so the equation balances.
///
/// The first `n_inputs` endpoints are inputs, the rest outputs. The `vbf` of the last endpoint is
/// ignored.
pub(crate) fn final_value_blinder(
    endpoints: &[Endpoint],
    n_inputs: usize,
) -> Result<Blinder, SignerError> {
    if n_inputs == 0 {
        return Err(SignerError::EmptyEndpointSet);
    }
    let Some((last, rest)) = endpoints.split_last() else {
        return Err(SignerError::EmptyEndpointSet);
    };
    if rest.len() < n_inputs {
        return Err(SignerError::NoBlindedOutput);
    }

    let (inputs, outputs) = rest.split_at(n_inputs);
    let mut sum = Scalar::ZERO;
    for input in inputs {
        sum += contribution(input)?;
    }
    for output in outputs {
        sum -= contribution(output)?;
    }
    sum -= Scalar::from(last.value) * scalar(&last.abf)?;

    let mut out = [0u8; 32];
    out.copy_from_slice(&sum.to_bytes());
    Ok(out)
}

/// A uniformly random scalar drawn from the OS entropy source.
fn random_blinder() -> Result<Blinder, SignerError> {
    loop {
        let mut bytes = [0u8; 32];
        OsRng.try_fill_bytes(&mut bytes)?;
        if scalar(&bytes).is_ok() {
            return Ok(bytes);
        }
    }
}

/// Blinds the outputs of an Elements transaction.
#[derive(Debug)]
pub struct ConfidentialBlinder<'a, C: Signing> {
    secp: &'a Secp256k1<C>,
}

impl<'a, C: Signing> ConfidentialBlinder<'a, C> {
    /// Creates a blinder using the given context.
    pub const fn new(secp: &'a Secp256k1<C>) -> Self {
        Self { secp }
    }

    /// Blinds every non-fee output of `tx` against the UTXOs in `details`, writes the asset and
    /// value commitments into `tx`, and returns the blinding data with one slot per output.
    pub fn blind(
        &self,
        tx: &mut elements::Transaction,
        details: &TransactionDetails,
    ) -> Result<BlindingData, SignerError> {
        let outputs = &details.transaction_outputs;
        if outputs.len() != tx.output.len() {
            return Err(SignerError::OutputMismatch {
                described: outputs.len(),
                actual: tx.output.len(),
            });
        }

        let mut endpoints = details
            .spent_utxos()
            .iter()
            .map(|utxo| {
                Ok(Endpoint {
                    value: utxo.satoshi,
                    abf: display_order(
                        "assetblinder",
                        required("assetblinder", utxo.assetblinder.as_ref())?,
                    )?,
                    vbf: display_order(
                        "amountblinder",
                        required("amountblinder", utxo.amountblinder.as_ref())?,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, SignerError>>()?;
        let n_inputs = endpoints.len();
        if n_inputs == 0 {
            return Err(SignerError::EmptyEndpointSet);
        }

        let blinded: Vec<usize> = outputs
            .iter()
            .enumerate()
            .filter(|(_, output)| !output.is_fee)
            .map(|(index, _)| index)
            .collect();
        if blinded.is_empty() {
            return Err(SignerError::NoBlindedOutput);
        }

        for &index in &blinded {
            endpoints.push(Endpoint {
                value: outputs[index].satoshi,
                abf: random_blinder()?,
                vbf: random_blinder()?,
            });
        }
        let last = endpoints.len() - 1;
        endpoints[last].vbf = final_value_blinder(&endpoints, n_inputs)?;

        let slots = outputs.len();
        let mut data = BlindingData {
            assetblinders: vec![String::new(); slots],
            amountblinders: vec![String::new(); slots],
            asset_commitments: vec![String::new(); slots],
            value_commitments: vec![String::new(); slots],
        };

        for (&index, endpoint) in blinded.iter().zip(&endpoints[n_inputs..]) {
            let asset_id = display_order(
                "asset_id",
                required("asset_id", outputs[index].asset_id.as_ref())?,
            )?;
            let asset_id =
                AssetId::from_slice(&asset_id).map_err(|e| SignerError::invalid("asset_id", e))?;
            let abf = AssetBlindingFactor::from_slice(&endpoint.abf)
                .map_err(|_| SignerError::InvalidBlindingFactor)?;
            let vbf = ValueBlindingFactor::from_slice(&endpoint.vbf)
                .map_err(|_| SignerError::InvalidBlindingFactor)?;

            let (asset, value) = self.commit(asset_id, abf, outputs[index].satoshi, vbf)?;
            tx.output[index].asset = asset;
            tx.output[index].value = value;

            data.assetblinders[index] = to_display_hex(&endpoint.abf);
            data.amountblinders[index] = to_display_hex(&endpoint.vbf);
            data.asset_commitments[index] = hex::encode(serialize(&asset));
            data.value_commitments[index] = hex::encode(serialize(&value));
            debug!(%index, asset_commitment = %data.asset_commitments[index], "blinded output");
        }

        Ok(data)
    }

    /// Asset commitment to `asset_id` and value commitment to `satoshi` under it.
    pub fn commit(
        &self,
        asset_id: AssetId,
        abf: AssetBlindingFactor,
        satoshi: u64,
        vbf: ValueBlindingFactor,
    ) -> Result<(Asset, Value), SignerError> {
        let asset = Asset::new_confidential(self.secp, asset_id, abf);
        let generator = asset.commitment().ok_or(SignerError::InvalidBlindingFactor)?;
        let value = Value::new_confidential(self.secp, satoshi, generator, vbf);
        Ok((asset, value))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sum_side(endpoints: &[Endpoint]) -> Scalar {
        endpoints
            .iter()
            .map(|e| contribution(e).unwrap())
            .fold(Scalar::ZERO, |acc, c| acc + c)
    }

    fn arb_endpoint(zero_abf: bool) -> impl Strategy<Value = Endpoint> {
        (any::<u64>(), any::<u64>(), any::<u64>()).prop_map(move |(value, abf, vbf)| {
            let mut a = [0u8; 32];
            let mut v = [0u8; 32];
            if !zero_abf {
                a[24..].copy_from_slice(&abf.to_be_bytes());
                a[0] = 0x7f;
            }
            v[24..].copy_from_slice(&vbf.to_be_bytes());
            v[0] = 0x3c;
            Endpoint {
                value,
                abf: a,
                vbf: v,
            }
        })
    }

    proptest! {
        #[test]
        fn balances_generator_blinding_equation(
            inputs in prop::collection::vec(arb_endpoint(false), 1..4),
            outputs in prop::collection::vec(arb_endpoint(false), 1..4),
        ) {
            let n_inputs = inputs.len();
            let mut endpoints = [inputs, outputs].concat();
            let last = endpoints.len() - 1;
            endpoints[last].vbf = final_value_blinder(&endpoints, n_inputs).unwrap();

            let (ins, outs) = endpoints.split_at(n_inputs);
            prop_assert_eq!(sum_side(ins), sum_side(outs));
        }

        #[test]
        fn value_blinders_sum_to_zero_without_asset_blinding(
            inputs in prop::collection::vec(arb_endpoint(true), 1..4),
            outputs in prop::collection::vec(arb_endpoint(true), 1..4),
        ) {
            let n_inputs = inputs.len();
            let mut endpoints = [inputs, outputs].concat();
            let last = endpoints.len() - 1;
            endpoints[last].vbf = final_value_blinder(&endpoints, n_inputs).unwrap();

            let mut sum = Scalar::ZERO;
            for (i, endpoint) in endpoints.iter().enumerate() {
                let vbf = scalar(&endpoint.vbf).unwrap();
                if i < n_inputs { sum += vbf } else { sum -= vbf }
            }
            prop_assert!(bool::from(sum.is_zero()));
        }
    }

    #[test]
    fn balancing_needs_both_sides() {
        let endpoint = Endpoint {
            value: 1,
            abf: [1u8; 32],
            vbf: [2u8; 32],
        };
        assert!(matches!(
            final_value_blinder(&[], 0),
            Err(SignerError::EmptyEndpointSet)
        ));
        assert!(matches!(
            final_value_blinder(&[endpoint], 1),
            Err(SignerError::NoBlindedOutput)
        ));
        assert!(final_value_blinder(&[endpoint, endpoint], 1).is_ok());
    }

    #[test]
    fn random_blinders_are_fresh() {
        let a = random_blinder().unwrap();
        let b = random_blinder().unwrap();
        assert_ne!(a, b);
        assert!(scalar(&a).is_ok());
    }

    #[test]
    fn commitments_bind_amount_and_blinder() {
        let secp = Secp256k1::new();
        let blinder = ConfidentialBlinder::new(&secp);
        let asset_id = AssetId::from_slice(&[9u8; 32]).unwrap();
        let abf = AssetBlindingFactor::from_slice(&random_blinder().unwrap()).unwrap();

        let vbf = ValueBlindingFactor::from_slice(&random_blinder().unwrap()).unwrap();
        let (asset, value) = blinder.commit(asset_id, abf, 1_000, vbf).unwrap();
        let (asset_again, value_again) = blinder.commit(asset_id, abf, 1_000, vbf).unwrap();
        assert_eq!(asset, asset_again);
        assert_eq!(value, value_again);
        assert_eq!(serialize(&value).len(), 33);
        assert_eq!(serialize(&asset).len(), 33);

        let mut seen = vec![serialize(&value)];
        for amount in 1_001..1_065 {
            let vbf = ValueBlindingFactor::from_slice(&random_blinder().unwrap()).unwrap();
            let (_, value) = blinder.commit(asset_id, abf, amount, vbf).unwrap();
            let bytes = serialize(&value);
            assert!(!seen.contains(&bytes));
            seen.push(bytes);
        }
    }
}
