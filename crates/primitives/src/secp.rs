//! SECP256K1 scalar and point helpers on top of `k256`, plus BIP340-style tagged hashing.

use bitcoin::hashes::{sha256, Hash, HashEngine};
use k256::{
    elliptic_curve::{ops::Reduce, point::AffineCoordinates, sec1::ToEncodedPoint, PrimeField},
    FieldBytes, ProjectivePoint, PublicKey, Scalar, U256,
};

/// Parses a non-zero scalar strictly below the group order.
pub(crate) fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
    scalar.filter(|s| !bool::from(s.is_zero()))
}

/// Interprets 32 bytes as a big-endian integer reduced modulo the group order.
pub(crate) fn scalar_reduce(bytes: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
}

/// Big-endian encoding of a scalar.
pub(crate) fn scalar_to_bytes(scalar: &Scalar) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&scalar.to_bytes());
    out
}

/// SEC1 compressed encoding of a point.
///
/// Returns [`None`] for the point at infinity.
pub(crate) fn point_to_compressed(point: &ProjectivePoint) -> Option<[u8; 33]> {
    let encoded = point.to_affine().to_encoded_point(true);
    let bytes = encoded.as_bytes();
    if bytes.len() != 33 {
        return None;
    }
    let mut out = [0u8; 33];
    out.copy_from_slice(bytes);
    Some(out)
}

/// Parses a SEC1 compressed point.
///
/// Only the `0x02`/`0x03` tags are accepted.
pub(crate) fn point_from_compressed(bytes: &[u8; 33]) -> Option<ProjectivePoint> {
    if !matches!(bytes[0], 0x02 | 0x03) {
        return None;
    }
    PublicKey::from_sec1_bytes(bytes)
        .ok()
        .map(|pk| pk.to_projective())
}

/// The x coordinate of a point reduced modulo the group order, i.e. the ECDSA `r` value.
pub(crate) fn point_x_scalar(point: &ProjectivePoint) -> Scalar {
    let x = point.to_affine().x();
    <Scalar as Reduce<U256>>::reduce_bytes(&x)
}

/// `SHA256(SHA256(tag) || SHA256(tag) || data...)`.
pub(crate) fn tagged_hash(tag: &[u8], chunks: &[&[u8]]) -> [u8; 32] {
    let tag_hash = sha256::Hash::hash(tag);
    let mut engine = sha256::Hash::engine();
    engine.input(tag_hash.as_byte_array());
    engine.input(tag_hash.as_byte_array());
    for chunk in chunks {
        engine.input(chunk);
    }
    sha256::Hash::from_engine(engine).to_byte_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_rejected_but_reduced() {
        // n, the group order
        let n: [u8; 32] = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c,
            0xd0, 0x36, 0x41, 0x41,
        ];
        assert!(scalar_from_bytes(&n).is_none());
        assert!(bool::from(scalar_reduce(&n).is_zero()));
        assert!(scalar_from_bytes(&[0u8; 32]).is_none());
    }

    #[test]
    fn compressed_points_round_trip() {
        let point = ProjectivePoint::GENERATOR * Scalar::from(7u64);
        let bytes = point_to_compressed(&point).unwrap();
        assert!(bytes[0] == 0x02 || bytes[0] == 0x03);
        assert_eq!(point_from_compressed(&bytes).unwrap(), point);
        assert!(point_to_compressed(&ProjectivePoint::IDENTITY).is_none());
    }

    #[test]
    fn only_compressed_tags_parse() {
        let bytes = point_to_compressed(&(ProjectivePoint::GENERATOR * Scalar::from(7u64))).unwrap();
        for tag in [0x00, 0x04, 0x05, 0x06, 0x07] {
            let mut tagged = bytes;
            tagged[0] = tag;
            assert!(point_from_compressed(&tagged).is_none(), "tag {tag:#04x}");
        }
    }

    #[test]
    fn tagged_hash_matches_manual_construction() {
        let tag = sha256::Hash::hash(b"s2c/ecdsa/data");
        let mut preimage = Vec::new();
        preimage.extend_from_slice(tag.as_byte_array());
        preimage.extend_from_slice(tag.as_byte_array());
        preimage.extend_from_slice(&[9u8; 32]);
        assert_eq!(
            tagged_hash(b"s2c/ecdsa/data", &[&[9u8; 32]]),
            sha256::Hash::hash(&preimage).to_byte_array()
        );
    }
}
