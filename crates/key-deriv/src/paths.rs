//! BIP32 derivation path helpers.
//!
//! The wallet session hands paths over as lists of `u32` child numbers with the hardened bit
//! already set (e.g. `[0x8000_002c, 0x8000_0001, 0x8000_0000]`), while humans type them as
//! `m/44'/1'/0'`. Both forms map onto the same [`DerivationPath`].

use std::str::FromStr;

use bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::DerivationError;

/// Bit marking a hardened child number.
pub const HARDENED: u32 = 0x8000_0000;

/// Builds a [`DerivationPath`] from raw child numbers.
pub fn path_from_indices(indices: &[u32]) -> DerivationPath {
    indices
        .iter()
        .copied()
        .map(ChildNumber::from)
        .collect::<Vec<_>>()
        .into()
}

/// Parses either a `m/44'/1h/0` style path or a comma separated list of raw child numbers
/// (optionally wrapped in brackets).
pub fn parse_path(s: &str) -> Result<DerivationPath, DerivationError> {
    let s = s.trim();
    if s.is_empty() || s == "m" || s == "[]" {
        return Ok(DerivationPath::master());
    }

    if s.starts_with('[') || s.contains(',') || s.parse::<u32>().is_ok() {
        let indices = s
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DerivationError::InvalidPath(s.to_owned()))?;
        return Ok(path_from_indices(&indices));
    }

    let normalized = if s.starts_with("m/") {
        s.to_owned()
    } else {
        format!("m/{s}")
    };
    DerivationPath::from_str(&normalized).map_err(|_| DerivationError::InvalidPath(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardened_bit_round_trips() {
        let path = path_from_indices(&[HARDENED | 44, 1]);
        let children: Vec<ChildNumber> = (&path).into_iter().copied().collect();
        assert_eq!(
            children,
            vec![
                ChildNumber::Hardened { index: 44 },
                ChildNumber::Normal { index: 1 }
            ]
        );
    }

    #[test]
    fn textual_and_numeric_forms_agree() {
        let expected = path_from_indices(&[HARDENED | 44, HARDENED | 1, HARDENED, 0, 7]);
        assert_eq!(parse_path("m/44'/1'/0'/0/7").unwrap(), expected);
        assert_eq!(parse_path("44h/1h/0h/0/7").unwrap(), expected);
        assert_eq!(
            parse_path("[2147483692, 2147483649, 2147483648, 0, 7]").unwrap(),
            expected
        );
        assert_eq!(parse_path("12").unwrap(), path_from_indices(&[12]));
    }

    #[test]
    fn master_forms() {
        for s in ["", "m", "[]", "  m "] {
            assert_eq!(parse_path(s).unwrap(), DerivationPath::master());
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_path("m/x/1"),
            Err(DerivationError::InvalidPath(_))
        ));
        assert!(matches!(
            parse_path("[1, two]"),
            Err(DerivationError::InvalidPath(_))
        ));
    }
}
