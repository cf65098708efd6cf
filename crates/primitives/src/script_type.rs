//! Script type codes used by the wallet session to describe the inputs it asks us to sign.

use std::fmt;

/// Script type of a previous output, as numbered by the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// Pay to public key hash.
    P2pkh,

    /// Bare P2SH multisig.
    P2shMultisig,

    /// P2WSH multisig nested in P2SH.
    P2shP2wshMultisig,

    /// P2WSH multisig with a CSV recovery branch, nested in P2SH.
    P2shP2wshCsv,

    /// P2WPKH nested in P2SH.
    P2shP2wpkh,

    /// Native P2WPKH.
    P2wpkh,
}

/// A script type code this signer does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown script type {0}")]
pub struct UnknownScriptType(pub u32);

impl ScriptType {
    /// Maps a wallet-session code to a script type.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            2 => Some(Self::P2pkh),
            10 => Some(Self::P2shMultisig),
            14 => Some(Self::P2shP2wshMultisig),
            15 => Some(Self::P2shP2wshCsv),
            159 => Some(Self::P2shP2wpkh),
            162 => Some(Self::P2wpkh),
            _ => None,
        }
    }

    /// The wallet-session code.
    pub const fn code(self) -> u32 {
        match self {
            Self::P2pkh => 2,
            Self::P2shMultisig => 10,
            Self::P2shP2wshMultisig => 14,
            Self::P2shP2wshCsv => 15,
            Self::P2shP2wpkh => 159,
            Self::P2wpkh => 162,
        }
    }

    /// Whether inputs of this type are signed with a segwit v0 sighash.
    pub const fn is_segwit(self) -> bool {
        !matches!(self, Self::P2pkh | Self::P2shMultisig)
    }
}

impl TryFrom<u32> for ScriptType {
    type Error = UnknownScriptType;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownScriptType(code))
    }
}

impl From<ScriptType> for u32 {
    fn from(script_type: ScriptType) -> Self {
        script_type.code()
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::P2pkh => "p2pkh",
            Self::P2shMultisig => "p2sh-multisig",
            Self::P2shP2wshMultisig => "p2sh-p2wsh-multisig",
            Self::P2shP2wshCsv => "p2sh-p2wsh-csv",
            Self::P2shP2wpkh => "p2sh-p2wpkh",
            Self::P2wpkh => "p2wpkh",
        };
        f.write_str(name)
    }
}
