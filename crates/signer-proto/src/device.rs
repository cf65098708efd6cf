//! Capability descriptor reported once when the signer registers with a wallet session.

use serde::{Deserialize, Serialize};

/// Name the software signer registers under.
pub const DEVICE_NAME: &str = "software signer";

/// Device capabilities as the wallet session expects them.
///
/// The wallet session types `supports_liquid` and `supports_ae_protocol` as integers and the rest
/// as booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Human readable device name.
    pub name: String,

    /// Whether every signature is guaranteed to have a low R value.
    ///
    /// Anti-Exfil signatures cannot be ground, so this is off whenever Anti-Exfil is supported.
    pub supports_low_r: bool,

    /// Non-zero when the device can sign confidential transactions.
    pub supports_liquid: u8,

    /// Whether the host may unblind outputs with keys exported by the device.
    pub supports_host_unblinding: bool,

    /// Non-zero when the device speaks the Anti-Exfil protocol.
    pub supports_ae_protocol: u8,

    /// Whether the device signs inputs with scripts it did not generate itself.
    pub supports_arbitrary_scripts: bool,
}

impl DeviceInfo {
    /// Capabilities of the software signer for plain or confidential networks.
    pub fn software(confidential: bool) -> Self {
        Self {
            name: DEVICE_NAME.to_owned(),
            supports_low_r: false,
            supports_liquid: u8::from(confidential),
            supports_host_unblinding: confidential,
            supports_ae_protocol: 1,
            supports_arbitrary_scripts: true,
        }
    }
}

/// The `{"device": {...}}` envelope the wallet session registers hardware devices with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// The wrapped capabilities.
    pub device: DeviceInfo,
}

impl From<DeviceInfo> for DeviceDescriptor {
    fn from(device: DeviceInfo) -> Self {
        Self { device }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_shape() {
        let plain = serde_json::to_value(DeviceDescriptor::from(DeviceInfo::software(false)))
            .unwrap();
        assert_eq!(
            plain,
            json!({
                "device": {
                    "name": "software signer",
                    "supports_low_r": false,
                    "supports_liquid": 0,
                    "supports_host_unblinding": false,
                    "supports_ae_protocol": 1,
                    "supports_arbitrary_scripts": true,
                }
            })
        );

        let confidential = DeviceInfo::software(true);
        assert_eq!(confidential.supports_liquid, 1);
        assert!(confidential.supports_host_unblinding);
    }
}
