//! ## uevakt-relation::rfsim
//! Codec for the `fiveg_rfsim` interface databag.
//!
//! The peer platform serializes every databag value as a string, so the wire
//! form is a flat JSON object of string keys to string values. Decoding is
//! tolerant of missing optional fields but distinguishes three failure
//! classes: mandatory fields absent ("incomplete", the peer has not published
//! yet), a version marker we do not speak ("incompatible", will not
//! self-resolve), and fields that are present but unparseable.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use bytes::Bytes;
use thiserror::Error;

/// Interface version this codec speaks.
pub const SUPPORTED_VERSION: u32 = 0;

/// Port the RF simulator server listens on unless the peer says otherwise.
pub const DEFAULT_RFSIM_PORT: u16 = 4043;

/// Largest value the 24-bit Slice Differentiator can carry.
const SD_MAX: u32 = 0xFF_FFFF;

/// Errors that can occur while decoding a `fiveg_rfsim` databag.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RfsimDecodeError {
    #[error("relation data is missing mandatory field `{field}`")]
    Incomplete { field: &'static str },
    #[error("unsupported `fiveg_rfsim` interface version {got} (supported: {supported})")]
    IncompatibleVersion { got: String, supported: u32 },
    #[error("malformed relation field `{field}`: {reason}")]
    Malformed { field: &'static str, reason: String },
    #[error("relation databag is not a JSON object of strings: {0}")]
    Payload(String),
}

impl RfsimDecodeError {
    /// True for conditions that external re-triggering cannot clear.
    ///
    /// An incompatible interface version needs operator intervention; every
    /// other decode failure clears once the peer publishes complete data.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RfsimDecodeError::IncompatibleVersion { .. })
    }
}

/// 24-bit Slice Differentiator in canonical form.
///
/// Canonical form is lowercase `0x`-prefixed hex, zero-padded to six digits.
/// Construction enforces the range, so a `SliceDiff` is canonical by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliceDiff(u32);

impl SliceDiff {
    pub fn new(value: u32) -> Option<Self> {
        (value <= SD_MAX).then_some(Self(value))
    }

    /// Parse a peer-supplied value, decimal or `0x`-prefixed hex.
    pub fn parse(text: &str) -> Option<Self> {
        let value = if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
        {
            u32::from_str_radix(digits, 16).ok()?
        } else {
            text.parse::<u32>().ok()?
        };
        Self::new(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Canonical wire and config-file representation, e.g. `0x102030`.
    pub fn canonical(self) -> String {
        format!("0x{:06x}", self.0)
    }
}

impl fmt::Display for SliceDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06x}", self.0)
    }
}

/// Decoded RF-simulation parameters from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfsimData {
    /// Interface version the peer published (ours after a successful decode).
    pub version: u32,
    /// RF simulator service address, equal to the peer pod IP.
    pub address: IpAddr,
    /// RF simulator service port.
    pub port: u16,
    /// Slice/Service Type.
    pub sst: u8,
    /// Slice Differentiator, canonical.
    pub sd: SliceDiff,
}

/// Observable presence of the `fiveg_rfsim` integration.
///
/// `NotDeclared` means the integration is not part of this deployment at all;
/// `NotJoined` means the endpoint exists but no relation has been established;
/// `Joined` carries the remote application databag as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationState {
    NotDeclared,
    NotJoined,
    Joined(Bytes),
}

/// Codec for the `fiveg_rfsim` databag wire form.
#[derive(Default, Debug, Copy, Clone)]
pub struct RfsimCodec;

impl RfsimCodec {
    /// Decodes the remote application databag into [`RfsimData`].
    pub fn decode(raw: &Bytes) -> Result<RfsimData, RfsimDecodeError> {
        let bag: BTreeMap<String, String> = serde_json::from_slice(raw)
            .map_err(|e| RfsimDecodeError::Payload(e.to_string()))?;

        // An absent marker means a legacy v0 peer; only a marker we cannot
        // understand is a hard failure.
        if let Some(version) = bag.get("version") {
            match version.parse::<u32>() {
                Ok(v) if v == SUPPORTED_VERSION => {}
                _ => {
                    return Err(RfsimDecodeError::IncompatibleVersion {
                        got: version.clone(),
                        supported: SUPPORTED_VERSION,
                    })
                }
            }
        }

        let address = bag
            .get("rfsim_address")
            .ok_or(RfsimDecodeError::Incomplete {
                field: "rfsim_address",
            })?
            .parse::<IpAddr>()
            .map_err(|e| RfsimDecodeError::Malformed {
                field: "rfsim_address",
                reason: e.to_string(),
            })?;

        let sst = bag
            .get("sst")
            .ok_or(RfsimDecodeError::Incomplete { field: "sst" })?
            .parse::<u8>()
            .map_err(|_| RfsimDecodeError::Malformed {
                field: "sst",
                reason: "not an integer within [0, 255]".into(),
            })?;

        let sd_raw = bag.get("sd").ok_or(RfsimDecodeError::Incomplete { field: "sd" })?;
        let sd = SliceDiff::parse(sd_raw).ok_or_else(|| RfsimDecodeError::Malformed {
            field: "sd",
            reason: "not a decimal or 0x-prefixed hex value within [0, 0xFFFFFF]".into(),
        })?;

        let port = match bag.get("rfsim_port") {
            None => DEFAULT_RFSIM_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|_| RfsimDecodeError::Malformed {
                field: "rfsim_port",
                reason: "not a port number".into(),
            })?,
        };

        Ok(RfsimData {
            version: SUPPORTED_VERSION,
            address,
            port,
            sst,
            sd,
        })
    }

    /// Encodes local RF-simulation parameters into the databag wire form.
    ///
    /// Every value is serialized as a string and `sd` in canonical form, so
    /// `decode(encode(x)) == x` for any valid `x`.
    pub fn encode(data: &RfsimData) -> Bytes {
        let mut bag = BTreeMap::new();
        bag.insert("version", data.version.to_string());
        bag.insert("rfsim_address", data.address.to_string());
        bag.insert("rfsim_port", data.port.to_string());
        bag.insert("sst", data.sst.to_string());
        bag.insert("sd", data.sd.canonical());
        let payload = serde_json::to_vec(&bag).expect("string map serializes");
        Bytes::from(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn databag(entries: &[(&str, &str)]) -> Bytes {
        let bag: BTreeMap<&str, &str> = entries.iter().copied().collect();
        Bytes::from(serde_json::to_vec(&bag).unwrap())
    }

    #[test]
    fn decimal_and_hex_sd_decode_to_the_same_canonical_value() {
        let from_decimal = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("sst", "1"),
            ("sd", "1056816"),
        ]))
        .unwrap();
        let from_hex = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("sst", "1"),
            ("sd", "0x102030"),
        ]))
        .unwrap();

        assert_eq!(from_decimal, from_hex);
        assert_eq!(from_decimal.sd.canonical(), "0x102030");
    }

    #[test]
    fn zero_valued_slice_identifiers_are_valid_data() {
        let data = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("sst", "0"),
            ("sd", "0"),
        ]))
        .unwrap();

        assert_eq!(data.sst, 0);
        assert_eq!(data.sd.canonical(), "0x000000");
    }

    #[test]
    fn missing_address_is_incomplete() {
        let err = RfsimCodec::decode(&databag(&[("sst", "1"), ("sd", "0x102030")])).unwrap_err();
        assert_eq!(
            err,
            RfsimDecodeError::Incomplete {
                field: "rfsim_address"
            }
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn missing_slice_identifiers_are_incomplete() {
        let err = RfsimCodec::decode(&databag(&[("rfsim_address", "10.0.0.5"), ("sd", "1")]))
            .unwrap_err();
        assert_eq!(err, RfsimDecodeError::Incomplete { field: "sst" });

        let err = RfsimCodec::decode(&databag(&[("rfsim_address", "10.0.0.5"), ("sst", "1")]))
            .unwrap_err();
        assert_eq!(err, RfsimDecodeError::Incomplete { field: "sd" });
    }

    #[test]
    fn unrecognized_version_marker_is_incompatible() {
        let err = RfsimCodec::decode(&databag(&[
            ("version", "1"),
            ("rfsim_address", "10.0.0.5"),
            ("sst", "1"),
            ("sd", "0x102030"),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            RfsimDecodeError::IncompatibleVersion {
                got: "1".into(),
                supported: SUPPORTED_VERSION,
            }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn absent_version_marker_is_accepted_as_legacy() {
        let data = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("sst", "1"),
            ("sd", "0x102030"),
        ]))
        .unwrap();
        assert_eq!(data.version, SUPPORTED_VERSION);
    }

    #[test]
    fn port_defaults_when_absent() {
        let data = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("sst", "1"),
            ("sd", "0x102030"),
        ]))
        .unwrap();
        assert_eq!(data.port, DEFAULT_RFSIM_PORT);

        let data = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("rfsim_port", "4044"),
            ("sst", "1"),
            ("sd", "0x102030"),
        ]))
        .unwrap();
        assert_eq!(data.port, 4044);
    }

    #[test]
    fn malformed_fields_are_reported_with_the_field_name() {
        let err = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "not-an-ip"),
            ("sst", "1"),
            ("sd", "0x102030"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            RfsimDecodeError::Malformed {
                field: "rfsim_address",
                ..
            }
        ));

        let err = RfsimCodec::decode(&databag(&[
            ("rfsim_address", "10.0.0.5"),
            ("sst", "300"),
            ("sd", "0x102030"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            RfsimDecodeError::Malformed { field: "sst", .. }
        ));
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let err = RfsimCodec::decode(&Bytes::from_static(b"rfsim_address=10.0.0.5")).unwrap_err();
        assert!(matches!(err, RfsimDecodeError::Payload(_)));
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let data = RfsimData {
            version: SUPPORTED_VERSION,
            address: "10.0.0.5".parse().unwrap(),
            port: 4043,
            sst: 1,
            sd: SliceDiff::new(0x102030).unwrap(),
        };
        let decoded = RfsimCodec::decode(&RfsimCodec::encode(&data)).unwrap();
        assert_eq!(decoded, data);
    }
}
