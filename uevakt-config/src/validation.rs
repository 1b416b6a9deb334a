//! Custom validation functions for the UE configuration.
//!
//! Shared between figment extraction and the per-cycle validation gate.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::SdValue;

/// Largest value the 24-bit Slice Differentiator can carry.
pub const SD_MAX: u32 = 0xFF_FFFF;

lazy_static! {
    static ref IMSI_RE: Regex = Regex::new(r"^\d{15}$").expect("static regex");
    static ref KEY_RE: Regex = Regex::new(r"^[0-9a-fA-F]{32}$").expect("static regex");
}

/// Validate that the IMSI is a 15-digit numeric string.
pub fn validate_imsi(imsi: &str) -> Result<(), ValidationError> {
    if IMSI_RE.is_match(imsi) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_imsi");
        err.message = Some("must be a 15-digit numeric string".into());
        Err(err)
    }
}

/// Validate a 128-bit USIM/operator secret key in hex form.
pub fn validate_secret_key(key: &str) -> Result<(), ValidationError> {
    if KEY_RE.is_match(key) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_secret_key");
        err.message = Some("must be 32 hexadecimal characters".into());
        Err(err)
    }
}

/// Validate the legacy Slice Differentiator option.
///
/// Accepted forms: a plain integer, a decimal string, or a `0x`-prefixed hex
/// string, all within `[0, 0xFFFFFF]`.
pub fn validate_sd(sd: &SdValue) -> Result<(), ValidationError> {
    match sd.as_u32() {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("invalid_sd");
            err.message =
                Some("must be a decimal or 0x-prefixed hex value within [0, 0xFFFFFF]".into());
            Err(err)
        }
    }
}

/// Parse a Slice Differentiator string, decimal or `0x`-prefixed hex.
pub fn parse_sd_text(text: &str) -> Option<u32> {
    let value = if let Some(hex_digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex_digits, 16).ok()?
    } else {
        text.parse::<u32>().ok()?
    };
    (value <= SD_MAX).then_some(value)
}
