//! Configuration types for the payment-code generator.
//!
//! Merchant identity and encoder settings are plain structs passed into the
//! builders; nothing is read from global state. Every struct deserializes
//! from JSON with per-field defaults, so a merchant file only needs the
//! fields that differ.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BrCodeError, Result};
use crate::qr::{EcLevel, MAX_VERSION, MIN_VERSION};
use crate::text::TextPolicy;

/// Globally unique identifier of the Pix arrangement (field `26.00`).
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";

/// ISO 4217 numeric code of the Brazilian real.
pub const CURRENCY_BRL: &str = "986";

/// ISO 3166-1 alpha-2 code of Brazil.
pub const COUNTRY_BR: &str = "BR";

/// Longest payee key accepted in field `26.01`.
pub const MAX_PAYEE_KEY_LEN: usize = 77;

fn default_country() -> String {
    COUNTRY_BR.to_string()
}

fn default_currency() -> String {
    CURRENCY_BRL.to_string()
}

/// Identity of the receiving merchant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Pix key of the payee (phone, e-mail, tax id or random key).
    pub payee_key: String,
    /// Merchant name, truncated to 25 characters in the payload.
    pub name: String,
    /// Merchant city, truncated to 15 characters in the payload.
    pub city: String,
    /// Two-letter country code (field `58`).
    #[serde(default = "default_country")]
    pub country_code: String,
    /// Numeric currency code (field `53`).
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl MerchantConfig {
    /// Merchant in Brazil charging in BRL.
    pub fn new(payee_key: impl Into<String>, name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            payee_key: payee_key.into(),
            name: name.into(),
            city: city.into(),
            country_code: default_country(),
            currency: default_currency(),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Check the identity fields that do not depend on a request.
    pub fn validate(&self) -> Result<()> {
        validate_payee_key(&self.payee_key)?;
        if self.country_code.len() != 2 || !self.country_code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(BrCodeError::InvalidConfig(format!(
                "country_code {:?} must be two upper-case letters",
                self.country_code
            )));
        }
        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BrCodeError::InvalidConfig(format!(
                "currency {:?} must be a three-digit ISO 4217 code",
                self.currency
            )));
        }
        Ok(())
    }
}

/// Reject payee keys that are empty, longer than 77 characters or not ASCII.
pub fn validate_payee_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(BrCodeError::InvalidPayeeKey("key is empty".into()));
    }
    if !key.bytes().all(|b| (0x21..=0x7E).contains(&b)) {
        return Err(BrCodeError::InvalidPayeeKey(format!(
            "{key:?} contains whitespace or non-ASCII characters"
        )));
    }
    if key.len() > MAX_PAYEE_KEY_LEN {
        return Err(BrCodeError::InvalidPayeeKey(format!(
            "{} characters exceeds the maximum of {MAX_PAYEE_KEY_LEN}",
            key.len()
        )));
    }
    Ok(())
}

/// Symbol encoder settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolOptions {
    /// Weakest error-correction level the caller accepts. Default: M.
    pub min_ec_level: EcLevel,
    /// Raise the level while the chosen version still fits. Default: true.
    pub boost_ec: bool,
    /// Smallest version to consider. Default: 1.
    pub min_version: u8,
    /// Largest version to consider. Default: 40.
    pub max_version: u8,
    /// Force a mask pattern (0-7) instead of picking the best one.
    pub mask: Option<u8>,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            min_ec_level: EcLevel::M,
            boost_ec: true,
            min_version: MIN_VERSION,
            max_version: MAX_VERSION,
            mask: None,
        }
    }
}

impl SymbolOptions {
    /// Check version bounds and the forced mask.
    pub fn validate(&self) -> Result<()> {
        if self.min_version < MIN_VERSION
            || self.max_version > MAX_VERSION
            || self.min_version > self.max_version
        {
            return Err(BrCodeError::InvalidConfig(format!(
                "version range {}..={} must lie within {MIN_VERSION}..={MAX_VERSION}",
                self.min_version, self.max_version
            )));
        }
        if let Some(mask) = self.mask {
            if mask >= crate::qr::mask::MASK_COUNT {
                return Err(BrCodeError::InvalidConfig(format!(
                    "mask {mask} is out of range (0-7)"
                )));
            }
        }
        Ok(())
    }
}

/// SVG rendering settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Width of the symbol itself in pixels; the margin adds to it.
    pub pixel_size: f64,
    /// Light border around the symbol, in modules.
    pub margin_modules: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pixel_size: 300.0,
            margin_modules: 4,
        }
    }
}

impl RenderOptions {
    /// Reject non-positive or non-finite sizes.
    pub fn validate(&self) -> Result<()> {
        if !self.pixel_size.is_finite() || self.pixel_size <= 0.0 {
            return Err(BrCodeError::InvalidConfig(format!(
                "pixel_size {} must be a positive number",
                self.pixel_size
            )));
        }
        Ok(())
    }
}

/// Everything the facade needs besides the request itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeOptions {
    /// Handling of non-ASCII merchant text.
    pub text_policy: TextPolicy,
    /// Symbol encoder settings.
    pub symbol: SymbolOptions,
    /// SVG rendering settings.
    pub render: RenderOptions,
}

impl CodeOptions {
    /// Validate the nested option groups.
    pub fn validate(&self) -> Result<()> {
        self.symbol.validate()?;
        self.render.validate()
    }
}

/// A merchant file: identity plus optional generator options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Receiving merchant.
    pub merchant: MerchantConfig,
    /// Generator options.
    #[serde(default)]
    pub options: CodeOptions,
}

impl GeneratorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.merchant.validate()?;
        config.options.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}
