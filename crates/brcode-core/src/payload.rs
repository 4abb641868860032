//! BR Code payload assembly and decoding.
//!
//! A payload is a fixed sequence of TLV fields closed by the checksum field
//! `63`, whose value is the CRC over every preceding byte including the
//! literal `6304`:
//!
//! ```text
//! 000201 010212 26..(0014BR.GOV.BCB.PIX 01..<key>) 52040000 5303986
//! 54..<amount> 5802BR 59..<name> 60..<city> 62..(05..<ref>) 6304<crc>
//! ```

use std::fmt;

use tracing::debug;

use crate::amount::Amount;
use crate::config::{validate_payee_key, MerchantConfig, COUNTRY_BR, CURRENCY_BRL, PIX_GUI};
use crate::crc::{compute_checksum, format_checksum, crc16_ccitt_false};
use crate::error::{BrCodeError, Result};
use crate::text::{prepare_text, sanitize_reference, TextPolicy};
use crate::tlv::{self, write_field, Field};

/// Payload format indicator (field `00`).
pub const FORMAT_INDICATOR: &str = "01";

/// Point of initiation for a static, reusable code (field `01`).
pub const STATIC_INITIATION: &str = "12";

/// Merchant category code when none applies (field `52`).
pub const NO_CATEGORY: &str = "0000";

/// Longest merchant name kept in field `59`.
pub const MAX_NAME_LEN: usize = 25;

/// Longest merchant city kept in field `60`.
pub const MAX_CITY_LEN: usize = 15;

/// Tag and length of the checksum field, covered by the CRC.
pub const CRC_FIELD_PREFIX: &str = "6304";

/// Top-level tags, in emission order.
pub mod tags {
    pub const FORMAT: &str = "00";
    pub const INITIATION: &str = "01";
    pub const MERCHANT_ACCOUNT: &str = "26";
    pub const CATEGORY: &str = "52";
    pub const CURRENCY: &str = "53";
    pub const AMOUNT: &str = "54";
    pub const COUNTRY: &str = "58";
    pub const NAME: &str = "59";
    pub const CITY: &str = "60";
    pub const ADDITIONAL_DATA: &str = "62";
    pub const CRC: &str = "63";

    /// Sub-tags of field `26`.
    pub const ACCOUNT_GUI: &str = "00";
    pub const ACCOUNT_KEY: &str = "01";

    /// Sub-tag of field `62`.
    pub const REFERENCE: &str = "05";
}

/// Inputs of one payment code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Routing key of the payee.
    pub payee_key: String,
    /// Amount due.
    pub amount: Amount,
    /// Merchant name; folded and truncated to 25 characters.
    pub payee_name: String,
    /// Merchant city; folded and truncated to 15 characters.
    pub payee_city: String,
    /// Transaction tag; sanitized to at most 25 alphanumerics.
    pub reference_id: String,
    /// Two-letter country code.
    pub country_code: String,
    /// ISO 4217 numeric currency code.
    pub currency: String,
}

impl PaymentRequest {
    /// Request in BRL for a Brazilian merchant.
    pub fn new(
        payee_key: impl Into<String>,
        amount: Amount,
        payee_name: impl Into<String>,
        payee_city: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        Self {
            payee_key: payee_key.into(),
            amount,
            payee_name: payee_name.into(),
            payee_city: payee_city.into(),
            reference_id: reference_id.into(),
            country_code: COUNTRY_BR.to_string(),
            currency: CURRENCY_BRL.to_string(),
        }
    }

    /// Request for `merchant`, carrying its country and currency.
    pub fn for_merchant(merchant: &MerchantConfig, amount: Amount, reference_id: impl Into<String>) -> Self {
        Self {
            payee_key: merchant.payee_key.clone(),
            amount,
            payee_name: merchant.name.clone(),
            payee_city: merchant.city.clone(),
            reference_id: reference_id.into(),
            country_code: merchant.country_code.clone(),
            currency: merchant.currency.clone(),
        }
    }
}

/// A complete payload, checksum included.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Payload {
    text: String,
}

impl Payload {
    /// Payload text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The four hex digits of field `63`.
    pub fn checksum(&self) -> &str {
        &self.text[self.text.len() - 4..]
    }

    /// Top-level fields, in order.
    pub fn fields(&self) -> Result<Vec<Field<'_>>> {
        tlv::parse_fields(&self.text)
    }

    /// Consume into the payload text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Assemble a payload, folding non-ASCII text.
pub fn build_payload(request: &PaymentRequest) -> Result<Payload> {
    build_payload_with(request, TextPolicy::Normalize)
}

/// Assemble a payload under an explicit [`TextPolicy`].
///
/// Fails before writing anything on an invalid key or an empty name or city;
/// a partial payload is never returned.
pub fn build_payload_with(request: &PaymentRequest, policy: TextPolicy) -> Result<Payload> {
    validate_payee_key(&request.payee_key)?;
    let name = prepare_text("payee_name", &request.payee_name, MAX_NAME_LEN, policy)?;
    let city = prepare_text("payee_city", &request.payee_city, MAX_CITY_LEN, policy)?;
    let reference = sanitize_reference(&request.reference_id);
    let amount = request.amount.to_string();

    let mut account = String::with_capacity(64);
    write_field(&mut account, tags::ACCOUNT_GUI, PIX_GUI)?;
    write_field(&mut account, tags::ACCOUNT_KEY, &request.payee_key)?;

    let mut additional = String::with_capacity(32);
    write_field(&mut additional, tags::REFERENCE, &reference)?;

    let mut text = String::with_capacity(160);
    write_field(&mut text, tags::FORMAT, FORMAT_INDICATOR)?;
    write_field(&mut text, tags::INITIATION, STATIC_INITIATION)?;
    write_field(&mut text, tags::MERCHANT_ACCOUNT, &account)?;
    write_field(&mut text, tags::CATEGORY, NO_CATEGORY)?;
    write_field(&mut text, tags::CURRENCY, &request.currency)?;
    write_field(&mut text, tags::AMOUNT, &amount)?;
    write_field(&mut text, tags::COUNTRY, &request.country_code)?;
    write_field(&mut text, tags::NAME, &name)?;
    write_field(&mut text, tags::CITY, &city)?;
    write_field(&mut text, tags::ADDITIONAL_DATA, &additional)?;
    text.push_str(CRC_FIELD_PREFIX);
    let crc = compute_checksum(&text);
    text.push_str(&crc);

    debug!(len = text.len(), crc = %crc, reference = %reference, "assembled payload");
    Ok(Payload { text })
}

/// Fields recovered from a payload.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DecodedPayload {
    /// Field `00`.
    pub format_indicator: String,
    /// Field `01`, when present.
    pub initiation: Option<String>,
    /// Field `26.00`.
    pub gui: String,
    /// Field `26.01`.
    pub payee_key: String,
    /// Field `52`.
    pub category: String,
    /// Field `53`.
    pub currency: String,
    /// Field `54`, when present.
    pub amount: Option<String>,
    /// Field `58`.
    pub country_code: String,
    /// Field `59`.
    pub payee_name: String,
    /// Field `60`.
    pub payee_city: String,
    /// Field `62.05`, when present.
    pub reference_id: Option<String>,
    /// Field `63`.
    pub checksum: String,
}

/// Check that the trailing four hex digits match the CRC of everything
/// before them.
pub fn verify_checksum(text: &str) -> Result<()> {
    let body_len = text.len().checked_sub(4).ok_or_else(|| BrCodeError::Malformed {
        offset: 0,
        reason: "payload is shorter than its checksum".into(),
    })?;
    let (body, found) = match (text.get(..body_len), text.get(body_len..)) {
        (Some(body), Some(found)) => (body, found),
        _ => {
            return Err(BrCodeError::Malformed {
                offset: body_len,
                reason: "checksum is not ASCII".into(),
            })
        }
    };
    if !body.ends_with(CRC_FIELD_PREFIX) {
        return Err(BrCodeError::Malformed {
            offset: body_len.saturating_sub(CRC_FIELD_PREFIX.len()),
            reason: format!("payload must end with {CRC_FIELD_PREFIX} and four hex digits"),
        });
    }
    let expected = format_checksum(crc16_ccitt_false(body.as_bytes()));
    if !found.eq_ignore_ascii_case(&expected) {
        return Err(BrCodeError::ChecksumMismatch {
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Verify the checksum and walk the payload back into its fields.
///
/// Field `00` must come first and `63` last. Unknown tags are skipped.
pub fn decode_payload(text: &str) -> Result<DecodedPayload> {
    verify_checksum(text)?;
    let fields = tlv::parse_fields(text)?;

    match fields.first() {
        Some(f) if f.tag == tags::FORMAT => {}
        _ => {
            return Err(BrCodeError::Malformed {
                offset: 0,
                reason: "payload must start with field 00".into(),
            })
        }
    }
    let crc_field = match fields.last() {
        Some(f) if f.tag == tags::CRC => *f,
        _ => {
            return Err(BrCodeError::Malformed {
                offset: text.len() - 4,
                reason: "payload must end with field 63".into(),
            })
        }
    };

    let find = |tag: &str| fields.iter().find(|f| f.tag == tag).copied();
    let require = |tag: &str| {
        find(tag).map(|f| f.value.to_string()).ok_or_else(|| BrCodeError::Malformed {
            offset: text.len(),
            reason: format!("missing field {tag}"),
        })
    };

    let account = find(tags::MERCHANT_ACCOUNT).ok_or_else(|| BrCodeError::Malformed {
        offset: text.len(),
        reason: format!("missing field {}", tags::MERCHANT_ACCOUNT),
    })?;
    let account_fields = account.nested()?;
    let sub = |fields: &[Field<'_>], tag: &str| {
        fields.iter().find(|f| f.tag == tag).map(|f| f.value.to_string())
    };
    let gui = sub(&account_fields, tags::ACCOUNT_GUI).ok_or_else(|| BrCodeError::Malformed {
        offset: account.offset,
        reason: "merchant account has no GUI".into(),
    })?;
    let payee_key = sub(&account_fields, tags::ACCOUNT_KEY).ok_or_else(|| BrCodeError::Malformed {
        offset: account.offset,
        reason: "merchant account has no key".into(),
    })?;

    let reference_id = match find(tags::ADDITIONAL_DATA) {
        Some(f) => sub(&f.nested()?, tags::REFERENCE),
        None => None,
    };

    Ok(DecodedPayload {
        format_indicator: require(tags::FORMAT)?,
        initiation: find(tags::INITIATION).map(|f| f.value.to_string()),
        gui,
        payee_key,
        category: require(tags::CATEGORY)?,
        currency: require(tags::CURRENCY)?,
        amount: find(tags::AMOUNT).map(|f| f.value.to_string()),
        country_code: require(tags::COUNTRY)?,
        payee_name: require(tags::NAME)?,
        payee_city: require(tags::CITY)?,
        reference_id,
        checksum: crc_field.value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_request() -> PaymentRequest {
        PaymentRequest::new(
            "+5511999999999",
            Amount::from_cents(1000).unwrap(),
            "Test Store",
            "Sao Paulo",
            "TXN1",
        )
    }

    #[test]
    fn builds_expected_field_sequence() {
        let payload = build_payload(&store_request()).unwrap();
        let body = "000201010212\
                    26360014BR.GOV.BCB.PIX0114+5511999999999\
                    52040000\
                    5303986\
                    540510.00\
                    5802BR\
                    5910Test Store\
                    6009Sao Paulo\
                    62080504TXN1\
                    6304";
        assert!(payload.as_str().starts_with(body));
        assert_eq!(payload.as_str().len(), body.len() + 4);
        assert_eq!(payload.checksum(), compute_checksum(body));
    }

    #[test]
    fn fields_walk_in_emission_order() {
        let payload = build_payload(&store_request()).unwrap();
        let fields = payload.fields().unwrap();
        let tags: Vec<&str> = fields.iter().map(|f| f.tag).collect();
        assert_eq!(
            tags,
            ["00", "01", "26", "52", "53", "54", "58", "59", "60", "62", "63"]
        );
        assert_eq!(fields.last().map(|f| f.value), Some(payload.checksum()));
    }

    #[test]
    fn checksum_recomputes() {
        let payload = build_payload(&store_request()).unwrap();
        let text = payload.as_str();
        let (body, crc) = text.split_at(text.len() - 4);
        assert_eq!(compute_checksum(body), crc);
        assert!(crc.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_lowercase()));
        assert!(verify_checksum(text).is_ok());
    }

    #[test]
    fn long_name_and_city_are_truncated() {
        let mut request = store_request();
        request.payee_name = "A Very Long Merchant Name That Exceeds".into();
        request.payee_city = "Sao Jose dos Campos do Norte".into();
        let decoded = decode_payload(build_payload(&request).unwrap().as_str()).unwrap();
        assert_eq!(decoded.payee_name, "A Very Long Merchant Name");
        assert_eq!(decoded.payee_name.len(), 25);
        assert_eq!(decoded.payee_city, "Sao Jose dos Ca");
    }

    #[test]
    fn accented_text_is_folded() {
        let mut request = store_request();
        request.payee_name = "Açaí do João".into();
        request.payee_city = "Uberlândia".into();
        let payload = build_payload(&request).unwrap();
        assert!(payload.as_str().is_ascii());
        assert!(payload.as_str().contains("5912Acai do Joao"));
        assert!(payload.as_str().contains("6010Uberlandia"));
    }

    #[test]
    fn reject_policy_refuses_accents() {
        let mut request = store_request();
        request.payee_city = "Uberlândia".into();
        let err = build_payload_with(&request, TextPolicy::Reject).unwrap_err();
        assert!(matches!(err, BrCodeError::InvalidText { field: "payee_city", .. }));
    }

    #[test]
    fn invalid_key_fails_before_assembly() {
        let mut request = store_request();
        request.payee_key = String::new();
        assert!(matches!(
            build_payload(&request),
            Err(BrCodeError::InvalidPayeeKey(_))
        ));
    }

    #[test]
    fn empty_reference_uses_placeholder() {
        let mut request = store_request();
        request.reference_id = "--".into();
        let payload = build_payload(&request).unwrap();
        assert!(payload.as_str().contains("62070503***6304"));
    }

    #[test]
    fn decode_round_trip() {
        let payload = build_payload(&store_request()).unwrap();
        let decoded = decode_payload(payload.as_str()).unwrap();
        assert_eq!(decoded.format_indicator, "01");
        assert_eq!(decoded.initiation.as_deref(), Some("12"));
        assert_eq!(decoded.gui, PIX_GUI);
        assert_eq!(decoded.payee_key, "+5511999999999");
        assert_eq!(decoded.category, "0000");
        assert_eq!(decoded.currency, "986");
        assert_eq!(decoded.amount.as_deref(), Some("10.00"));
        assert_eq!(decoded.country_code, "BR");
        assert_eq!(decoded.payee_name, "Test Store");
        assert_eq!(decoded.payee_city, "Sao Paulo");
        assert_eq!(decoded.reference_id.as_deref(), Some("TXN1"));
        assert_eq!(decoded.checksum, payload.checksum());
    }

    #[test]
    fn corrupted_payload_is_rejected() {
        let text = build_payload(&store_request()).unwrap().into_string();
        let tampered = text.replacen("10.00", "90.00", 1);
        assert!(matches!(
            decode_payload(&tampered),
            Err(BrCodeError::ChecksumMismatch { .. })
        ));
        assert!(matches!(
            verify_checksum("12"),
            Err(BrCodeError::Malformed { .. })
        ));
        assert!(matches!(
            verify_checksum("000201ABCD"),
            Err(BrCodeError::Malformed { .. })
        ));
    }

    #[test]
    fn decode_requires_format_field_first() {
        let mut body = String::new();
        write_field(&mut body, "01", "12").unwrap();
        write_field(&mut body, "00", "01").unwrap();
        body.push_str(CRC_FIELD_PREFIX);
        let text = format!("{body}{}", compute_checksum(&body));
        assert!(matches!(
            decode_payload(&text),
            Err(BrCodeError::Malformed { offset: 0, .. })
        ));
    }

    #[test]
    fn building_is_idempotent() {
        let a = build_payload(&store_request()).unwrap();
        let b = build_payload(&store_request()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn merchant_request_carries_country_and_currency() {
        let mut merchant = MerchantConfig::new("key@example.com", "Loja", "Lisboa");
        merchant.country_code = "PT".into();
        merchant.currency = "978".into();
        let request = PaymentRequest::for_merchant(&merchant, Amount::from_cents(250).unwrap(), "R1");
        let decoded = decode_payload(build_payload(&request).unwrap().as_str()).unwrap();
        assert_eq!(decoded.country_code, "PT");
        assert_eq!(decoded.currency, "978");
        assert_eq!(decoded.amount.as_deref(), Some("2.50"));
    }
}
