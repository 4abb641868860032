//! Payment code facade: payload text, symbol and SVG in one call.
//!
//! Generation is an explicit request/response step taken when the customer
//! confirms checkout. [`PaymentCodeGenerator`] holds the merchant identity;
//! [`checkout`] serves the JSON boundary used by storefront front ends.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::amount::Amount;
use crate::config::{CodeOptions, MerchantConfig};
use crate::error::Result;
use crate::payload::{build_payload_with, PaymentRequest};
use crate::qr::{encode_symbol_with, Symbol};
use crate::render::render_svg;

/// A generated payment code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentCode {
    /// Payload text for "copy and paste" payment.
    pub text: String,
    /// Symbol encoding `text`.
    pub symbol: Symbol,
    /// `symbol` rendered as SVG.
    pub svg_markup: String,
}

/// Build the payload for `request`, encode it and render it.
#[instrument(skip_all, fields(reference = %request.reference_id, amount = %request.amount))]
pub fn build_payment_code(request: &PaymentRequest, options: &CodeOptions) -> Result<PaymentCode> {
    options.validate()?;
    let payload = build_payload_with(request, options.text_policy)?;
    let symbol = encode_symbol_with(payload.as_str(), &options.symbol)?;
    let svg_markup = render_svg(&symbol, options.render.pixel_size, options.render.margin_modules);
    info!(
        len = payload.as_str().len(),
        crc = payload.checksum(),
        version = symbol.version(),
        level = %symbol.ec_level(),
        "generated payment code"
    );
    Ok(PaymentCode {
        text: payload.into_string(),
        symbol,
        svg_markup,
    })
}

/// Generator bound to one merchant.
#[derive(Clone, Debug)]
pub struct PaymentCodeGenerator {
    merchant: MerchantConfig,
    options: CodeOptions,
}

impl PaymentCodeGenerator {
    /// Validate `merchant` and `options` up front.
    pub fn new(merchant: MerchantConfig, options: CodeOptions) -> Result<Self> {
        merchant.validate()?;
        options.validate()?;
        Ok(Self { merchant, options })
    }

    /// Merchant identity.
    pub fn merchant(&self) -> &MerchantConfig {
        &self.merchant
    }

    /// Generator options.
    pub fn options(&self) -> &CodeOptions {
        &self.options
    }

    /// Payment code for `amount` tagged with `reference_id`.
    pub fn generate(&self, amount: Amount, reference_id: &str) -> Result<PaymentCode> {
        let request = PaymentRequest::for_merchant(&self.merchant, amount, reference_id);
        build_payment_code(&request, &self.options)
    }
}

/// Checkout request as sent by a storefront.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payee_key: String,
    pub amount: f64,
    pub payee_name: String,
    pub payee_city: String,
    #[serde(default)]
    pub reference_id: String,
}

/// Checkout response: the copyable text and the SVG to display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub text: String,
    pub svg_markup: String,
}

impl From<PaymentCode> for CheckoutResponse {
    fn from(code: PaymentCode) -> Self {
        Self {
            text: code.text,
            svg_markup: code.svg_markup,
        }
    }
}

/// Serve one checkout request. Amounts are rounded to the nearest cent;
/// zero, negative or non-finite amounts fail before any payload is built.
pub fn checkout(request: &CheckoutRequest, options: &CodeOptions) -> Result<CheckoutResponse> {
    let amount = Amount::from_f64(request.amount)?;
    let request = PaymentRequest::new(
        request.payee_key.as_str(),
        amount,
        request.payee_name.as_str(),
        request.payee_city.as_str(),
        request.reference_id.as_str(),
    );
    build_payment_code(&request, options).map(CheckoutResponse::from)
}
