//! BR Code (Pix) payment-code generation.
//!
//! This crate turns a checkout amount and a merchant identity into the
//! standard "copy and paste" payment text and a scannable QR code symbol
//! encoding that same text.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`tlv`] | Tag-length-value field encoding and walking |
//! | [`crc`] | CRC-16/CCITT-FALSE checksum |
//! | [`payload`] | Payload assembly, decoding and checksum verification |
//! | [`qr`] | QR symbol encoder (versions 1-40, levels L/M/Q/H) |
//! | [`render`] | SVG and terminal rendering |
//! | [`code`] | One-call facade and the checkout JSON boundary |
//!
//! # Example
//!
//! ```rust
//! use brcode_core::{build_payment_code, Amount, CodeOptions, PaymentRequest};
//!
//! let request = PaymentRequest::new(
//!     "+5511999999999",
//!     Amount::from_cents(1000).unwrap(),
//!     "Test Store",
//!     "Sao Paulo",
//!     "TXN1",
//! );
//! let code = build_payment_code(&request, &CodeOptions::default()).unwrap();
//! assert!(code.text.starts_with("000201"));
//! assert!(code.text.contains("540510.00"));
//! assert!(code.svg_markup.starts_with("<svg"));
//! ```

pub mod amount;
pub mod code;
pub mod config;
pub mod crc;
pub mod error;
pub mod payload;
pub mod qr;
pub mod render;
pub mod text;
pub mod tlv;

pub use amount::Amount;
pub use code::{
    build_payment_code, checkout, CheckoutRequest, CheckoutResponse, PaymentCode,
    PaymentCodeGenerator,
};
pub use config::{CodeOptions, GeneratorConfig, MerchantConfig, RenderOptions, SymbolOptions};
pub use crc::compute_checksum;
pub use error::{BrCodeError, Result};
pub use payload::{
    build_payload, build_payload_with, decode_payload, verify_checksum, DecodedPayload, Payload,
    PaymentRequest,
};
pub use qr::{encode_symbol, encode_symbol_with, EcLevel, Symbol};
pub use render::{render_ascii, render_svg};
pub use text::TextPolicy;
pub use tlv::encode_field;
