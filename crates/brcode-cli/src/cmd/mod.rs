pub mod checkout;
pub mod generate;
pub mod inspect;
