pub mod account;
pub mod catalog;
pub mod checkout;
pub mod token;
