// External API clients

pub mod pi42;

pub use pi42::{Pi42Client, Pi42Error};
