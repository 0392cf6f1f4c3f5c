//! Backend access: transport, envelope parsing.

pub mod envelope;
pub mod gateway;
#[cfg(test)]
pub(crate) mod stub;

pub use gateway::{ApiRequest, HttpGateway, Transport, Verb};
