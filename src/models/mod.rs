//! Request and response models for the laundry backend.

pub mod customer;
pub mod order;
pub mod service;

pub use customer::{Customer, CustomerProfile, LoginDetails, LoginRequest};
pub use order::{OrderAddress, OrderRecord, OrderRequest, OrderUpdateRequest};
pub use service::ServiceRecord;
