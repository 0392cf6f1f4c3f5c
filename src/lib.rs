//! Laundry Chat: a conversational front-end for the laundry-service backend.

pub mod api;
pub mod channels;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
