//! The core module defines the business logic of lockbox.
//! It provides the traits and models upstream adapters need to implement.

pub mod auth;
pub mod checkout;
pub mod model;
pub mod repo;
pub mod service;
