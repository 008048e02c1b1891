//! # ufilter-test
//!
//! Testing utilities for ufilter-rs: a [`RequestFactory`] for building
//! requests without a server, and fixture models to filter.

pub mod fixtures;
pub mod request_factory;

pub use request_factory::RequestFactory;
