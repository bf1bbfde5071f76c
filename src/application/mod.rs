//! Application layer orchestrating the payment authorization workflow.
//!
//! This module wires the payment transition table, rehydrates machines from
//! stored payments and exposes `PaymentService` as the entry point for
//! creating, pre-authorizing and authorizing payments.

pub mod builder;
pub mod interceptor;
pub mod service;
pub mod workflow;
