//! Route handlers.

pub mod issues;
pub mod webhook;
