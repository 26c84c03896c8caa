//! Inbound adapters translating external requests into domain port calls.
//!
//! Only HTTP is provided; handlers live under [`http`].

pub mod http;
