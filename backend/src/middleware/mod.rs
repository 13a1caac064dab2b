//! Actix middleware shared by every inbound route.

pub mod trace;

pub use trace::{Trace, TraceId};
