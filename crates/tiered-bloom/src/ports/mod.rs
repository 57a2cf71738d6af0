//! Ports Layer
//!
//! Driving ports: the traits callers program against when they do not care
//! which filter variant sits behind them.

pub mod inbound;

pub use inbound::{MembershipFilter, RemovableMembership};
