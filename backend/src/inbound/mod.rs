//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the admin live board's WebSocket sits
//! alongside it in [`ws`].

pub mod http;
pub mod ws;
