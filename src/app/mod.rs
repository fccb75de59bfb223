//! Application layer: ports, events, and the drive service.

pub mod events;
pub mod ports;
pub mod service;
