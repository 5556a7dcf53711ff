//! Network stack integrations.
//!
//! The original drivers sat directly under a uIP TCP/IP stack; the Rust
//! analog is [`smoltcp`]. Only the Ethernet-framed codec families
//! participate — SpaceWire is not an Ethernet medium.

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod smoltcp;
