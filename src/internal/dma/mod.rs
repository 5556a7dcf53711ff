//! Descriptor-ring DMA implementation.
//!
//! The ownership handoff between CPU and DMA engine happens entirely
//! through the descriptor status words; see [`descriptor`] for the
//! volatile access rules, [`ring`] for cursor management and [`engine`]
//! for the RX/TX algorithms.

pub(crate) mod descriptor;
pub(crate) mod engine;
pub(crate) mod ring;

pub(crate) use engine::{DmaEngine, RxOutcome};
