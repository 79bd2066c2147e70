//! Hermes-facing side of the skill: wire decoding, routing, and the
//! line-oriented driver loop.

pub mod reactor;
pub mod wire;
