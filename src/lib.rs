//! Terrasim - procedural heightfield engine
//!
//! Generates terrain heights from layered noise, edits them in place with
//! falloff brushes, and maps screen-space cursors to points on the surface.

pub mod core;
pub mod math;
pub mod terrain;
