//! Shared UI primitives.
//!
//! This module hosts the segmented selector widget and its declarative
//! configuration loader. Pointer plumbing lives in `systems::interaction`;
//! timed visual transitions in `systems::motion` and `systems::colors`.
pub mod config;
pub mod segmented;
