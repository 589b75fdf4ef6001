//! Tagrank Core Library
//!
//! Domain logic for ranking files in a Hydrus media library by per-tag
//! preference weights: the tag-weight store, the ranking engine, and the
//! client API adapter it drives.

pub mod config;
pub mod error;
pub mod hydrus;
pub mod logging;
pub mod provider;
pub mod ranking;
pub mod store;
