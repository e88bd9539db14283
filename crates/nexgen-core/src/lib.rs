//! Core library for the NexGen agency dashboard.
//!
//! Everything the web dashboard and CLI share lives here: the domain model,
//! the pricing calculator, the lenient row normalizer that absorbs the
//! backend's inconsistent column naming, the hosted-backend storage client,
//! and the generative-text client behind the briefing/chat features.

pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod normalize;
pub mod pricing;
pub mod session;
pub mod stats;
pub mod storage;

pub use error::{NexgenError, Result};
