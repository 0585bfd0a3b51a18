//! Dream Anthropic - hosted text generation for the Dream Planner
//!
//! Implements [`dream_core::TextGenerator`] over the Anthropic Messages API:
//! - `x-api-key` / `anthropic-version` authentication
//! - Per-request timeout from [`dream_core::GenerationConfig`]
//! - Non-success statuses, timeouts and empty content mapped to
//!   [`dream_core::GenerationError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dream_anthropic::AnthropicGenerator;
//! use dream_core::{DreamPlanner, PlannerConfig};
//!
//! let config = PlannerConfig::from_file("dream.toml")?;
//! let generator = AnthropicGenerator::from_env(config.generation.clone())?;
//! let planner = DreamPlanner::new(config, generator);
//! ```

#![warn(unreachable_pub)]

pub mod client;

pub use client::{AnthropicGenerator, ANTHROPIC_VERSION, API_KEY_ENV};
