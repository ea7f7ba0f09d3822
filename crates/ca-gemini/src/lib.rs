//! Gemini integration for the compliance agent
//!
//! This crate provides the Gemini implementation of the LlmProvider trait.

mod client;
mod config;


pub use client::GeminiClient;
pub use config::GeminiConfig;

// Re-export core types for convenience
pub use ca_core::{
    Error, GenerationConfig, GenerationResult, LlmProvider, Message, Result, Role,
};
