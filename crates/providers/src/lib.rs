//! LLM provider implementations for Anvil.
//!
//! The agent loop depends only on [`anvil_core::Provider`]; this crate
//! supplies the concrete OpenAI-compatible client and the factory the
//! task tool uses to build per-subagent providers.

pub mod factory;
pub mod openai_compat;

pub use factory::OpenAiCompatFactory;
pub use openai_compat::OpenAiCompatProvider;
