#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

//! # LLM
//!
//! Provider abstraction for chat-completion models.
//!
//! This crate provides:
//! - The [`AIProvider`] trait that every model backend implements
//! - Message and option types shared by all providers
//! - An OpenAI chat-completions implementation
//!
//! Callers treat the model as an unstructured text peer: a provider returns
//! whatever text the model produced and leaves interpretation to the caller.

pub mod error;
pub mod openai;
pub mod provider;

pub use error::{LlmError, LlmResult};
pub use openai::OpenAIProvider;
pub use provider::{AIMessage, AIProvider, AIResponse, AIRole, GenerateOptions, TokenUsage};
