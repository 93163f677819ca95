//! # stagecrew core
//!
//! Domain types, traits, and error definitions shared by every stagecrew crate.
//! Nothing here talks to the network or the filesystem.
//!
//! The text-generation capability the agents depend on is the [`Provider`]
//! trait. Concrete backends live in `stagecrew-providers`; tests substitute
//! scripted implementations.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;

pub use error::ProviderError;
pub use event::{EventBus, PipelineEvent};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
