//! Cohere embedding client with env-driven config, unified errors, and a
//! library-scoped tracing layer.
//!
//! ```no_run
//! use embed_service::{CohereConfig, CohereService, InputType};
//!
//! # async fn run() -> Result<(), embed_service::EmbedError> {
//! let svc = CohereService::new(CohereConfig::from_env()?)?;
//! let vectors = svc
//!     .embed(&["Ferris is a crab".to_string()], InputType::SearchDocument)
//!     .await?;
//! assert_eq!(vectors.len(), 1);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::cohere_config::CohereConfig;
pub use config::embed_options::{InputType, Truncate};
pub use error_handler::{ConfigError, EmbedError, ProviderError, ProviderErrorKind};
pub use services::cohere_service::CohereService;
