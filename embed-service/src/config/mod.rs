pub mod cohere_config;
pub mod embed_options;
