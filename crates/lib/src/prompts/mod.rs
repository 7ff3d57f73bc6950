//! # Prompt Templates
//!
//! Default prompts used by the ingestion pipeline. These are loaded as
//! configuration defaults and can be overridden by `config.yml`.

pub mod metadata;
