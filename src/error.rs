//! Top-level error type for the fallible edges of the crate
//!
//! Layout computation itself cannot fail; only loading inputs can.

use thiserror::Error;

use crate::asset::AssetInputError;
use crate::knowledge::KnowledgeBaseError;

/// Errors that can occur before a layout is computed
#[derive(Debug, Error)]
pub enum Error {
    /// The asset list could not be read or parsed
    #[error("asset input: {0}")]
    Assets(#[from] AssetInputError),

    /// A knowledge base file could not be loaded or failed validation
    #[error("knowledge base: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),
}
