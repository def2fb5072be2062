//! # Symcorpus - Symbol Corpus for documentation generators
//!
//! Consolidates partial declaration fragments, gathered while scanning a
//! multi-file program, into one consistent and queryable symbol corpus.
//!
//! Symcorpus provides:
//! - Stable, content-derived identifiers for every declared entity
//! - A closed entity model with one payload per declaration kind
//! - An order-independent merge of repeated sightings of the same entity
//! - Concurrent ingestion into a sharded store, frozen into an immutable corpus
//! - Scope lookup tables, overload grouping, and inheritance-aware interfaces

pub mod symbol_id;
pub mod symbol;
pub mod merge;
pub mod scope;
pub mod overloads;
pub mod interface;
pub mod corpus;
pub mod ingest;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use symbol_id::SymbolId;
pub use symbol::{Access, ExtractionMode, Symbol, SymbolKind};
pub use corpus::{Corpus, CorpusBuilder};
pub use interface::{Interface, InterfaceOptions, Tranche};
pub use overloads::OverloadSet;

/// Result type alias for corpus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for corpus operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid symbol id: {0}")]
    InvalidSymbolId(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(SymbolId),

    #[error("Name not found: {0}")]
    NameNotFound(String),

    #[error("Symbol {id} is a {found}, expected a {expected}")]
    KindMismatch {
        id: SymbolId,
        expected: SymbolKind,
        found: SymbolKind,
    },

    #[error("Symbol {id} names parent {parent}, which is not in the corpus")]
    MissingParent { id: SymbolId, parent: SymbolId },

    #[error("Symbol {id} cannot be a member of {parent}, a {kind}")]
    InvalidParent {
        id: SymbolId,
        parent: SymbolId,
        kind: SymbolKind,
    },

    #[error("Parent chain of {0} loops back on itself")]
    ParentCycle(SymbolId),

    #[error("Enum {owner} lists {constant}, which is not one of its constants")]
    InvalidEnumConstant { owner: SymbolId, constant: SymbolId },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by fragments that contradict each other or the
    /// corpus structure, as opposed to unreadable or malformed input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Error::InvalidSymbolId(_)
                | Error::KindMismatch { .. }
                | Error::MissingParent { .. }
                | Error::InvalidParent { .. }
                | Error::ParentCycle(_)
                | Error::InvalidEnumConstant { .. }
        )
    }
}
