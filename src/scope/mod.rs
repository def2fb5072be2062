//! Scopes - member lists, lookup tables, and name lookup
//!
//! Namespaces, records, and specializations own a [`Scope`]. The corpus
//! registers every child with its parent's scope at freeze time; lookup then
//! walks those tables outward through the parent tree.

pub mod lookup;
pub mod members;

pub use lookup::NameLookup;
pub use members::Scope;
