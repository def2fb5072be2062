//! Concurrent corpus construction
//!
//! Workers share one `CorpusBuilder` by reference and call
//! [`CorpusBuilder::insert`] for every fragment they produce. Entries are
//! sharded by id, so fragments of different entities merge in parallel and
//! fragments of the same entity are serialized on their shard.
//!
//! [`CorpusBuilder::build`] runs once every writer is done. It checks the
//! parent tree and registers each child with its parent's scope in an order
//! derived only from the entities themselves.

use super::Corpus;
use crate::merge::merge;
use crate::symbol::{Payload, Symbol, SymbolKind};
use crate::symbol_id::SymbolId;
use crate::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashSet};

/// Thread-safe insert-or-merge store for fragments
#[derive(Debug)]
pub struct CorpusBuilder {
    symbols: DashMap<SymbolId, Symbol>,
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusBuilder {
    /// Create a builder holding only the global namespace
    pub fn new() -> Self {
        let symbols = DashMap::new();
        symbols.insert(SymbolId::GLOBAL, Symbol::global_namespace());
        Self { symbols }
    }

    /// Insert a fragment, merging it into the entity it describes if that
    /// entity has been seen before
    pub fn insert(&self, fragment: Symbol) -> Result<()> {
        if !fragment.id.is_valid() {
            return Err(Error::InvalidSymbolId(format!(
                "{} fragment {:?} has no id",
                fragment.kind(),
                fragment.name
            )));
        }

        match self.symbols.entry(fragment.id) {
            Entry::Vacant(slot) => {
                slot.insert(fragment);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if existing.kind() != fragment.kind() {
                    return Err(Error::KindMismatch {
                        id: fragment.id,
                        expected: existing.kind(),
                        found: fragment.kind(),
                    });
                }
                merge(existing, fragment);
            }
        }
        Ok(())
    }

    /// Insert every fragment, stopping at the first failure
    pub fn insert_all(&self, fragments: impl IntoIterator<Item = Symbol>) -> Result<usize> {
        let mut count = 0;
        for fragment in fragments {
            self.insert(fragment)?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of distinct entities seen so far
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Freeze into an immutable corpus
    pub fn build(self) -> Result<Corpus> {
        let mut symbols: BTreeMap<SymbolId, Symbol> = self.symbols.into_iter().collect();

        check_parents(&symbols)?;
        check_acyclic(&symbols)?;
        check_enum_constants(&symbols)?;
        let registered = link_children(&mut symbols);

        tracing::info!(
            "Corpus frozen: {} symbols, {} registered with their scopes",
            symbols.len(),
            registered
        );

        let corpus = Corpus::from_symbols(symbols);
        debug_assert!(corpus.scopes_consistent(), "scope lookup tables out of sync");
        Ok(corpus)
    }
}

fn check_parents(symbols: &BTreeMap<SymbolId, Symbol>) -> Result<()> {
    for symbol in symbols.values() {
        if symbol.id == SymbolId::GLOBAL {
            if symbol.parent.is_valid() {
                return Err(Error::InvalidParent {
                    id: symbol.id,
                    parent: symbol.parent,
                    kind: symbol.kind(),
                });
            }
            continue;
        }

        let Some(parent) = symbols.get(&symbol.parent) else {
            return Err(Error::MissingParent {
                id: symbol.id,
                parent: symbol.parent,
            });
        };

        let accepts = parent.is_scope()
            || (parent.kind() == SymbolKind::Enum && symbol.kind() == SymbolKind::EnumConstant);
        if !accepts {
            return Err(Error::InvalidParent {
                id: symbol.id,
                parent: parent.id,
                kind: parent.kind(),
            });
        }
    }
    Ok(())
}

/// Every parent chain must reach the global namespace
fn check_acyclic(symbols: &BTreeMap<SymbolId, Symbol>) -> Result<()> {
    let mut rooted: HashSet<SymbolId> = HashSet::from([SymbolId::GLOBAL]);

    for id in symbols.keys() {
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let mut current = *id;

        while !rooted.contains(&current) {
            if !on_path.insert(current) {
                return Err(Error::ParentCycle(current));
            }
            path.push(current);
            current = match symbols.get(&current) {
                Some(symbol) => symbol.parent,
                None => {
                    return Err(Error::MissingParent {
                        id: *path.last().unwrap_or(id),
                        parent: current,
                    });
                }
            };
        }
        rooted.extend(path);
    }
    Ok(())
}

/// Constants an enum fragment lists itself must be constants of that enum
fn check_enum_constants(symbols: &BTreeMap<SymbolId, Symbol>) -> Result<()> {
    for symbol in symbols.values() {
        let Payload::Enum(info) = &symbol.payload else {
            continue;
        };
        for constant in &info.constants {
            let belongs = symbols
                .get(constant)
                .is_some_and(|c| c.kind() == SymbolKind::EnumConstant && c.parent == symbol.id);
            if !belongs {
                return Err(Error::InvalidEnumConstant {
                    owner: symbol.id,
                    constant: *constant,
                });
            }
        }
    }
    Ok(())
}

/// Register each entity with its parent, sorted by parent, then source
/// position, then name, then id. Returns the number of new registrations.
fn link_children(symbols: &mut BTreeMap<SymbolId, Symbol>) -> usize {
    let mut children: Vec<(SymbolId, Option<(String, u32)>, String, SymbolId)> = symbols
        .values()
        .filter(|s| s.id != SymbolId::GLOBAL)
        .map(|s| {
            let position = s.source.primary().map(|loc| (loc.path.clone(), loc.line));
            (s.parent, position, s.name.clone(), s.id)
        })
        .collect();
    children.sort();

    let mut registered = 0;
    for (parent_id, _, name, id) in children {
        let Some(parent) = symbols.get_mut(&parent_id) else {
            continue;
        };

        let added = if let Some(scope) = parent.scope_mut() {
            scope.add_member(id, &name)
        } else if let Payload::Enum(info) = &mut parent.payload {
            if info.constants.contains(&id) {
                false
            } else {
                info.constants.push(id);
                true
            }
        } else {
            false
        };

        if added {
            registered += 1;
        }
    }

    tracing::debug!("Linked {} children", registered);
    registered
}
