//! Symbol Corpus - the frozen, queryable store of every entity
//!
//! A `Corpus` owns all entities in one id-keyed map. Parent, member, and
//! base relations are plain ids into that map. Once built it is never
//! mutated, so every query here is a pure read and the corpus can be shared
//! freely across threads.

pub mod builder;

pub use builder::CorpusBuilder;

use crate::interface::{self, Interface, InterfaceOptions, Tranche};
use crate::overloads::{group_scope, ScopeEntry};
use crate::scope::NameLookup;
use crate::symbol::{ExtractionMode, Payload, Symbol, SymbolKind};
use crate::symbol_id::SymbolId;
use crate::{Error, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Immutable, id-keyed store of merged entities.
#[derive(Debug, Default)]
pub struct Corpus {
    symbols: BTreeMap<SymbolId, Symbol>,
}

impl Corpus {
    pub(crate) fn from_symbols(symbols: BTreeMap<SymbolId, Symbol>) -> Self {
        Self { symbols }
    }

    /// Get an entity the caller knows exists.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the corpus.
    pub fn get(&self, id: SymbolId) -> &Symbol {
        match self.symbols.get(&id) {
            Some(symbol) => symbol,
            None => panic!("symbol {} is not in the corpus", id),
        }
    }

    /// Get an entity that may be absent; the invalid id is always absent
    pub fn find(&self, id: SymbolId) -> Option<&Symbol> {
        if !id.is_valid() {
            return None;
        }
        self.symbols.get(&id)
    }

    /// Get an entity, reporting absence as an error
    pub fn try_get(&self, id: SymbolId) -> Result<&Symbol> {
        self.find(id).ok_or(Error::SymbolNotFound(id))
    }

    /// Root of the parent tree
    pub fn global_namespace(&self) -> &Symbol {
        self.get(SymbolId::GLOBAL)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All entities, ordered by id
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Ids of every entity of `kind`
    pub fn ids_of_kind(&self, kind: SymbolKind) -> Vec<SymbolId> {
        self.symbols
            .values()
            .filter(|s| s.kind() == kind)
            .map(|s| s.id)
            .collect()
    }

    /// Direct children of a scope or enum, in registration order
    pub fn children(&self, id: SymbolId) -> &[SymbolId] {
        match self.find(id).map(|s| &s.payload) {
            Some(Payload::Enum(info)) => info.constants.as_slice(),
            Some(payload) => payload.scope().map(|s| s.members()).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Visit each direct child of `scope`
    pub fn traverse(&self, scope: SymbolId, mut visitor: impl FnMut(&Symbol)) {
        for id in self.children(scope) {
            visitor(self.get(*id));
        }
    }

    /// Visit `root` and everything below it, parents before children
    pub fn walk(&self, root: SymbolId, mut visitor: impl FnMut(&Symbol)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(symbol) = self.find(id) else {
                continue;
            };
            visitor(symbol);
            stack.extend(self.children(id).iter().rev());
        }
    }

    /// Visit each direct child of `scope`, with same-name callables folded
    /// into one synthetic overload group
    pub fn traverse_overloads(&self, scope: SymbolId, mut visitor: impl FnMut(&Symbol)) {
        for entry in group_scope(self, scope) {
            match entry {
                ScopeEntry::Single(id) => visitor(self.get(id)),
                ScopeEntry::Group(set) => {
                    let symbol = set.into_symbol();
                    visitor(&symbol);
                }
            }
        }
    }

    /// Ancestors of `id`, innermost first, ending with the global namespace
    pub fn parents(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut current = self.find(id).map(|s| s.parent);
        while let Some(parent) = current.filter(|p| p.is_valid()) {
            chain.push(parent);
            current = self.find(parent).map(|s| s.parent);
        }
        chain
    }

    /// `::`-joined names from the outermost named scope down to `id`
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let Some(symbol) = self.find(id) else {
            return String::new();
        };
        if id == SymbolId::GLOBAL {
            return String::new();
        }

        let mut parts: Vec<String> = self
            .parents(id)
            .into_iter()
            .filter(|p| *p != SymbolId::GLOBAL)
            .map(|p| self.get(p).display_name())
            .collect();
        parts.reverse();
        parts.push(symbol.display_name());
        parts.join("::")
    }

    /// Unqualified or qualified lookup of `name` as seen from `context`
    pub fn lookup(&self, context: SymbolId, name: &str) -> Option<&Symbol> {
        NameLookup::new(self)
            .resolve(context, name)
            .and_then(|id| self.find(id))
    }

    /// Resolve a fully qualified name from the global namespace
    pub fn find_by_qualified_name(&self, name: &str) -> Result<&Symbol> {
        if name.is_empty() || name == "::" {
            return Ok(self.global_namespace());
        }
        self.lookup(SymbolId::GLOBAL, &format!("::{}", name.trim_start_matches("::")))
            .ok_or_else(|| Error::NameNotFound(name.to_string()))
    }

    /// Effective interface of a record with default options
    pub fn make_interface(&self, record: SymbolId) -> Result<Interface> {
        interface::make_interface(self, record, &InterfaceOptions::default())
    }

    pub fn make_interface_with(&self, record: SymbolId, options: &InterfaceOptions) -> Result<Interface> {
        interface::make_interface(self, record, options)
    }

    /// Members of a namespace bucketed by sub-kind
    pub fn make_tranche(&self, namespace: SymbolId) -> Result<Tranche> {
        interface::make_tranche(self, namespace)
    }

    /// Interfaces of every record, computed in parallel
    pub fn make_all_interfaces(&self, options: &InterfaceOptions) -> Result<Vec<(SymbolId, Interface)>> {
        let records = self.ids_of_kind(SymbolKind::Record);
        tracing::debug!("Computing interfaces for {} records", records.len());

        records
            .par_iter()
            .map(|id| interface::make_interface(self, *id, options).map(|i| (*id, i)))
            .collect()
    }

    /// Check the members/lookups invariant of every scope
    pub fn scopes_consistent(&self) -> bool {
        self.symbols.values().filter_map(|s| s.scope()).all(|scope| {
            scope.is_consistent(|id| self.find(id).map(|s| s.name.as_str()))
        })
    }

    /// Get statistics about the corpus
    pub fn stats(&self) -> CorpusStats {
        let mut by_kind = BTreeMap::new();
        let mut by_extraction = BTreeMap::new();
        let mut documented = 0;

        for symbol in self.symbols.values() {
            *by_kind.entry(symbol.kind()).or_insert(0) += 1;
            *by_extraction.entry(symbol.extraction).or_insert(0) += 1;
            if symbol.doc.as_ref().is_some_and(|d| !d.is_empty()) {
                documented += 1;
            }
        }

        CorpusStats {
            total_symbols: self.symbols.len(),
            documented,
            by_kind,
            by_extraction,
        }
    }
}

/// Statistics about a corpus
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStats {
    pub total_symbols: usize,
    pub documented: usize,
    pub by_kind: BTreeMap<SymbolKind, usize>,
    pub by_extraction: BTreeMap<ExtractionMode, usize>,
}

impl std::fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Symbol Corpus Statistics:")?;
        writeln!(f, "  Symbols: {} (documented: {})", self.total_symbols, self.documented)?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {}: {}", kind, count)?;
        }
        for (mode, count) in &self.by_extraction {
            writeln!(f, "  extraction {}: {}", mode.as_str(), count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Access, Location};

    fn id(key: &str) -> SymbolId {
        SymbolId::from_key(key)
    }

    fn sample_corpus() -> Corpus {
        let builder = CorpusBuilder::new();
        builder
            .insert(Symbol::new(id("ns"), SymbolKind::Namespace).with_name("app").with_parent(SymbolId::GLOBAL))
            .unwrap();
        builder
            .insert(
                Symbol::new(id("widget"), SymbolKind::Record)
                    .with_name("Widget")
                    .with_parent(id("ns"))
                    .with_def(Location::new("w.hpp", 1)),
            )
            .unwrap();
        for (i, key) in ["draw1", "draw2"].iter().enumerate() {
            builder
                .insert(
                    Symbol::new(id(key), SymbolKind::Function)
                        .with_name("draw")
                        .with_parent(id("widget"))
                        .with_access(Access::Public)
                        .with_def(Location::new("w.hpp", 2 + i as u32)),
                )
                .unwrap();
        }
        builder
            .insert(
                Symbol::new(id("size"), SymbolKind::Field)
                    .with_name("size")
                    .with_parent(id("widget"))
                    .with_access(Access::Private)
                    .with_def(Location::new("w.hpp", 9)),
            )
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_get_and_find() {
        let corpus = sample_corpus();
        assert_eq!(corpus.get(id("widget")).name, "Widget");
        assert!(corpus.find(SymbolId::INVALID).is_none());
        assert!(corpus.find(id("missing")).is_none());
        assert!(matches!(corpus.try_get(id("missing")), Err(Error::SymbolNotFound(_))));
        assert_eq!(corpus.global_namespace().id, SymbolId::GLOBAL);
    }

    #[test]
    #[should_panic(expected = "not in the corpus")]
    fn test_get_absent_panics() {
        sample_corpus().get(id("missing"));
    }

    #[test]
    fn test_traverse_direct_members() {
        let corpus = sample_corpus();
        let mut names = Vec::new();
        corpus.traverse(id("widget"), |s| names.push(s.name.clone()));
        assert_eq!(names, vec!["draw", "draw", "size"]);
    }

    #[test]
    fn test_walk_depth_first() {
        let corpus = sample_corpus();
        let mut names = Vec::new();
        corpus.walk(id("ns"), |s| names.push(s.name.clone()));
        assert_eq!(names, vec!["app", "Widget", "draw", "draw", "size"]);
    }

    #[test]
    fn test_traverse_overloads_groups_callables() {
        let corpus = sample_corpus();
        let mut seen = Vec::new();
        corpus.traverse_overloads(id("widget"), |s| seen.push((s.kind(), s.name.clone())));
        assert_eq!(
            seen,
            vec![
                (SymbolKind::Overloads, "draw".to_string()),
                (SymbolKind::Field, "size".to_string()),
            ]
        );
    }

    #[test]
    fn test_qualified_names() {
        let corpus = sample_corpus();
        assert_eq!(corpus.qualified_name(id("draw1")), "app::Widget::draw");
        assert_eq!(corpus.qualified_name(SymbolId::GLOBAL), "");
        assert_eq!(corpus.parents(id("draw1")), vec![id("widget"), id("ns"), SymbolId::GLOBAL]);
        assert_eq!(corpus.find_by_qualified_name("app::Widget").unwrap().id, id("widget"));
        assert!(corpus.find_by_qualified_name("app::Gadget").is_err());
    }

    #[test]
    fn test_stats() {
        let corpus = sample_corpus();
        let stats = corpus.stats();
        assert_eq!(stats.total_symbols, 6);
        assert_eq!(stats.by_kind.get(&SymbolKind::Function), Some(&2));
        assert_eq!(stats.by_extraction.get(&ExtractionMode::Regular), Some(&6));
        assert!(stats.to_string().contains("function: 2"));
    }

    #[test]
    fn test_scopes_consistent() {
        assert!(sample_corpus().scopes_consistent());
    }
}
