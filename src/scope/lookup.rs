//! Name lookup over a frozen corpus
//!
//! Lookup algorithm:
//! 1. Start at the context entity's innermost enclosing scope
//! 2. Search that scope's lookup table, then any inline namespaces it holds
//! 3. Walk outward through parents until the global namespace
//! 4. Qualified names descend component by component from the first match

use crate::corpus::Corpus;
use crate::symbol::Payload;
use crate::symbol_id::SymbolId;

/// Resolves written names against scope lookup tables
pub struct NameLookup<'a> {
    corpus: &'a Corpus,
}

impl<'a> NameLookup<'a> {
    /// Create a new lookup over `corpus`
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// Scopes searched from `context` outward, innermost first
    pub fn scope_chain(&self, context: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut current = self.corpus.find(context);
        while let Some(symbol) = current {
            if symbol.is_scope() {
                chain.push(symbol.id);
            }
            current = self.corpus.find(symbol.parent);
        }
        chain
    }

    /// Members of `scope` named `name`, looking into inline namespaces
    pub fn lookup_local(&self, scope: SymbolId, name: &str) -> Vec<SymbolId> {
        let Some(scope_info) = self.corpus.find(scope).and_then(|s| s.scope()) else {
            return Vec::new();
        };

        let direct = scope_info.lookup(name);
        if !direct.is_empty() {
            return direct.to_vec();
        }

        let mut found = Vec::new();
        for member in scope_info.members() {
            if let Some(child) = self.corpus.find(*member) {
                if let Payload::Namespace(ns) = &child.payload {
                    if ns.is_inline {
                        found.extend(self.lookup_local(child.id, name));
                    }
                }
            }
        }
        found
    }

    /// Unqualified lookup walking up the scope chain
    pub fn lookup(&self, context: SymbolId, name: &str) -> Vec<SymbolId> {
        for scope in self.scope_chain(context) {
            let found = self.lookup_local(scope, name);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Resolve a possibly qualified name (`a::b::c`, or `::a::b` from the
    /// global namespace) to the first matching entity
    pub fn resolve(&self, context: SymbolId, name: &str) -> Option<SymbolId> {
        let (absolute, path) = match name.strip_prefix("::") {
            Some(rest) => (true, rest),
            None => (false, name),
        };

        let mut components = path.split("::").filter(|c| !c.is_empty());
        let first = components.next()?;

        let candidates = if absolute {
            self.lookup_local(SymbolId::GLOBAL, first)
        } else {
            self.lookup(context, first)
        };
        let mut current = candidates.first().copied()?;

        for component in components {
            current = self.lookup_local(current, component).first().copied()?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusBuilder;
    use crate::symbol::{NamespaceInfo, Symbol, SymbolKind};

    fn id(key: &str) -> SymbolId {
        SymbolId::from_key(key)
    }

    fn sample_corpus() -> Corpus {
        let builder = CorpusBuilder::new();
        builder
            .insert(Symbol::new(id("ns"), SymbolKind::Namespace).with_name("ns").with_parent(SymbolId::GLOBAL))
            .unwrap();
        builder
            .insert(
                Symbol::from_payload(
                    id("v1"),
                    Payload::Namespace(NamespaceInfo {
                        is_inline: true,
                        ..NamespaceInfo::default()
                    }),
                )
                .with_name("v1")
                .with_parent(id("ns")),
            )
            .unwrap();
        builder
            .insert(Symbol::new(id("widget"), SymbolKind::Record).with_name("Widget").with_parent(id("v1")))
            .unwrap();
        builder
            .insert(Symbol::new(id("draw"), SymbolKind::Function).with_name("draw").with_parent(id("widget")))
            .unwrap();
        builder
            .insert(Symbol::new(id("helper"), SymbolKind::Function).with_name("helper").with_parent(SymbolId::GLOBAL))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_scope_chain() {
        let corpus = sample_corpus();
        let lookup = NameLookup::new(&corpus);

        let chain = lookup.scope_chain(id("draw"));
        assert_eq!(chain, vec![id("widget"), id("v1"), id("ns"), SymbolId::GLOBAL]);
    }

    #[test]
    fn test_unqualified_lookup_walks_outward() {
        let corpus = sample_corpus();
        let lookup = NameLookup::new(&corpus);

        assert_eq!(lookup.lookup(id("draw"), "helper"), vec![id("helper")]);
        assert_eq!(lookup.lookup(id("draw"), "draw"), vec![id("draw")]);
        assert!(lookup.lookup(id("draw"), "missing").is_empty());
    }

    #[test]
    fn test_inline_namespace_is_transparent() {
        let corpus = sample_corpus();
        let lookup = NameLookup::new(&corpus);

        assert_eq!(lookup.lookup_local(id("ns"), "Widget"), vec![id("widget")]);
        assert_eq!(lookup.resolve(SymbolId::GLOBAL, "ns::Widget::draw"), Some(id("draw")));
        assert_eq!(lookup.resolve(id("draw"), "::ns::v1::Widget"), Some(id("widget")));
        assert_eq!(lookup.resolve(SymbolId::GLOBAL, "ns::Gadget"), None);
    }
}
