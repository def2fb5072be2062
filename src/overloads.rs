//! Overload sets - synthetic groups of same-name callables
//!
//! A group is keyed by `(parent, name, access, is_static)` and gets a stable
//! id from [`SymbolId::for_overloads`]. Groups are never stored in the corpus;
//! they are rebuilt on demand from a scope's lookup table.

use crate::corpus::Corpus;
use crate::merge::{merge_source, union_ids};
use crate::symbol::*;
use crate::symbol_id::SymbolId;
use std::collections::BTreeMap;

/// Group of same-name callables sharing access and static-ness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadSet {
    pub id: SymbolId,
    pub parent: SymbolId,
    pub name: String,
    pub access: Access,
    pub is_static: bool,
    pub extraction: ExtractionMode,
    pub class: FunctionClass,
    pub operator: OperatorKind,
    pub return_type: ReturnAggregate,
    pub source: SourceInfo,
    pub members: Vec<SymbolId>,
}

impl OverloadSet {
    pub fn new(parent: SymbolId, name: impl Into<String>, access: Access, is_static: bool) -> Self {
        let name = name.into();
        Self {
            id: SymbolId::for_overloads(parent, &name, access, is_static),
            parent,
            name,
            access,
            is_static,
            extraction: ExtractionMode::Regular,
            class: FunctionClass::Normal,
            operator: OperatorKind::None,
            return_type: ReturnAggregate::default(),
            source: SourceInfo::default(),
            members: Vec::new(),
        }
    }

    /// Fold one callable into the group.
    ///
    /// # Panics
    ///
    /// `function` must be a function entity.
    pub fn add_member(&mut self, function: &Symbol) {
        let Some(info) = function.as_function() else {
            panic!("{} is a {}, not a callable", function.id, function.kind());
        };

        if self.members.is_empty() {
            self.name = function.name.clone();
            self.access = function.access;
            self.extraction = function.extraction;
            self.operator = info.operator;
            self.class = info.class;
            self.return_type = ReturnAggregate::Common(info.return_type.clone());
        } else {
            self.extraction = self.extraction.least_specific(function.extraction);
            self.return_type.combine(&info.return_type);
        }

        merge_source(&mut self.source, function.source.clone());
        union_ids(&mut self.members, &[function.id]);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// View the group through the entity model
    pub fn into_symbol(self) -> Symbol {
        let mut symbol = Symbol::from_payload(
            self.id,
            Payload::Overloads(OverloadsInfo {
                class: self.class,
                operator: self.operator,
                is_static: self.is_static,
                return_type: self.return_type,
                members: self.members,
            }),
        );
        symbol.name = self.name;
        symbol.parent = self.parent;
        symbol.access = self.access;
        symbol.extraction = self.extraction;
        symbol.source = self.source;
        symbol
    }
}

/// One step of an overload-aware walk over a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEntry {
    /// A member visited as itself
    Single(SymbolId),
    /// Several callables visited as one group, at the first one's position
    Group(OverloadSet),
}

/// Walk `scope`'s members, replacing callables that share name, access,
/// and static-ness with one group each. A callable without such siblings
/// stays a [`ScopeEntry::Single`].
pub fn group_scope(corpus: &Corpus, scope: SymbolId) -> Vec<ScopeEntry> {
    let Some(scope_info) = corpus.find(scope).and_then(|s| s.scope()) else {
        return Vec::new();
    };

    let mut groups: BTreeMap<(String, &'static str, bool), OverloadSet> = BTreeMap::new();
    for name in scope_info.names() {
        for id in scope_info.lookup(name) {
            let member = corpus.get(*id);
            if member.kind() != SymbolKind::Function {
                continue;
            }
            let key = (name.to_string(), member.access.as_str(), member.is_static());
            groups
                .entry(key)
                .or_insert_with(|| OverloadSet::new(scope, name, member.access, member.is_static()))
                .add_member(member);
        }
    }

    let mut entries = Vec::new();
    for id in scope_info.members() {
        let member = corpus.get(*id);
        if member.kind() != SymbolKind::Function {
            entries.push(ScopeEntry::Single(*id));
            continue;
        }

        let key = (member.name.clone(), member.access.as_str(), member.is_static());
        let Some(group) = groups.get(&key) else {
            continue;
        };
        if group.len() == 1 {
            entries.push(ScopeEntry::Single(*id));
        } else if group.members.first() == Some(id) {
            entries.push(ScopeEntry::Group(group.clone()));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(key: &str, name: &str, ret: &str) -> Symbol {
        let mut symbol = Symbol::new(SymbolId::from_key(key), SymbolKind::Function)
            .with_name(name)
            .with_access(Access::Public);
        if let Some(info) = symbol.as_function_mut() {
            info.return_type = Some(TypeRef::new(ret));
        }
        symbol
    }

    #[test]
    fn test_return_type_varies() {
        let mut set = OverloadSet::new(SymbolId::GLOBAL, "h", Access::Public, false);
        set.add_member(&function("h1", "h", "int"));
        set.add_member(&function("h2", "h", "int"));
        assert_eq!(set.return_type, ReturnAggregate::Common(Some(TypeRef::new("int"))));

        set.add_member(&function("h3", "h", "long"));
        assert!(set.return_type.varies());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_members_deduplicated() {
        let f = function("f1", "f", "void");
        let mut set = OverloadSet::new(SymbolId::GLOBAL, "f", Access::Public, false);
        set.add_member(&f);
        set.add_member(&f);
        assert_eq!(set.members, vec![f.id]);
    }

    #[test]
    fn test_extraction_and_locations_combine() {
        let a = function("g1", "g", "void")
            .with_extraction(ExtractionMode::Dependency)
            .with_decl(Location::new("g.hpp", 4));
        let b = function("g2", "g", "void")
            .with_extraction(ExtractionMode::Regular)
            .with_decl(Location::new("g.hpp", 2));

        let mut set = OverloadSet::new(SymbolId::GLOBAL, "g", Access::Public, false);
        set.add_member(&a);
        assert_eq!(set.extraction, ExtractionMode::Dependency);
        set.add_member(&b);
        assert_eq!(set.extraction, ExtractionMode::Regular);
        assert_eq!(
            set.source.decls,
            vec![Location::new("g.hpp", 2), Location::new("g.hpp", 4)]
        );
    }

    #[test]
    fn test_into_symbol() {
        let mut set = OverloadSet::new(SymbolId::GLOBAL, "h", Access::Public, false);
        set.add_member(&function("h1", "h", "int"));
        let id = set.id;

        let symbol = set.into_symbol();
        assert_eq!(symbol.id, id);
        assert_eq!(symbol.kind(), SymbolKind::Overloads);
        assert_eq!(symbol.name, "h");
        assert_eq!(symbol.as_overloads().map(|o| o.members.len()), Some(1));
    }

    #[test]
    #[should_panic(expected = "not a callable")]
    fn test_non_function_member_panics() {
        let record = Symbol::new(SymbolId::from_key("r"), SymbolKind::Record);
        OverloadSet::new(SymbolId::GLOBAL, "r", Access::Public, false).add_member(&record);
    }
}
