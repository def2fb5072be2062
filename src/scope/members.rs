//! Member list and lookup table of a scope-bearing entity
//!
//! A scope tracks:
//! - Direct members, in registration order
//! - A name → members index used for overload grouping and name lookup
//!
//! Every id in `members` appears exactly once, under its own name, in
//! `lookups`. Registration is idempotent and members are never removed.

use crate::symbol_id::SymbolId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scope {
    members: Vec<SymbolId>,
    lookups: BTreeMap<String, Vec<SymbolId>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child under `name`; returns false if it was already a member
    /// (under any name)
    pub fn add_member(&mut self, id: SymbolId, name: &str) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.lookups.entry(name.to_string()).or_default().push(id);
        self.members.push(id);
        true
    }

    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }

    /// Members sharing `name`, in registration order
    pub fn lookup(&self, name: &str) -> &[SymbolId] {
        self.lookups.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.members.contains(&id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lookups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Register every member of `other` not already present, keeping
    /// `other`'s order for the new ones
    pub fn union(&mut self, other: &Scope) {
        let mut name_of: BTreeMap<SymbolId, &str> = BTreeMap::new();
        for (name, ids) in &other.lookups {
            for id in ids {
                name_of.insert(*id, name.as_str());
            }
        }
        for id in &other.members {
            if let Some(name) = name_of.get(id) {
                self.add_member(*id, name);
            }
        }
    }

    /// Check the members/lookups invariant against each member's real name
    pub fn is_consistent<'a>(&self, name_of: impl Fn(SymbolId) -> Option<&'a str>) -> bool {
        let indexed: usize = self.lookups.values().map(|v| v.len()).sum();
        if indexed != self.members.len() {
            return false;
        }
        self.members.iter().all(|id| match name_of(*id) {
            Some(name) => self.lookup(name).iter().filter(|m| *m == id).count() == 1,
            None => false,
        })
    }
}
