//! Interface aggregation - the effective member set of a record
//!
//! Algorithm:
//! 1. Walk the base graph depth-first from the record, composing access
//!    along each path; a base reached by several paths is visited once and
//!    gets the most restrictive of their accesses
//! 2. Emit members base-first, so each record's own members follow those
//!    it inherits
//! 3. Drop members hidden by a same-identity member of a more derived scope
//! 4. Bucket survivors into public/protected/private tranches by sub-kind

use crate::corpus::Corpus;
use crate::symbol::*;
use crate::symbol_id::SymbolId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Limit on typedef chains followed when resolving a base
const MAX_TYPEDEF_HOPS: usize = 16;

/// Knobs for interface computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceOptions {
    /// Include members inherited through private bases
    pub private_bases: bool,
}

impl Default for InterfaceOptions {
    fn default() -> Self {
        Self { private_bases: true }
    }
}

/// Member ids of one access level, bucketed by sub-kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tranche {
    pub namespaces: Vec<SymbolId>,
    /// Nested records and specializations
    pub records: Vec<SymbolId>,
    pub functions: Vec<SymbolId>,
    pub enums: Vec<SymbolId>,
    /// Typedefs, namespace aliases, and using-declarations
    pub aliases: Vec<SymbolId>,
    pub fields: Vec<SymbolId>,
    /// Variables; static data members in a record interface
    pub variables: Vec<SymbolId>,
    pub static_functions: Vec<SymbolId>,
    pub friends: Vec<SymbolId>,
    pub guides: Vec<SymbolId>,
    pub concepts: Vec<SymbolId>,
}

impl Tranche {
    /// Append a member to the bucket for its kind
    pub fn push(&mut self, symbol: &Symbol) {
        let bucket = match symbol.kind() {
            SymbolKind::Namespace => &mut self.namespaces,
            SymbolKind::Record | SymbolKind::Specialization => &mut self.records,
            SymbolKind::Function if symbol.is_static() => &mut self.static_functions,
            SymbolKind::Function => &mut self.functions,
            SymbolKind::Enum => &mut self.enums,
            SymbolKind::Typedef | SymbolKind::Alias | SymbolKind::Using => &mut self.aliases,
            SymbolKind::Field => &mut self.fields,
            SymbolKind::Variable => &mut self.variables,
            SymbolKind::Friend => &mut self.friends,
            SymbolKind::Guide => &mut self.guides,
            SymbolKind::Concept => &mut self.concepts,
            SymbolKind::EnumConstant | SymbolKind::Overloads => return,
        };
        if !bucket.contains(&symbol.id) {
            bucket.push(symbol.id);
        }
    }

    /// Every bucket with its label, in display order
    pub fn buckets(&self) -> [(&'static str, &[SymbolId]); 11] {
        [
            ("namespaces", self.namespaces.as_slice()),
            ("records", self.records.as_slice()),
            ("functions", self.functions.as_slice()),
            ("enums", self.enums.as_slice()),
            ("aliases", self.aliases.as_slice()),
            ("fields", self.fields.as_slice()),
            ("variables", self.variables.as_slice()),
            ("static functions", self.static_functions.as_slice()),
            ("friends", self.friends.as_slice()),
            ("guides", self.guides.as_slice()),
            ("concepts", self.concepts.as_slice()),
        ]
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.buckets().into_iter().flat_map(|(_, ids)| ids.iter().copied())
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.ids().any(|m| m == id)
    }

    pub fn len(&self) -> usize {
        self.buckets().iter().map(|(_, ids)| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Effective interface of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub public: Tranche,
    pub protected: Tranche,
    pub private: Tranche,
}

impl Interface {
    pub fn tranche(&self, access: Access) -> Option<&Tranche> {
        match access {
            Access::Public => Some(&self.public),
            Access::Protected => Some(&self.protected),
            Access::Private => Some(&self.private),
            Access::None => None,
        }
    }

    fn tranche_mut(&mut self, access: Access) -> &mut Tranche {
        match access {
            Access::Protected => &mut self.protected,
            Access::Private => &mut self.private,
            Access::Public | Access::None => &mut self.public,
        }
    }

    /// Every member id across all three tranches
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.public
            .ids()
            .chain(self.protected.ids())
            .chain(self.private.ids())
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.protected.len() + self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What makes two members the same for hiding purposes. Unnamed members
/// (anonymous unions, unnamed bit-fields) never hide one another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MemberIdentity {
    Unnamed(SymbolId),
    Name(String),
    Callable {
        name: String,
        params: Vec<String>,
        is_const: bool,
    },
}

impl MemberIdentity {
    fn of(symbol: &Symbol) -> Self {
        if symbol.name.is_empty() {
            return MemberIdentity::Unnamed(symbol.id);
        }
        match symbol.as_function() {
            Some(info) => MemberIdentity::Callable {
                name: symbol.name.clone(),
                params: info.param_types().into_iter().map(str::to_string).collect(),
                is_const: info.flags.is_const,
            },
            None => MemberIdentity::Name(symbol.name.clone()),
        }
    }
}

struct Candidate {
    scope: SymbolId,
    member: SymbolId,
    access: Access,
    identity: MemberIdentity,
}

/// Base-graph walk state for one record
struct BaseWalk<'a> {
    corpus: &'a Corpus,
    /// Combined path access of every reached base
    access: HashMap<SymbolId, Access>,
    /// Scopes in emission order, bases before derived
    order: Vec<SymbolId>,
    emitted: HashSet<SymbolId>,
    direct_bases: HashMap<SymbolId, Vec<SymbolId>>,
    in_progress: Vec<SymbolId>,
}

impl<'a> BaseWalk<'a> {
    fn new(corpus: &'a Corpus) -> Self {
        Self {
            corpus,
            access: HashMap::new(),
            order: Vec::new(),
            emitted: HashSet::new(),
            direct_bases: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Follow typedefs until a record or specialization
    fn resolve_base(&self, ty: &TypeRef) -> Option<&'a Symbol> {
        let mut id = ty.symbol;
        for _ in 0..MAX_TYPEDEF_HOPS {
            let symbol = self.corpus.find(id)?;
            match &symbol.payload {
                Payload::Record(_) | Payload::Specialization(_) => return Some(symbol),
                Payload::Typedef(info) => id = info.ty.as_ref()?.symbol,
                _ => return None,
            }
        }
        None
    }

    fn visit(&mut self, scope: &'a Symbol, path_access: Access) {
        if self.in_progress.contains(&scope.id) {
            tracing::warn!("Inheritance cycle through {}", scope.id);
            return;
        }
        self.in_progress.push(scope.id);

        if let Some(info) = scope.as_record() {
            for base in &info.bases {
                let Some(base_symbol) = self.resolve_base(&base.ty) else {
                    tracing::debug!(
                        "Base {:?} of {} is not in the corpus",
                        base.ty.spelling,
                        scope.id
                    );
                    continue;
                };

                let edge = match base.access {
                    Access::None => info.key.default_access(),
                    access => access,
                };
                let composed = path_access.most_restrictive(edge);

                let direct = self.direct_bases.entry(scope.id).or_default();
                if !direct.contains(&base_symbol.id) {
                    direct.push(base_symbol.id);
                }

                match self.access.get(&base_symbol.id).copied() {
                    // Already reached with at least this restriction
                    Some(previous) if previous.most_restrictive(composed) == previous => {}
                    Some(previous) => {
                        self.access.insert(base_symbol.id, previous.most_restrictive(composed));
                        self.visit(base_symbol, composed);
                    }
                    None => {
                        self.access.insert(base_symbol.id, composed);
                        self.visit(base_symbol, composed);
                    }
                }
            }
        }

        self.in_progress.pop();
        if self.emitted.insert(scope.id) {
            self.order.push(scope.id);
        }
    }

    /// Whether `derived` has `base` among its transitive bases
    fn derives_from(&self, derived: SymbolId, base: SymbolId) -> bool {
        let mut stack = vec![derived];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            for next in self.direct_bases.get(&current).into_iter().flatten() {
                if *next == base {
                    return true;
                }
                if seen.insert(*next) {
                    stack.push(*next);
                }
            }
        }
        false
    }
}

/// Members a derived record does not inherit
fn is_inheritable(symbol: &Symbol) -> bool {
    match &symbol.payload {
        Payload::Function(info) => !matches!(
            info.class,
            FunctionClass::Constructor | FunctionClass::Destructor
        ),
        Payload::Guide(_) | Payload::Friend(_) => false,
        _ => true,
    }
}

/// Default access of members declared without a specifier
fn default_member_access(scope: &Symbol) -> Access {
    scope
        .as_record()
        .map(|info| info.key.default_access())
        .unwrap_or(Access::Public)
}

/// Compute the effective interface of `record`
pub fn make_interface(corpus: &Corpus, record: SymbolId, options: &InterfaceOptions) -> Result<Interface> {
    let root = corpus.try_get(record)?;
    if root.kind() != SymbolKind::Record {
        return Err(Error::KindMismatch {
            id: record,
            expected: SymbolKind::Record,
            found: root.kind(),
        });
    }

    let mut walk = BaseWalk::new(corpus);
    walk.visit(root, Access::None);

    let mut candidates = Vec::new();
    for scope_id in &walk.order {
        let scope = corpus.get(*scope_id);
        let is_root = *scope_id == record;
        let path_access = walk.access.get(scope_id).copied().unwrap_or(Access::None);

        if !is_root && !options.private_bases && path_access == Access::Private {
            continue;
        }
        let Some(members) = scope.scope() else {
            continue;
        };

        for member_id in members.members() {
            let member = corpus.get(*member_id);
            if !is_root && !is_inheritable(member) {
                continue;
            }

            let own = match member.access {
                Access::None => default_member_access(scope),
                access => access,
            };
            let access = if is_root {
                own
            } else {
                own.most_restrictive(path_access)
            };

            candidates.push(Candidate {
                scope: *scope_id,
                member: *member_id,
                access,
                identity: MemberIdentity::of(member),
            });
        }
    }

    let mut scopes_by_identity: HashMap<&MemberIdentity, Vec<SymbolId>> = HashMap::new();
    for candidate in &candidates {
        scopes_by_identity
            .entry(&candidate.identity)
            .or_default()
            .push(candidate.scope);
    }

    let mut interface = Interface::default();
    let mut placed = HashSet::new();
    for candidate in &candidates {
        let hidden = scopes_by_identity[&candidate.identity]
            .iter()
            .any(|other| *other != candidate.scope && walk.derives_from(*other, candidate.scope));
        if hidden || !placed.insert(candidate.member) {
            continue;
        }
        interface
            .tranche_mut(candidate.access)
            .push(corpus.get(candidate.member));
    }

    tracing::debug!(
        "Interface of {}: {} members from {} scopes",
        corpus.qualified_name(record),
        interface.len(),
        walk.order.len()
    );
    Ok(interface)
}

/// Bucket a namespace's direct members by sub-kind
pub fn make_tranche(corpus: &Corpus, namespace: SymbolId) -> Result<Tranche> {
    let symbol = corpus.try_get(namespace)?;
    if symbol.kind() != SymbolKind::Namespace {
        return Err(Error::KindMismatch {
            id: namespace,
            expected: SymbolKind::Namespace,
            found: symbol.kind(),
        });
    }

    let mut tranche = Tranche::default();
    corpus.traverse(namespace, |member| tranche.push(member));
    Ok(tranche)
}
