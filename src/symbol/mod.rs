//! Entity model - one canonical record per declared program element
//!
//! Every entity shares a common base (identity, name, parent, access,
//! extraction level, documentation, source locations) and carries exactly one
//! kind-specific [`Payload`]. The kind is derived from the payload, so an
//! entity can never change kind once created.

pub mod doc;
pub mod payload;
pub mod types;

use crate::scope::Scope;
use crate::symbol_id::SymbolId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use doc::{DocComment, Documentation, ParamDoc};
pub use payload::*;
pub use types::*;

/// Closed set of declaration kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Namespace,
    /// Class, struct, or union
    Record,
    Function,
    Enum,
    EnumConstant,
    /// Non-static data member
    Field,
    /// Namespace-scope variable or static data member
    Variable,
    /// `typedef` or alias-declaration
    Typedef,
    /// Namespace alias
    Alias,
    Friend,
    /// Deduction guide
    Guide,
    Concept,
    /// Using-declaration
    Using,
    Specialization,
    /// Synthetic overload group
    Overloads,
}

impl SymbolKind {
    /// Get the string representation of the symbol kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Record => "record",
            SymbolKind::Function => "function",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumConstant => "enum_constant",
            SymbolKind::Field => "field",
            SymbolKind::Variable => "variable",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Alias => "alias",
            SymbolKind::Friend => "friend",
            SymbolKind::Guide => "guide",
            SymbolKind::Concept => "concept",
            SymbolKind::Using => "using",
            SymbolKind::Specialization => "specialization",
            SymbolKind::Overloads => "overloads",
        }
    }

    /// Get all symbol kinds
    pub fn all() -> &'static [SymbolKind] {
        &[
            SymbolKind::Namespace,
            SymbolKind::Record,
            SymbolKind::Function,
            SymbolKind::Enum,
            SymbolKind::EnumConstant,
            SymbolKind::Field,
            SymbolKind::Variable,
            SymbolKind::Typedef,
            SymbolKind::Alias,
            SymbolKind::Friend,
            SymbolKind::Guide,
            SymbolKind::Concept,
            SymbolKind::Using,
            SymbolKind::Specialization,
            SymbolKind::Overloads,
        ]
    }

    /// Kinds that own a member list and lookup table
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            SymbolKind::Namespace | SymbolKind::Record | SymbolKind::Specialization
        )
    }
}

impl FromStr for SymbolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "namespace" | "ns" => Ok(SymbolKind::Namespace),
            "record" | "class" | "struct" | "union" => Ok(SymbolKind::Record),
            "function" | "fn" | "method" => Ok(SymbolKind::Function),
            "enum" => Ok(SymbolKind::Enum),
            "enum_constant" | "enumerator" => Ok(SymbolKind::EnumConstant),
            "field" => Ok(SymbolKind::Field),
            "variable" | "var" => Ok(SymbolKind::Variable),
            "typedef" => Ok(SymbolKind::Typedef),
            "alias" | "namespace_alias" => Ok(SymbolKind::Alias),
            "friend" => Ok(SymbolKind::Friend),
            "guide" => Ok(SymbolKind::Guide),
            "concept" => Ok(SymbolKind::Concept),
            "using" => Ok(SymbolKind::Using),
            "specialization" => Ok(SymbolKind::Specialization),
            "overloads" => Ok(SymbolKind::Overloads),
            _ => Err(Error::Parse(format!("Unknown symbol kind: {}", s))),
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Member access. `None` means "not a member" or "not yet known".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    None,
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::None => "none",
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }

    fn restriction(&self) -> u8 {
        match self {
            Access::None => 0,
            Access::Public => 1,
            Access::Protected => 2,
            Access::Private => 3,
        }
    }

    /// The more restrictive of two accesses; `None` yields to the other side
    pub fn most_restrictive(self, other: Access) -> Access {
        if other.restriction() > self.restriction() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an entity came to be extracted, from most to least specific.
///
/// Declaration order matters: the derived `Ord` ranks `Regular` lowest and
/// [`ExtractionMode::least_specific`] keeps the lower of two modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Matched the inclusion filters directly
    #[default]
    Regular,
    /// Documented, but its details are hidden
    SeeBelow,
    /// Shown as "implementation-defined"
    ImplementationDefined,
    /// Only pulled in because something else refers to it
    Dependency,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Regular => "regular",
            ExtractionMode::SeeBelow => "see-below",
            ExtractionMode::ImplementationDefined => "implementation-defined",
            ExtractionMode::Dependency => "dependency",
        }
    }

    pub fn all() -> &'static [ExtractionMode] {
        &[
            ExtractionMode::Regular,
            ExtractionMode::SeeBelow,
            ExtractionMode::ImplementationDefined,
            ExtractionMode::Dependency,
        ]
    }

    /// The mode that passed the fewest filters
    pub fn least_specific(self, other: ExtractionMode) -> ExtractionMode {
        self.min(other)
    }
}

/// A position in a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub path: String,
    pub line: u32,
    /// A comment was attached at this location
    pub documented: bool,
}

impl Location {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
            documented: false,
        }
    }

    pub fn same_place(&self, other: &Location) -> bool {
        self.path == other.path && self.line == other.line
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Where an entity was defined and declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceInfo {
    pub def: Option<Location>,
    /// Kept sorted by `(path, line)`, one entry per place
    pub decls: Vec<Location>,
}

impl SourceInfo {
    /// Earliest known location: the definition, else the first declaration
    pub fn primary(&self) -> Option<&Location> {
        self.def.as_ref().or_else(|| self.decls.first())
    }

    pub fn is_empty(&self) -> bool {
        self.def.is_none() && self.decls.is_empty()
    }
}

/// One declared program element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: SymbolId,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub extraction: ExtractionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Documentation>,
    #[serde(default)]
    pub source: SourceInfo,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Symbol {
    /// Create an entity of `kind` with every other field unknown
    pub fn new(id: SymbolId, kind: SymbolKind) -> Self {
        Self::from_payload(id, Payload::empty(kind))
    }

    pub fn from_payload(id: SymbolId, payload: Payload) -> Self {
        Self {
            id,
            name: String::new(),
            parent: SymbolId::INVALID,
            access: Access::None,
            extraction: ExtractionMode::Regular,
            doc: None,
            source: SourceInfo::default(),
            payload,
        }
    }

    /// The implicit global namespace
    pub fn global_namespace() -> Self {
        Self::new(SymbolId::GLOBAL, SymbolKind::Namespace)
    }

    pub fn kind(&self) -> SymbolKind {
        self.payload.kind()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_parent(mut self, parent: SymbolId) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionMode) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<Documentation>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_def(mut self, loc: Location) -> Self {
        self.source.def = Some(loc);
        self
    }

    pub fn with_decl(mut self, loc: Location) -> Self {
        self.source.decls.push(loc);
        self.source.decls.sort();
        self
    }

    pub fn is_scope(&self) -> bool {
        self.kind().is_scope()
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.payload.scope()
    }

    pub fn scope_mut(&mut self) -> Option<&mut Scope> {
        self.payload.scope_mut()
    }

    pub fn as_function(&self) -> Option<&FunctionInfo> {
        match &self.payload {
            Payload::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionInfo> {
        match &mut self.payload {
            Payload::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordInfo> {
        match &self.payload {
            Payload::Record(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut RecordInfo> {
        match &mut self.payload {
            Payload::Record(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumInfo> {
        match &self.payload {
            Payload::Enum(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_typedef(&self) -> Option<&TypedefInfo> {
        match &self.payload {
            Payload::Typedef(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_overloads(&self) -> Option<&OverloadsInfo> {
        match &self.payload {
            Payload::Overloads(info) => Some(info),
            _ => None,
        }
    }

    /// Static member function or static data member
    pub fn is_static(&self) -> bool {
        match &self.payload {
            Payload::Function(info) => info.is_static(),
            Payload::Variable(info) => info.storage == StorageClass::Static,
            Payload::Overloads(info) => info.is_static,
            _ => false,
        }
    }

    /// Display name, with a placeholder for anonymous entities
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("<unnamed {}>", self.kind())
        } else {
            self.name.clone()
        }
    }

    /// Get a short description for display
    pub fn short_description(&self) -> String {
        match &self.payload {
            Payload::Function(info) => {
                let params = info.param_types().join(", ");
                format!("{} {}({})", self.kind(), self.display_name(), params)
            }
            _ => format!("{} {}", self.kind(), self.display_name()),
        }
    }
}
