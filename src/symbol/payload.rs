//! Kind-specific payloads
//!
//! `Payload` is the closed set of declaration kinds. Each variant carries only
//! the fields its kind adds to the common base in [`Symbol`](super::Symbol).

use super::types::*;
use super::SymbolKind;
use crate::scope::Scope;
use crate::symbol_id::SymbolId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceInfo {
    pub is_inline: bool,
    pub is_anonymous: bool,
    pub using_directives: Vec<NameRef>,
    #[serde(skip_deserializing)]
    pub scope: Scope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordInfo {
    pub key: RecordKeyKind,
    /// Declared as `typedef struct { } Name;`
    pub is_typedef: bool,
    pub is_final: bool,
    pub bases: Vec<BaseSpec>,
    pub template: Option<TemplateInfo>,
    #[serde(skip_deserializing)]
    pub scope: Scope,
}

/// Boolean traits of a function. Each is sticky once observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionFlags {
    pub is_variadic: bool,
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_inline: bool,
    pub is_deprecated: bool,
    pub is_nodiscard: bool,
    pub is_final: bool,
    pub is_override: bool,
    pub is_noreturn: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionInfo {
    pub class: FunctionClass,
    pub return_type: Option<TypeRef>,
    pub params: Vec<Param>,
    pub template: Option<TemplateInfo>,
    pub storage: StorageClass,
    pub operator: OperatorKind,
    pub noexcept: Option<ConditionalSpec>,
    pub explicit: Option<ConditionalSpec>,
    pub constexpr_kind: ConstexprKind,
    pub ref_qualifier: RefQualifier,
    pub requires: String,
    pub flags: FunctionFlags,
}

impl FunctionInfo {
    pub fn is_static(&self) -> bool {
        self.storage == StorageClass::Static
    }

    /// Parameter type spellings, the part of a signature that tells
    /// overloads apart
    pub fn param_types(&self) -> Vec<&str> {
        self.params
            .iter()
            .map(|p| p.ty.as_ref().map(|t| t.spelling.as_str()).unwrap_or(""))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumInfo {
    pub is_scoped: bool,
    pub underlying_type: Option<TypeRef>,
    pub constants: Vec<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumConstantInfo {
    pub initializer: Option<Expr>,
}

/// Non-static data member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldInfo {
    pub ty: Option<TypeRef>,
    pub default: String,
    pub bitfield_width: Option<Expr>,
    pub is_bitfield: bool,
    pub is_mutable: bool,
    pub is_deprecated: bool,
    pub is_maybe_unused: bool,
    pub has_no_unique_address: bool,
}

/// Namespace-scope variable or static data member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableInfo {
    pub ty: Option<TypeRef>,
    pub template: Option<TemplateInfo>,
    pub storage: StorageClass,
    pub constexpr_kind: ConstexprKind,
    pub initializer: Option<Expr>,
    pub is_inline: bool,
    pub is_constinit: bool,
    pub is_thread_local: bool,
    pub is_deprecated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypedefInfo {
    pub ty: Option<TypeRef>,
    /// Declared with `using X = ...`
    pub is_using: bool,
    pub template: Option<TemplateInfo>,
}

/// Namespace alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasInfo {
    pub aliased: Option<NameRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendInfo {
    /// Befriended function or record
    pub symbol: SymbolId,
    /// Befriended type, for `friend T;`
    pub ty: Option<TypeRef>,
}

/// Deduction guide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideInfo {
    pub deduced: Option<TypeRef>,
    pub params: Vec<Param>,
    pub template: Option<TemplateInfo>,
    pub explicit: Option<ConditionalSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptInfo {
    pub template: Option<TemplateInfo>,
    pub constraint: Option<Expr>,
}

/// Using-declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsingInfo {
    pub class: UsingClass,
    pub qualifier: Option<NameRef>,
    /// Declarations the using-declaration brings into scope
    pub shadows: Vec<SymbolId>,
}

/// Explicit or partial specialization of a class template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecializationInfo {
    pub primary: SymbolId,
    pub args: Vec<TemplateArg>,
    #[serde(skip_deserializing)]
    pub scope: Scope,
}

/// Aggregated return type of an overload group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnAggregate {
    /// Every member returns this type
    Common(Option<TypeRef>),
    /// At least two members disagree
    Varies,
}

impl Default for ReturnAggregate {
    fn default() -> Self {
        ReturnAggregate::Common(None)
    }
}

impl ReturnAggregate {
    /// Fold one more observed return type into the aggregate
    pub fn combine(&mut self, ty: &Option<TypeRef>) {
        if let ReturnAggregate::Common(current) = self {
            if current != ty {
                *self = ReturnAggregate::Varies;
            }
        }
    }

    pub fn varies(&self) -> bool {
        matches!(self, ReturnAggregate::Varies)
    }
}

/// Synthetic group of same-name callables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverloadsInfo {
    pub class: FunctionClass,
    pub operator: OperatorKind,
    pub is_static: bool,
    pub return_type: ReturnAggregate,
    pub members: Vec<SymbolId>,
}

/// Closed set of kind-specific payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Namespace(NamespaceInfo),
    Record(RecordInfo),
    Function(FunctionInfo),
    Enum(EnumInfo),
    EnumConstant(EnumConstantInfo),
    Field(FieldInfo),
    Variable(VariableInfo),
    Typedef(TypedefInfo),
    Alias(AliasInfo),
    Friend(FriendInfo),
    Guide(GuideInfo),
    Concept(ConceptInfo),
    Using(UsingInfo),
    Specialization(SpecializationInfo),
    Overloads(OverloadsInfo),
}

impl Payload {
    /// An all-unknown payload of the given kind
    pub fn empty(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Namespace => Payload::Namespace(NamespaceInfo::default()),
            SymbolKind::Record => Payload::Record(RecordInfo::default()),
            SymbolKind::Function => Payload::Function(FunctionInfo::default()),
            SymbolKind::Enum => Payload::Enum(EnumInfo::default()),
            SymbolKind::EnumConstant => Payload::EnumConstant(EnumConstantInfo::default()),
            SymbolKind::Field => Payload::Field(FieldInfo::default()),
            SymbolKind::Variable => Payload::Variable(VariableInfo::default()),
            SymbolKind::Typedef => Payload::Typedef(TypedefInfo::default()),
            SymbolKind::Alias => Payload::Alias(AliasInfo::default()),
            SymbolKind::Friend => Payload::Friend(FriendInfo::default()),
            SymbolKind::Guide => Payload::Guide(GuideInfo::default()),
            SymbolKind::Concept => Payload::Concept(ConceptInfo::default()),
            SymbolKind::Using => Payload::Using(UsingInfo::default()),
            SymbolKind::Specialization => Payload::Specialization(SpecializationInfo::default()),
            SymbolKind::Overloads => Payload::Overloads(OverloadsInfo::default()),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Payload::Namespace(_) => SymbolKind::Namespace,
            Payload::Record(_) => SymbolKind::Record,
            Payload::Function(_) => SymbolKind::Function,
            Payload::Enum(_) => SymbolKind::Enum,
            Payload::EnumConstant(_) => SymbolKind::EnumConstant,
            Payload::Field(_) => SymbolKind::Field,
            Payload::Variable(_) => SymbolKind::Variable,
            Payload::Typedef(_) => SymbolKind::Typedef,
            Payload::Alias(_) => SymbolKind::Alias,
            Payload::Friend(_) => SymbolKind::Friend,
            Payload::Guide(_) => SymbolKind::Guide,
            Payload::Concept(_) => SymbolKind::Concept,
            Payload::Using(_) => SymbolKind::Using,
            Payload::Specialization(_) => SymbolKind::Specialization,
            Payload::Overloads(_) => SymbolKind::Overloads,
        }
    }

    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Payload::Namespace(info) => Some(&info.scope),
            Payload::Record(info) => Some(&info.scope),
            Payload::Specialization(info) => Some(&info.scope),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Payload::Namespace(info) => Some(&mut info.scope),
            Payload::Record(info) => Some(&mut info.scope),
            Payload::Specialization(info) => Some(&mut info.scope),
            _ => None,
        }
    }
}
