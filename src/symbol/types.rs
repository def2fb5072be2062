//! Value types shared by several entity payloads
//!
//! These carry what the extractor already resolved: type spellings, the
//! entity a type or name refers to, template heads, and specifier keywords.
//! Every "unknown" state is the `Default`, so a fragment can leave any of
//! them unset and let a later sighting fill it in.

use crate::symbol::Access;
use crate::symbol_id::SymbolId;
use serde::{Deserialize, Serialize};

/// A type as written, plus the entity it names when there is one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRef {
    pub spelling: String,
    pub symbol: SymbolId,
}

impl TypeRef {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            symbol: SymbolId::INVALID,
        }
    }

    /// A type naming an entity in the corpus
    pub fn named(spelling: impl Into<String>, symbol: SymbolId) -> Self {
        Self {
            spelling: spelling.into(),
            symbol,
        }
    }
}

/// A name as written, plus the entity it refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct NameRef {
    pub name: String,
    pub symbol: SymbolId,
}

/// A function or guide parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeRef>,
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            default: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateParamKind {
    #[default]
    Type,
    NonType,
    Template,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateParam {
    pub name: String,
    pub kind: TemplateParamKind,
    pub default: Option<String>,
    pub is_pack: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateArg {
    pub written: String,
    pub symbol: SymbolId,
}

/// Template head of a templated entity, or the argument list of a
/// partial/explicit specialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateInfo {
    pub params: Vec<TemplateParam>,
    pub args: Vec<TemplateArg>,
    /// Primary template when this is a specialization
    pub primary: SymbolId,
    pub requires: String,
}

impl TemplateInfo {
    pub fn is_specialization(&self) -> bool {
        self.primary.is_valid()
    }
}

/// One entry of a record's base-specifier list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSpec {
    pub ty: TypeRef,
    pub access: Access,
    pub is_virtual: bool,
}

impl BaseSpec {
    pub fn new(ty: TypeRef, access: Access) -> Self {
        Self {
            ty,
            access,
            is_virtual: false,
        }
    }

    pub fn virtual_base(ty: TypeRef, access: Access) -> Self {
        Self {
            ty,
            access,
            is_virtual: true,
        }
    }
}

/// An expression as written, plus its constant value when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expr {
    pub written: String,
    pub value: Option<i64>,
}

impl Expr {
    pub fn new(written: impl Into<String>) -> Self {
        Self {
            written: written.into(),
            value: None,
        }
    }

    pub fn constant(written: impl Into<String>, value: i64) -> Self {
        Self {
            written: written.into(),
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    #[default]
    False,
    True,
    Dependent,
}

/// `noexcept(...)` and `explicit(...)` specifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalSpec {
    pub kind: ConditionKind,
    pub operand: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKeyKind {
    #[default]
    Struct,
    Class,
    Union,
}

impl RecordKeyKind {
    /// Access of members and bases declared without a specifier
    pub fn default_access(&self) -> Access {
        match self {
            RecordKeyKind::Class => Access::Private,
            RecordKeyKind::Struct | RecordKeyKind::Union => Access::Public,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKeyKind::Struct => "struct",
            RecordKeyKind::Class => "class",
            RecordKeyKind::Union => "union",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionClass {
    #[default]
    Normal,
    Constructor,
    Destructor,
    Conversion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    None,
    Extern,
    Static,
    Auto,
    Register,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstexprKind {
    #[default]
    None,
    Constexpr,
    Consteval,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsingClass {
    #[default]
    Normal,
    Typename,
    Enum,
}

/// Overloaded operator a function declares, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    #[default]
    None,
    New,
    Delete,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    EqualEqual,
    ExclaimEqual,
    LessEqual,
    GreaterEqual,
    Spaceship,
    AmpAmp,
    PipePipe,
    LessLess,
    GreaterGreater,
    PlusPlus,
    MinusMinus,
    Comma,
    Arrow,
    Call,
    Subscript,
}

impl OperatorKind {
    /// Token following the `operator` keyword
    pub fn spelling(&self) -> &'static str {
        match self {
            OperatorKind::None => "",
            OperatorKind::New => "new",
            OperatorKind::Delete => "delete",
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Star => "*",
            OperatorKind::Slash => "/",
            OperatorKind::Percent => "%",
            OperatorKind::Caret => "^",
            OperatorKind::Amp => "&",
            OperatorKind::Pipe => "|",
            OperatorKind::Tilde => "~",
            OperatorKind::Exclaim => "!",
            OperatorKind::Equal => "=",
            OperatorKind::Less => "<",
            OperatorKind::Greater => ">",
            OperatorKind::PlusEqual => "+=",
            OperatorKind::MinusEqual => "-=",
            OperatorKind::StarEqual => "*=",
            OperatorKind::SlashEqual => "/=",
            OperatorKind::EqualEqual => "==",
            OperatorKind::ExclaimEqual => "!=",
            OperatorKind::LessEqual => "<=",
            OperatorKind::GreaterEqual => ">=",
            OperatorKind::Spaceship => "<=>",
            OperatorKind::AmpAmp => "&&",
            OperatorKind::PipePipe => "||",
            OperatorKind::LessLess => "<<",
            OperatorKind::GreaterGreater => ">>",
            OperatorKind::PlusPlus => "++",
            OperatorKind::MinusMinus => "--",
            OperatorKind::Comma => ",",
            OperatorKind::Arrow => "->",
            OperatorKind::Call => "()",
            OperatorKind::Subscript => "[]",
        }
    }

    pub fn is_operator(&self) -> bool {
        *self != OperatorKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_default_access() {
        assert_eq!(RecordKeyKind::Class.default_access(), Access::Private);
        assert_eq!(RecordKeyKind::Struct.default_access(), Access::Public);
        assert_eq!(RecordKeyKind::Union.default_access(), Access::Public);
    }

    #[test]
    fn test_defaults_are_unknown() {
        assert_eq!(OperatorKind::default(), OperatorKind::None);
        assert_eq!(FunctionClass::default(), FunctionClass::Normal);
        assert!(!TemplateInfo::default().is_specialization());
        assert!(!TypeRef::default().symbol.is_valid());
    }

    #[test]
    fn test_type_ref_from_partial_json() {
        let ty: TypeRef = serde_json::from_str(r#"{"spelling": "int"}"#).unwrap();
        assert_eq!(ty, TypeRef::new("int"));
    }
}
