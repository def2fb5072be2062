//! Merge engine - folds repeated sightings of one entity together
//!
//! Field policies:
//! - Mostly-constant scalars (names, types, template heads, specifiers):
//!   the first populated value wins
//! - Extraction mode: least specific wins
//! - Documentation: union of distinct comments
//! - Locations: first definition wins, declarations are a sorted union
//! - Authoritative lists (parameters, bases, constants): adopted only when
//!   the existing list is empty
//! - Boolean traits: logical OR
//!
//! Over fragments that agree wherever both are populated, the result does not
//! depend on the order or grouping of merges, and merging a fragment into
//! itself changes nothing.

use crate::symbol::*;
use crate::symbol_id::SymbolId;

/// Fold `incoming` into `existing`.
///
/// # Panics
///
/// Both fragments must describe the same entity: same id and same kind.
/// Anything else is a defect in the caller and aborts immediately.
pub fn merge(existing: &mut Symbol, incoming: Symbol) {
    assert_eq!(
        existing.id, incoming.id,
        "merging fragments of different entities"
    );
    assert_eq!(
        existing.kind(),
        incoming.kind(),
        "entity {} cannot change kind",
        existing.id
    );

    let Symbol {
        id: _,
        name,
        parent,
        access,
        extraction,
        doc,
        source,
        payload,
    } = incoming;

    first_non_empty(&mut existing.name, name);
    first_known(&mut existing.parent, parent);
    first_known(&mut existing.access, access);
    existing.extraction = existing.extraction.least_specific(extraction);
    merge_doc(&mut existing.doc, doc);
    merge_source(&mut existing.source, source);
    merge_payload(&mut existing.payload, payload);
}

/// By-value form of [`merge`]
pub fn merged(mut existing: Symbol, incoming: Symbol) -> Symbol {
    merge(&mut existing, incoming);
    existing
}

fn first_some<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if slot.is_none() {
        *slot = incoming;
    }
}

fn first_non_empty(slot: &mut String, incoming: String) {
    if slot.is_empty() {
        *slot = incoming;
    }
}

/// First value that differs from the type's "unknown" default
fn first_known<T: Default + PartialEq>(slot: &mut T, incoming: T) {
    if *slot == T::default() {
        *slot = incoming;
    }
}

fn adopt_if_empty<T>(slot: &mut Vec<T>, incoming: Vec<T>) {
    if slot.is_empty() {
        *slot = incoming;
    }
}

fn either(slot: &mut bool, incoming: bool) {
    *slot |= incoming;
}

/// Append ids not yet present, keeping existing order
pub(crate) fn union_ids(slot: &mut Vec<SymbolId>, incoming: &[SymbolId]) {
    for id in incoming {
        if !slot.contains(id) {
            slot.push(*id);
        }
    }
}

fn merge_doc(existing: &mut Option<Documentation>, incoming: Option<Documentation>) {
    let Some(incoming) = incoming else {
        return;
    };
    match existing {
        Some(doc) => doc.merge(incoming),
        None => *existing = Some(incoming),
    }
}

/// Combine the locations of two sightings
pub fn merge_source(existing: &mut SourceInfo, incoming: SourceInfo) {
    if let Some(other) = incoming.def {
        match &mut existing.def {
            Some(def) => {
                if def.same_place(&other) {
                    def.documented |= other.documented;
                }
            }
            None => existing.def = Some(other),
        }
    }

    existing.decls.extend(incoming.decls);
    normalize_locations(&mut existing.decls);
}

/// Sort by place and collapse duplicates, keeping the documented flag if any
/// duplicate had it
fn normalize_locations(locs: &mut Vec<Location>) {
    locs.sort_by(|a, b| (&a.path, a.line).cmp(&(&b.path, b.line)));
    locs.dedup_by(|later, kept| {
        if later.same_place(kept) {
            kept.documented |= later.documented;
            true
        } else {
            false
        }
    });
}

fn merge_payload(existing: &mut Payload, incoming: Payload) {
    match (existing, incoming) {
        (Payload::Namespace(a), Payload::Namespace(b)) => merge_namespace(a, b),
        (Payload::Record(a), Payload::Record(b)) => merge_record(a, b),
        (Payload::Function(a), Payload::Function(b)) => merge_function(a, b),
        (Payload::Enum(a), Payload::Enum(b)) => {
            either(&mut a.is_scoped, b.is_scoped);
            first_some(&mut a.underlying_type, b.underlying_type);
            adopt_if_empty(&mut a.constants, b.constants);
        }
        (Payload::EnumConstant(a), Payload::EnumConstant(b)) => {
            first_some(&mut a.initializer, b.initializer);
        }
        (Payload::Field(a), Payload::Field(b)) => merge_field(a, b),
        (Payload::Variable(a), Payload::Variable(b)) => merge_variable(a, b),
        (Payload::Typedef(a), Payload::Typedef(b)) => {
            first_some(&mut a.ty, b.ty);
            either(&mut a.is_using, b.is_using);
            first_some(&mut a.template, b.template);
        }
        (Payload::Alias(a), Payload::Alias(b)) => {
            first_some(&mut a.aliased, b.aliased);
        }
        (Payload::Friend(a), Payload::Friend(b)) => {
            first_known(&mut a.symbol, b.symbol);
            first_some(&mut a.ty, b.ty);
        }
        (Payload::Guide(a), Payload::Guide(b)) => {
            first_some(&mut a.deduced, b.deduced);
            adopt_if_empty(&mut a.params, b.params);
            first_some(&mut a.template, b.template);
            first_some(&mut a.explicit, b.explicit);
        }
        (Payload::Concept(a), Payload::Concept(b)) => {
            first_some(&mut a.template, b.template);
            first_some(&mut a.constraint, b.constraint);
        }
        (Payload::Using(a), Payload::Using(b)) => {
            first_known(&mut a.class, b.class);
            first_some(&mut a.qualifier, b.qualifier);
            adopt_if_empty(&mut a.shadows, b.shadows);
        }
        (Payload::Specialization(a), Payload::Specialization(b)) => {
            first_known(&mut a.primary, b.primary);
            adopt_if_empty(&mut a.args, b.args);
            a.scope.union(&b.scope);
        }
        (Payload::Overloads(a), Payload::Overloads(b)) => merge_overloads(a, b),
        (a, b) => unreachable!("payload kinds {} and {} checked equal", a.kind(), b.kind()),
    }
}

fn merge_namespace(a: &mut NamespaceInfo, b: NamespaceInfo) {
    either(&mut a.is_inline, b.is_inline);
    either(&mut a.is_anonymous, b.is_anonymous);
    adopt_if_empty(&mut a.using_directives, b.using_directives);
    a.scope.union(&b.scope);
}

fn merge_record(a: &mut RecordInfo, b: RecordInfo) {
    // Struct doubles as "unknown": a forward declaration may not say
    first_known(&mut a.key, b.key);
    either(&mut a.is_typedef, b.is_typedef);
    either(&mut a.is_final, b.is_final);
    adopt_if_empty(&mut a.bases, b.bases);
    first_some(&mut a.template, b.template);
    a.scope.union(&b.scope);
}

fn merge_function(a: &mut FunctionInfo, b: FunctionInfo) {
    first_known(&mut a.class, b.class);
    first_some(&mut a.return_type, b.return_type);
    adopt_if_empty(&mut a.params, b.params);
    first_some(&mut a.template, b.template);
    first_known(&mut a.storage, b.storage);
    first_known(&mut a.operator, b.operator);
    first_some(&mut a.noexcept, b.noexcept);
    first_some(&mut a.explicit, b.explicit);
    first_known(&mut a.constexpr_kind, b.constexpr_kind);
    first_known(&mut a.ref_qualifier, b.ref_qualifier);
    first_non_empty(&mut a.requires, b.requires);
    merge_function_flags(&mut a.flags, b.flags);
}

fn merge_function_flags(a: &mut FunctionFlags, b: FunctionFlags) {
    either(&mut a.is_variadic, b.is_variadic);
    either(&mut a.is_virtual, b.is_virtual);
    either(&mut a.is_pure, b.is_pure);
    either(&mut a.is_deleted, b.is_deleted);
    either(&mut a.is_defaulted, b.is_defaulted);
    either(&mut a.is_const, b.is_const);
    either(&mut a.is_volatile, b.is_volatile);
    either(&mut a.is_inline, b.is_inline);
    either(&mut a.is_deprecated, b.is_deprecated);
    either(&mut a.is_nodiscard, b.is_nodiscard);
    either(&mut a.is_final, b.is_final);
    either(&mut a.is_override, b.is_override);
    either(&mut a.is_noreturn, b.is_noreturn);
}

fn merge_field(a: &mut FieldInfo, b: FieldInfo) {
    first_some(&mut a.ty, b.ty);
    first_non_empty(&mut a.default, b.default);
    first_some(&mut a.bitfield_width, b.bitfield_width);
    either(&mut a.is_bitfield, b.is_bitfield);
    either(&mut a.is_mutable, b.is_mutable);
    either(&mut a.is_deprecated, b.is_deprecated);
    either(&mut a.is_maybe_unused, b.is_maybe_unused);
    either(&mut a.has_no_unique_address, b.has_no_unique_address);
}

fn merge_variable(a: &mut VariableInfo, b: VariableInfo) {
    first_some(&mut a.ty, b.ty);
    first_some(&mut a.template, b.template);
    first_known(&mut a.storage, b.storage);
    first_known(&mut a.constexpr_kind, b.constexpr_kind);
    first_some(&mut a.initializer, b.initializer);
    either(&mut a.is_inline, b.is_inline);
    either(&mut a.is_constinit, b.is_constinit);
    either(&mut a.is_thread_local, b.is_thread_local);
    either(&mut a.is_deprecated, b.is_deprecated);
}

fn merge_overloads(a: &mut OverloadsInfo, b: OverloadsInfo) {
    first_known(&mut a.class, b.class);
    first_known(&mut a.operator, b.operator);
    either(&mut a.is_static, b.is_static);
    match b.return_type {
        ReturnAggregate::Common(ty) => a.return_type.combine(&ty),
        ReturnAggregate::Varies => a.return_type = ReturnAggregate::Varies,
    }
    union_ids(&mut a.members, &b.members);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(key: &str) -> Symbol {
        Symbol::new(SymbolId::from_key(key), SymbolKind::Function)
    }

    fn with_params(mut symbol: Symbol, params: &[(&str, &str)]) -> Symbol {
        if let Some(info) = symbol.as_function_mut() {
            info.params = params
                .iter()
                .map(|(name, ty)| Param::new(*name, TypeRef::new(*ty)))
                .collect();
        }
        symbol
    }

    #[test]
    fn test_partial_sightings_combine() {
        let first = function("f")
            .with_name("f")
            .with_def(Location::new("f.cpp", 10))
            .with_doc(DocComment::brief("Does f"));
        let second = with_params(
            function("f").with_decl(Location::new("f.hpp", 3)),
            &[("x", "int")],
        );

        let result = merged(first, second);
        assert_eq!(result.name, "f");
        assert_eq!(result.source.def, Some(Location::new("f.cpp", 10)));
        assert_eq!(result.source.decls, vec![Location::new("f.hpp", 3)]);
        assert_eq!(result.doc.as_ref().and_then(|d| d.brief()), Some("Does f"));
        assert_eq!(result.as_function().unwrap().param_types(), vec!["int"]);
    }

    #[test]
    fn test_first_populated_scalar_wins() {
        let a = function("g").with_name("g").with_access(Access::Public);
        let b = function("g").with_name("other").with_access(Access::Private);

        let result = merged(a, b);
        assert_eq!(result.name, "g");
        assert_eq!(result.access, Access::Public);
    }

    #[test]
    fn test_params_adopted_only_when_empty() {
        let a = with_params(function("h"), &[("a", "int")]);
        let b = with_params(function("h"), &[("b", "long"), ("c", "char")]);

        let result = merged(a, b);
        assert_eq!(result.as_function().unwrap().param_types(), vec!["int"]);
    }

    #[test]
    fn test_extraction_least_specific() {
        let a = function("e").with_extraction(ExtractionMode::Dependency);
        let b = function("e").with_extraction(ExtractionMode::SeeBelow);

        assert_eq!(merged(a.clone(), b.clone()).extraction, ExtractionMode::SeeBelow);
        assert_eq!(merged(b, a).extraction, ExtractionMode::SeeBelow);
    }

    #[test]
    fn test_flags_are_sticky() {
        let mut a = function("v");
        a.as_function_mut().unwrap().flags.is_virtual = true;
        let mut b = function("v");
        b.as_function_mut().unwrap().flags.is_const = true;

        let result = merged(a, b);
        let flags = result.as_function().unwrap().flags;
        assert!(flags.is_virtual);
        assert!(flags.is_const);
        assert!(!flags.is_pure);
    }

    #[test]
    fn test_declarations_sorted_and_deduped() {
        let mut documented = Location::new("a.hpp", 5);
        documented.documented = true;

        let a = function("d")
            .with_decl(Location::new("b.hpp", 1))
            .with_decl(Location::new("a.hpp", 5));
        let b = function("d").with_decl(documented.clone());

        let result = merged(a, b);
        assert_eq!(result.source.decls, vec![documented, Location::new("b.hpp", 1)]);
    }

    #[test]
    fn test_record_key_upgrades_from_struct() {
        let fwd = Symbol::new(SymbolId::from_key("r"), SymbolKind::Record);
        let mut def = Symbol::new(SymbolId::from_key("r"), SymbolKind::Record);
        def.as_record_mut().unwrap().key = RecordKeyKind::Class;

        assert_eq!(merged(fwd.clone(), def.clone()).as_record().unwrap().key, RecordKeyKind::Class);
        assert_eq!(merged(def, fwd).as_record().unwrap().key, RecordKeyKind::Class);
    }

    #[test]
    fn test_merge_with_self_is_identity() {
        let a = with_params(
            function("i")
                .with_name("i")
                .with_def(Location::new("i.cpp", 1))
                .with_decl(Location::new("i.hpp", 2))
                .with_doc(DocComment::brief("I")),
            &[("x", "int")],
        );
        assert_eq!(merged(a.clone(), a.clone()), a);
    }

    #[test]
    #[should_panic(expected = "cannot change kind")]
    fn test_kind_mismatch_panics() {
        let a = function("k");
        let b = Symbol::new(SymbolId::from_key("k"), SymbolKind::Record);
        merge(&mut a.clone(), b);
    }

    #[test]
    #[should_panic(expected = "different entities")]
    fn test_id_mismatch_panics() {
        merge(&mut function("x"), function("y"));
    }
}
