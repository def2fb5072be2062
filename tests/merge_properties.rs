//! Algebraic properties of the merge engine and the structures it feeds.
//!
//! Fragments are produced by masking one fully-populated entity, so every
//! pair of fragments agrees wherever both carry a value.

use proptest::prelude::*;
use symcorpus::merge::merged;
use symcorpus::overloads::OverloadSet;
use symcorpus::scope::Scope;
use symcorpus::symbol::{
    DocComment, Documentation, FunctionClass, Location, Param, ReturnAggregate, TypeRef,
};
use symcorpus::{Access, ExtractionMode, Symbol, SymbolId, SymbolKind};

const DECLS: [(&str, u32); 3] = [("a.hpp", 4), ("a.hpp", 9), ("b.hpp", 1)];

fn comments() -> Vec<DocComment> {
    vec![
        DocComment::brief("Parses the input.").with_param("text", "Source text"),
        DocComment::brief("Parses the input.").with_returns("The parsed value"),
        DocComment::default().with_block("Fails on empty input."),
    ]
}

#[derive(Debug, Clone)]
struct Mask {
    name: bool,
    parent: bool,
    access: bool,
    extraction: ExtractionMode,
    def: Option<bool>,
    decls: Vec<Option<bool>>,
    docs: Option<Vec<bool>>,
    return_type: bool,
    params: bool,
    class: bool,
    flags: (bool, bool, bool),
}

fn extraction() -> impl Strategy<Value = ExtractionMode> {
    prop_oneof![
        Just(ExtractionMode::Regular),
        Just(ExtractionMode::SeeBelow),
        Just(ExtractionMode::ImplementationDefined),
        Just(ExtractionMode::Dependency),
    ]
}

fn mask() -> impl Strategy<Value = Mask> {
    (
        (any::<bool>(), any::<bool>(), any::<bool>(), extraction()),
        proptest::option::of(any::<bool>()),
        proptest::collection::vec(proptest::option::of(any::<bool>()), DECLS.len()),
        proptest::option::of(proptest::collection::vec(any::<bool>(), 3)),
        (any::<bool>(), any::<bool>(), any::<bool>()),
        (any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(
            |((name, parent, access, extraction), def, decls, docs, (return_type, params, class), flags)| Mask {
                name,
                parent,
                access,
                extraction,
                def,
                decls,
                docs,
                return_type,
                params,
                class,
                flags,
            },
        )
}

/// The part of one fully-known function that a sighting happened to see
fn fragment(mask: &Mask) -> Symbol {
    let mut symbol = Symbol::new(SymbolId::from_key("c:@N@app@F@parse#&1S0_#"), SymbolKind::Function)
        .with_extraction(mask.extraction);
    if mask.name {
        symbol.name = "parse".to_string();
    }
    if mask.parent {
        symbol.parent = SymbolId::from_key("c:@N@app");
    }
    if mask.access {
        symbol.access = Access::Public;
    }
    if let Some(documented) = mask.def {
        symbol.source.def = Some(Location {
            documented,
            ..Location::new("a.cpp", 30)
        });
    }
    symbol.source.decls = DECLS
        .iter()
        .zip(&mask.decls)
        .filter_map(|((path, line), seen)| {
            seen.map(|documented| Location {
                documented,
                ..Location::new(*path, *line)
            })
        })
        .collect();
    if let Some(picked) = &mask.docs {
        let seen: Vec<DocComment> = comments()
            .into_iter()
            .zip(picked)
            .filter(|(_, keep)| **keep)
            .map(|(comment, _)| comment)
            .collect();
        symbol.doc = Some(Documentation::from(seen));
    }

    if let Some(info) = symbol.as_function_mut() {
        if mask.return_type {
            info.return_type = Some(TypeRef::new("Value"));
        }
        if mask.params {
            info.params = vec![Param::new("text", TypeRef::new("std::string_view"))];
        }
        if mask.class {
            info.class = FunctionClass::Conversion;
        }
        info.flags.is_const = mask.flags.0;
        info.flags.is_noreturn = mask.flags.1;
        info.flags.is_nodiscard = mask.flags.2;
    }
    symbol
}

proptest! {
    #[test]
    fn merge_is_commutative(a in mask(), b in mask()) {
        let (a, b) = (fragment(&a), fragment(&b));
        prop_assert_eq!(merged(a.clone(), b.clone()), merged(b, a));
    }

    #[test]
    fn merge_is_associative(a in mask(), b in mask(), c in mask()) {
        let (a, b, c) = (fragment(&a), fragment(&b), fragment(&c));
        let left = merged(merged(a.clone(), b.clone()), c.clone());
        let right = merged(a, merged(b, c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn merge_is_idempotent(a in mask()) {
        let a = fragment(&a);
        prop_assert_eq!(merged(a.clone(), a.clone()), a);
    }

    #[test]
    fn extraction_is_least_specific(a in mask(), b in mask()) {
        let (a, b) = (fragment(&a), fragment(&b));
        let expected = a.extraction.min(b.extraction);
        prop_assert_eq!(merged(a, b).extraction, expected);
    }

    #[test]
    fn declarations_stay_sorted_and_unique(a in mask(), b in mask()) {
        let result = merged(fragment(&a), fragment(&b));
        let places: Vec<(&str, u32)> = result
            .source
            .decls
            .iter()
            .map(|loc| (loc.path.as_str(), loc.line))
            .collect();
        let mut expected = places.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(places, expected);
    }

    #[test]
    fn scope_lookups_track_members(adds in proptest::collection::vec(0usize..12, 0..40)) {
        const NAMES: [&str; 4] = ["draw", "size", "draw", "resize"];
        let ids: Vec<SymbolId> = (0..12).map(|i| SymbolId::from_key(&format!("m{}", i))).collect();

        let mut scope = Scope::new();
        for index in &adds {
            scope.add_member(ids[*index], NAMES[index % NAMES.len()]);
        }

        let name_of = |id: SymbolId| {
            ids.iter().position(|m| *m == id).map(|i| NAMES[i % NAMES.len()])
        };
        prop_assert!(scope.is_consistent(name_of));
        for member in scope.members() {
            let name = name_of(*member).unwrap_or_default();
            prop_assert_eq!(scope.lookup(name).iter().filter(|m| *m == member).count(), 1);
        }
    }

    #[test]
    fn overload_sets_have_unique_members(
        returns in proptest::collection::vec(0usize..3, 1..10),
        repeats in proptest::collection::vec(0usize..10, 0..5),
    ) {
        const TYPES: [&str; 3] = ["int", "long", "void"];
        let functions: Vec<Symbol> = returns
            .iter()
            .enumerate()
            .map(|(i, ret)| {
                let mut f = Symbol::new(SymbolId::from_key(&format!("h{}", i)), SymbolKind::Function)
                    .with_name("h")
                    .with_access(Access::Public);
                if let Some(info) = f.as_function_mut() {
                    info.return_type = Some(TypeRef::new(TYPES[*ret]));
                }
                f
            })
            .collect();

        let mut set = OverloadSet::new(SymbolId::GLOBAL, "h", Access::Public, false);
        for f in &functions {
            set.add_member(f);
        }
        for index in repeats {
            set.add_member(&functions[index % functions.len()]);
        }

        let mut unique = set.members.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), set.members.len());
        prop_assert_eq!(set.len(), functions.len());

        let all_same = returns.iter().all(|r| *r == returns[0]);
        if all_same {
            prop_assert_eq!(set.return_type, ReturnAggregate::Common(Some(TypeRef::new(TYPES[returns[0]]))));
        } else {
            prop_assert_eq!(set.return_type, ReturnAggregate::Varies);
        }
    }
}
