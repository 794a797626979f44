//! Property tests for response cleanup and usage hashes.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use garnet_core::{QueryResponse, ResponseKind, ShortNameHash, Type};
use garnet_ir::{FileRef, Loc, NameRef, Span, SymbolRef};
use garnetc::lsp::filter_and_dedup;
use proptest::prelude::*;

use common::session;

const TYPED: &str = "# typed: true\nclass A\n  def foo\n    1\n  end\nend\nA.new.foo\n";
const UNTYPED: &str = "class B\n  def bar\n    2\n  end\nend\nB.new.bar\n";

fn kind_strategy() -> impl Strategy<Value = ResponseKind> {
    prop_oneof![
        Just(ResponseKind::MethodDef {
            symbol: SymbolRef::OBJECT,
            name: NameRef::EMPTY,
        }),
        Just(ResponseKind::Constant {
            symbol: SymbolRef::OBJECT,
            name: NameRef::EMPTY,
            ty: Type::ClassOf(SymbolRef::OBJECT),
        }),
        Just(ResponseKind::Field {
            symbol: SymbolRef::NONE,
            name: NameRef::EMPTY,
            ty: Type::Untyped,
        }),
        Just(ResponseKind::Send {
            callee: SymbolRef::NONE,
            name: NameRef::EMPTY,
            receiver: Type::Untyped,
            result: Type::Nil,
        }),
        Just(ResponseKind::Ident {
            name: NameRef::EMPTY,
            ty: Type::Untyped,
        }),
        Just(ResponseKind::Literal { ty: Type::Nil }),
    ]
}

/// Responses over files 0 (none), 1 (typed), 2 (untyped) and 3 (unknown).
fn response_strategy() -> impl Strategy<Value = QueryResponse> {
    (0..4u32, prop::option::weighted(0.9, (0..40u32, 0..6u32)), kind_strategy()).prop_map(
        |(file, span, kind)| {
            let span = span.map_or(Span::NONE, |(start, len)| Span::new(start, start + len));
            QueryResponse::new(Loc::new(FileRef::new(file), span), kind)
        },
    )
}

fn constant_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-zA-Z0-9]{0,8}").expect("valid regex")
}

fn method_strategy() -> impl Strategy<Value = String> {
    // The prefix keeps clear of keywords.
    prop::string::string_regex("m_[a-z0-9_]{0,8}").expect("valid regex")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_filter_and_dedup_is_ordered_and_idempotent(
        responses in prop::collection::vec(response_strategy(), 0..24)
    ) {
        let (session, _) = session(&[("typed.rb", TYPED), ("untyped.rb", UNTYPED)]);
        let gs = session.state();

        let once = filter_and_dedup(gs, responses.clone());
        let twice = filter_and_dedup(gs, once.clone());
        prop_assert_eq!(&once, &twice);

        for pair in once.windows(2) {
            prop_assert!(pair[0].loc < pair[1].loc);
        }
        for kept in &once {
            prop_assert!(kept.loc.exists());
            prop_assert!(gs.file_exists(kept.loc.file));
            prop_assert!(gs.file(kept.loc.file).is_typed() || kept.kind.is_definition_like());
            // The winner at each location has the best priority among the candidates.
            let best = responses
                .iter()
                .filter(|r| r.loc == kept.loc)
                .map(|r| r.kind.priority())
                .min();
            prop_assert_eq!(Some(kept.kind.priority()), best);
        }
    }

    #[test]
    fn prop_usage_hash_covers_every_reference(
        constants in prop::collection::vec(constant_strategy(), 1..6),
        methods in prop::collection::vec(method_strategy(), 1..6),
    ) {
        let mut source = String::from("# typed: true\n");
        for i in 0..constants.len().max(methods.len()) {
            let constant = &constants[i % constants.len()];
            let method = &methods[i % methods.len()];
            source.push_str(&format!("{constant}.{method}\n"));
        }
        let (session, _) = session(&[("a.rb", source.as_str())]);
        let gs = session.state();
        let hash = gs.file(gs.find_file_by_path("a.rb")).hash().expect("hashed");

        for name in constants.iter().chain(&methods) {
            prop_assert!(hash.usages.contains(ShortNameHash::new(name)), "{} missing", name);
        }
    }
}
