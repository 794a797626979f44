#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::flatten_file;
use crate::test_support::{index, lookup_class, lookup_member, name_and_resolve};
use pretty_assertions::assert_eq;

fn check(source: &str) -> Vec<Diagnostic> {
    let (mut gs, trees) = index(&[("a.rb", source)]);
    let trees = name_and_resolve(&mut gs, trees);
    gs.errors().discard();
    for tree in trees {
        let flat = flatten_file(&gs, tree);
        infer_file(&gs, &flat);
    }
    gs.errors().drain()
}

fn codes(source: &str) -> Vec<ErrorCode> {
    check(source).into_iter().map(|d| d.code).collect()
}

#[test]
fn missing_instance_method() {
    let diags = check("# typed: true\nclass A\nend\nA.new.nope\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E5001);
    assert_eq!(diags[0].message, "Method `nope` does not exist on `A`");
}

#[test]
fn missing_class_method() {
    let diags = check("# typed: true\nclass A\n  def inst\n  end\nend\nA.inst\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Method `inst` does not exist on `<Class:A>`");
}

#[test]
fn kernel_methods_are_not_reported() {
    assert!(codes("# typed: true\nclass A\nend\nA.new.freeze\nA.new.to_s\n").is_empty());
}

#[test]
fn untyped_files_are_skipped() {
    assert!(codes("class A\nend\nA.new.nope\n").is_empty());
}

#[test]
fn argument_count() {
    let diags = check("# typed: true\nclass A\n  def m(x)\n  end\nend\nA.new.m\nA.new.m(1, 2)\nA.new.m(1)\n");
    let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Not enough arguments provided for method `A#m`. Expected: 1, got: 0",
            "Too many arguments provided for method `A#m`. Expected: 1, got: 2",
        ]
    );
}

#[test]
fn new_checks_initialize() {
    let source = "# typed: true\nclass A\n  def initialize(x)\n  end\nend\nclass B < A\nend\nB.new\nA.new(1)\n";
    assert_eq!(codes(source), vec![ErrorCode::E5002]);
}

#[test]
fn inherited_and_singleton_methods_dispatch() {
    let source = "# typed: true\nclass A\n  def base\n  end\n  def self.make\n    helper\n    new.base\n  end\n  def self.helper\n  end\nend\nclass B < A\nend\nB.new.base\nB.make\n";
    assert!(codes(source).is_empty());
}

#[test]
fn top_level_methods_live_on_object() {
    let source = "# typed: true\ndef helper(x)\nend\nhelper(1)\nclass A\n  def m\n    helper(2)\n  end\nend\n";
    assert!(codes(source).is_empty());
}

#[test]
fn included_module_methods_dispatch() {
    let source = "# typed: true\nmodule M\n  def shared\n  end\nend\nclass A\n  include M\nend\nA.new.shared\n";
    assert!(codes(source).is_empty());
}

#[derive(Default)]
struct Recorder(Vec<ResponseKind>);

impl TypeObserver for Recorder {
    fn observe(&mut self, _expr: &Expr, kind: ResponseKind) {
        self.0.push(kind);
    }
}

fn observe_method(source: &str, class: &str, method: &str) -> (GlobalState, Vec<ResponseKind>) {
    let (mut gs, trees) = index(&[("a.rb", source)]);
    let trees = name_and_resolve(&mut gs, trees);
    let target = lookup_member(&gs, lookup_class(&gs, class), method);
    let mut seen = Vec::new();
    for tree in &trees {
        let flat = flatten_file(&gs, tree.clone());
        for_each_method(&gs, &flat.tree, |def, ctx| {
            if def.symbol == target {
                let mut inferencer = Inferencer::new(&gs, flat.file, ctx, Recorder::default());
                inferencer.infer_method(def);
                seen.push(inferencer.observer.0);
            }
        });
    }
    assert_eq!(seen.len(), 1);
    (gs, seen.remove(0))
}

fn last_ident(kinds: &[ResponseKind]) -> Type {
    kinds
        .iter()
        .rev()
        .find_map(|k| match k {
            ResponseKind::Ident { ty, .. } => Some(*ty),
            _ => None,
        })
        .unwrap()
}

#[test]
fn locals_take_assigned_types() {
    let source = "class A\n  def m\n    x = 1\n    a = A.new\n    x\n  end\nend\n";
    let (gs, kinds) = observe_method(source, "A", "m");
    assert_eq!(last_ident(&kinds), Type::Instance(SymbolRef::INTEGER));

    let a = kinds
        .iter()
        .find_map(|k| match k {
            ResponseKind::Ident { name, ty } if gs.short_name(*name) == "a" => Some(*ty),
            _ => None,
        })
        .unwrap();
    assert_eq!(a, Type::Instance(lookup_class(&gs, "A")));
}

#[test]
fn conflicting_assignments_are_untyped() {
    let source = "class A\n  def m\n    x = 1\n    x = \"s\"\n    x\n  end\nend\n";
    let (_, kinds) = observe_method(source, "A", "m");
    assert_eq!(last_ident(&kinds), Type::Untyped);
}

#[test]
fn sends_report_callee_and_result() {
    let source = "class A\n  def other\n  end\n  def m\n    self.other\n  end\nend\n";
    let (gs, kinds) = observe_method(source, "A", "m");
    let a = lookup_class(&gs, "A");
    let other = lookup_member(&gs, a, "other");
    assert_eq!(
        kinds.last().unwrap(),
        &ResponseKind::Send {
            callee: other,
            name: gs.symbol(other).name,
            receiver: Type::Instance(a),
            result: Type::Untyped,
        }
    );
}

#[test]
fn self_type_follows_method_owner() {
    let (mut gs, trees) = index(&[("a.rb", "class A\n  def i\n  end\n  def self.c\n  end\nend\nputs(1)\n")]);
    let trees = name_and_resolve(&mut gs, trees);
    let a = lookup_class(&gs, "A");
    let flat = flatten_file(&gs, trees.into_iter().next().unwrap());

    let mut self_types = Vec::new();
    for_each_method(&gs, &flat.tree, |def, ctx| {
        self_types.push((gs.show_name(def.name), ctx.self_type));
    });
    assert_eq!(
        self_types,
        vec![
            ("i".to_owned(), Type::Instance(a)),
            ("c".to_owned(), Type::ClassOf(a)),
            ("<static-init>".to_owned(), Type::Instance(SymbolRef::OBJECT)),
        ]
    );
}

#[test]
fn literal_types() {
    assert_eq!(literal_type(Literal::Int(3)), Type::Instance(SymbolRef::INTEGER));
    assert_eq!(literal_type(Literal::Nil), Type::Nil);
    assert_eq!(literal_type(Literal::False), Type::Instance(SymbolRef::FALSE_CLASS));
}
