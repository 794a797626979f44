use super::*;
use crate::{FileKind, UsageHash};
use pretty_assertions::assert_eq;

fn class_name(gs: &mut GlobalState, text: &str) -> NameRef {
    let mut gs = gs.unfreeze_names();
    let utf8 = gs.enter_name_utf8(text);
    gs.enter_name_constant(utf8)
}

fn enter_class(gs: &mut GlobalState, owner: SymbolRef, text: &str) -> SymbolRef {
    let name = class_name(gs, text);
    let mut gs = gs.unfreeze_symbols();
    let sym = gs.enter_class_symbol(Loc::NONE, owner, name);
    gs.declare_class_or_module(sym, false);
    sym
}

#[test]
fn test_well_known_symbols() {
    let gs = GlobalState::new();
    assert_eq!(gs.symbols_used_total(), SymbolRef::WELL_KNOWN_COUNT as usize);
    assert_eq!(gs.show_symbol(SymbolRef::OBJECT), "Object");
    assert_eq!(gs.show_symbol(SymbolRef::STUB_MODULE), "<StubModule>");
    assert_eq!(gs.show_symbol(SymbolRef::ROOT), "<root>");
    assert_eq!(gs.symbol(SymbolRef::INTEGER).superclass, SymbolRef::OBJECT);
    assert_eq!(gs.symbol(SymbolRef::OBJECT).superclass, SymbolRef::BASIC_OBJECT);
    assert_eq!(
        gs.lookup_member(SymbolRef::ROOT, core_names::STRING_CONST),
        SymbolRef::STRING
    );
    assert_eq!(gs.short_name(core_names::OBJECT_CONST), "Object");
    assert!(gs.is_frozen(Table::Names));
    assert!(gs.is_frozen(Table::Symbols));
    assert!(gs.is_frozen(Table::Files));
}

#[test]
#[should_panic(expected = "internal invariant")]
fn test_entering_name_while_frozen_panics() {
    let mut gs = GlobalState::new();
    gs.enter_name_utf8("fresh");
}

#[test]
fn test_existing_name_needs_no_unfreeze() {
    let mut gs = GlobalState::new();
    assert_eq!(gs.enter_name_utf8("initialize"), core_names::INITIALIZE);
}

#[test]
#[should_panic(expected = "internal invariant")]
fn test_entering_symbol_while_frozen_panics() {
    let mut gs = GlobalState::new();
    let name = class_name(&mut gs, "Foo");
    gs.enter_class_symbol(Loc::NONE, SymbolRef::ROOT, name);
}

#[test]
fn test_guard_refreezes_on_drop() {
    let mut gs = GlobalState::new();
    {
        let mut names = gs.unfreeze_names();
        assert!(!names.is_frozen(Table::Names));
        {
            let symbols = names.unfreeze_symbols();
            assert!(!symbols.is_frozen(Table::Names));
            assert!(!symbols.is_frozen(Table::Symbols));
        }
        assert!(names.is_frozen(Table::Symbols));
        assert!(!names.is_frozen(Table::Names));
    }
    assert!(gs.is_frozen(Table::Names));
}

#[test]
fn test_nested_guard_keeps_outer_window_open() {
    let mut gs = GlobalState::new();
    let mut outer = gs.unfreeze_names();
    {
        let _inner = outer.unfreeze_names();
    }
    assert!(!outer.is_frozen(Table::Names));
    outer.enter_name_utf8("still_open");
}

#[test]
fn test_enter_is_idempotent() {
    let mut gs = GlobalState::new();
    let foo = enter_class(&mut gs, SymbolRef::ROOT, "Foo");
    let total = gs.symbols_used_total();
    let again = enter_class(&mut gs, SymbolRef::ROOT, "Foo");
    assert_eq!(foo, again);
    assert_eq!(gs.symbols_used_total(), total);

    let mut gs = gs.unfreeze_names();
    let bar = gs.enter_name_utf8("bar");
    let mut gs = gs.unfreeze_symbols();
    let m1 = gs.enter_method_symbol(Loc::NONE, foo, bar);
    let m2 = gs.enter_method_symbol(Loc::NONE, foo, bar);
    assert_eq!(m1, m2);
    assert_eq!(gs.show_symbol(m1), "Foo#bar");
}

#[test]
fn test_show_symbol_nesting() {
    let mut gs = GlobalState::new();
    let a = enter_class(&mut gs, SymbolRef::ROOT, "A");
    let b = enter_class(&mut gs, a, "B");
    assert_eq!(gs.show_symbol(b), "A::B");

    let mut gs = gs.unfreeze_names();
    let m = gs.enter_name_utf8("make");
    let mut gs = gs.unfreeze_symbols();
    let singleton = gs.singleton_class(b);
    let method = gs.enter_method_symbol(Loc::NONE, singleton, m);
    assert_eq!(gs.show_symbol(singleton), "<Class:A::B>");
    assert_eq!(gs.show_symbol(method), "A::B.make");
    assert_eq!(gs.attached_class(singleton), b);
}

#[test]
fn test_ancestors_and_transitive_lookup() {
    let mut gs = GlobalState::new();
    let base = enter_class(&mut gs, SymbolRef::ROOT, "Base");
    let child = enter_class(&mut gs, SymbolRef::ROOT, "Child");
    let mixin = enter_class(&mut gs, SymbolRef::ROOT, "Mixin");

    let mut gs = gs.unfreeze_names();
    let greet = gs.enter_name_utf8("greet");
    let mut gs = gs.unfreeze_symbols();
    gs.set_superclass(base, SymbolRef::OBJECT);
    gs.set_superclass(child, base);
    gs.add_mixin(child, mixin);
    gs.add_mixin(child, mixin);
    let method = gs.enter_method_symbol(Loc::NONE, base, greet);

    assert_eq!(
        gs.ancestors(child),
        vec![child, mixin, base, SymbolRef::OBJECT, SymbolRef::BASIC_OBJECT]
    );
    assert_eq!(gs.find_member_transitive(child, greet), method);
    assert_eq!(gs.lookup_member(child, greet), SymbolRef::NONE);
    assert!(gs.derives_from(child, base));
}

#[test]
fn test_ancestors_survive_cycles() {
    let mut gs = GlobalState::new();
    let a = enter_class(&mut gs, SymbolRef::ROOT, "A");
    let b = enter_class(&mut gs, SymbolRef::ROOT, "B");
    let mut gs = gs.unfreeze_symbols();
    gs.set_superclass(a, b);
    gs.set_superclass(b, a);
    assert_eq!(gs.ancestors(a), vec![a, b]);
}

#[test]
fn test_singleton_ancestors_follow_attached_chain() {
    let mut gs = GlobalState::new();
    let base = enter_class(&mut gs, SymbolRef::ROOT, "Base");
    let child = enter_class(&mut gs, SymbolRef::ROOT, "Child");
    let mut gs = gs.unfreeze_names();
    let mut gs = gs.unfreeze_symbols();
    gs.set_superclass(base, SymbolRef::OBJECT);
    gs.set_superclass(child, base);
    let base_singleton = gs.singleton_class(base);
    let child_singleton = gs.singleton_class(child);
    assert_eq!(gs.ancestors(child_singleton), vec![child_singleton, base_singleton]);
}

#[test]
fn test_static_init_for_file() {
    let mut gs = GlobalState::new();
    let file = {
        let mut gs = gs.unfreeze_files();
        gs.enter_file(File::new("a.rb", "", FileKind::Normal))
    };
    let sym = {
        let mut gs = gs.unfreeze_names();
        let mut gs = gs.unfreeze_symbols();
        gs.static_init_for_file(file)
    };
    assert_eq!(gs.lookup_static_init_for_file(file), sym);
    assert!(gs.symbol(sym).flags.contains(SymbolFlags::SYNTHETIC));
}

#[test]
#[should_panic(expected = "no <static-init>")]
fn test_missing_static_init_panics() {
    let mut gs = GlobalState::new();
    let file = {
        let mut gs = gs.unfreeze_files();
        gs.enter_file(File::new("a.rb", "", FileKind::Normal))
    };
    gs.lookup_static_init_for_file(file);
}

#[test]
fn test_files() {
    let mut gs = GlobalState::new();
    let mut files = gs.unfreeze_files();
    let a = files.enter_file(File::from_path("a.rb", "# typed: true\n"));
    let b = files.enter_file(File::from_path("b.rbi", ""));
    assert_eq!(files.find_file_by_path("a.rb"), a);
    assert_eq!(files.find_file_by_path("missing.rb"), FileRef::NONE);
    assert_eq!(files.file(b).kind(), FileKind::Rbi);
    assert_eq!(files.files_used(), 2);

    files.set_file_hash(a, FileHash::default());
    assert!(files.file(a).hash().is_some());
    files.replace_file(a, File::from_path("a.rb", "# typed: false\n"));
    assert!(files.file(a).hash().is_none());
    assert!(!files.file(a).is_typed());

    let handles: Vec<_> = files.files().map(|(f, _)| f).collect();
    assert_eq!(handles, vec![a, b]);
}

#[test]
fn test_deep_copy_is_independent() {
    let mut gs = GlobalState::new();
    let file = {
        let mut gs = gs.unfreeze_files();
        gs.enter_file(File::from_path("a.rb", "class A; end\n"))
    };
    enter_class(&mut gs, SymbolRef::ROOT, "A");
    let before = gs.deep_copy();
    assert!(before.same_tables(&gs));

    let mut copy = gs.deep_copy();
    enter_class(&mut copy, SymbolRef::ROOT, "OnlyInCopy");
    {
        let mut files = copy.unfreeze_files();
        files.set_file_hash(
            file,
            FileHash {
                usages: UsageHash::from_hashes(vec![crate::ShortNameHash::new("A")]),
                ..FileHash::default()
            },
        );
    }

    assert!(gs.same_tables(&before));
    assert!(!copy.same_tables(&gs));
    assert!(gs.file(file).hash().is_none());
    assert_eq!(copy.symbols_used_total(), gs.symbols_used_total() + 1);
}

#[test]
fn test_deep_copy_gets_fresh_error_channel() {
    use garnet_diagnostic::ErrorCode;

    let gs = GlobalState::new();
    gs.push_error(Diagnostic::error(ErrorCode::E3001).with_message("x"));
    let copy = gs.deep_copy();
    assert!(copy.errors().is_empty());
    assert_eq!(gs.errors().len(), 1);
    assert_eq!(gs.errors().discard(), 1);
    assert!(gs.errors().is_empty());
}

#[test]
fn test_redefinition_of_other_kind_renames_old_member() {
    let mut gs = GlobalState::new();
    let name = class_name(&mut gs, "Thing");
    let mut gs = gs.unfreeze_names();
    let mut gs = gs.unfreeze_symbols();
    let field = gs.enter_static_field_symbol(Loc::NONE, SymbolRef::ROOT, name);
    let class = gs.enter_class_symbol(Loc::NONE, SymbolRef::ROOT, name);
    assert_ne!(field, class);
    assert_eq!(gs.lookup_member(SymbolRef::ROOT, name), class);
    assert!(gs.symbol(field).is_static_field());
    assert_eq!(gs.show_symbol(field), format!("Thing${}", field.index()));
}
