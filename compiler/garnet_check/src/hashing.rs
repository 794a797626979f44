//! File hashes for incremental decisions.
//!
//! Both hashes are computed from names' text, never from `NameRef` ids, so a
//! file hashes the same in any state that indexed it.

use std::hash::{Hash, Hasher};

use garnet_core::{core_names, DefinitionsHash, FileHash, GlobalState, ShortNameHash, UsageHash};
use garnet_ir::visitor::{walk_expr, walk_method_def, Visitor};
use garnet_ir::{Expr, ExprKind, Literal, MethodDef, NameRef, ParsedFile};
use rustc_hash::FxHasher;

use crate::namer::{find_definitions, DefinitionOwner, FoundDefinitions};
use crate::paths::ConstPath;

/// Hash an indexed (not yet named) tree.
pub fn compute_file_hash(gs: &GlobalState, tree: &ParsedFile) -> FileHash {
    let found = find_definitions(gs, tree);
    FileHash {
        definitions: definitions_hash(gs, &found),
        usages: usage_hash(gs, tree),
    }
}

fn definitions_hash(gs: &GlobalState, found: &FoundDefinitions) -> DefinitionsHash {
    let mut h = FxHasher::default();
    let name = |h: &mut FxHasher, name: NameRef| gs.short_name(name).hash(h);
    let path = |h: &mut FxHasher, path: Option<&ConstPath>| match path {
        Some(path) => {
            path.rooted.hash(h);
            path.names.len().hash(h);
            for &segment in &path.names {
                name(h, segment);
            }
        }
        None => 0xffu8.hash(h),
    };

    found.classes.len().hash(&mut h);
    for class in &found.classes {
        hash_owner(&mut h, class.owner);
        path(&mut h, class.path.as_ref());
        class.kind.hash(&mut h);
        path(&mut h, class.superclass.as_ref());
        class.includes.len().hash(&mut h);
        for include in &class.includes {
            path(&mut h, Some(include));
        }
    }

    found.methods.len().hash(&mut h);
    for method in &found.methods {
        hash_owner(&mut h, method.owner);
        name(&mut h, method.name);
        method.params.len().hash(&mut h);
        method.is_self_method.hash(&mut h);
        method.synthetic.hash(&mut h);
    }

    for fields in [&found.fields, &found.static_fields] {
        fields.len().hash(&mut h);
        for field in fields {
            hash_owner(&mut h, field.owner);
            name(&mut h, field.name);
            // Other files resolve through what a constant aliases.
            path(&mut h, field.value.as_ref());
        }
    }

    DefinitionsHash(h.finish())
}

fn hash_owner(h: &mut FxHasher, owner: DefinitionOwner) {
    match owner {
        DefinitionOwner::Root => usize::MAX.hash(h),
        DefinitionOwner::Class(idx) => idx.hash(h),
    }
}

fn usage_hash(gs: &GlobalState, tree: &ParsedFile) -> UsageHash {
    let mut collector = UsageCollector {
        gs,
        hashes: Vec::new(),
    };
    collector.visit_expr(&tree.tree);
    UsageHash::from_hashes(collector.hashes)
}

struct UsageCollector<'gs> {
    gs: &'gs GlobalState,
    hashes: Vec<ShortNameHash>,
}

impl UsageCollector<'_> {
    fn add(&mut self, name: NameRef) {
        self.hashes.push(ShortNameHash::new(self.gs.short_name(name)));
    }
}

impl<'ast> Visitor<'ast> for UsageCollector<'_> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match &expr.kind {
            ExprKind::UnresolvedConstant { name, .. }
            | ExprKind::UnresolvedIdent { name, .. }
            | ExprKind::Local { name } => self.add(*name),
            ExprKind::ConstantLit(lit) => self.add(lit.name),
            ExprKind::Send(send) => {
                self.add(send.fun);
                // `new` calls `initialize`.
                if send.fun == core_names::NEW {
                    self.add(core_names::INITIALIZE);
                }
            }
            ExprKind::Literal(Literal::Symbol(name)) => self.add(*name),
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_method_def(&mut self, method: &'ast MethodDef) {
        self.add(method.name);
        for param in &method.params {
            self.add(param.name);
        }
        walk_method_def(self, method);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index, reindex};
    use pretty_assertions::assert_eq;

    fn hash_of(source: &str) -> FileHash {
        let (gs, trees) = index(&[("a.rb", source)]);
        compute_file_hash(&gs, &trees[0])
    }

    #[test]
    fn test_body_edits_keep_definitions_hash() {
        let before = hash_of("class A\n  def foo(x)\n    x\n  end\nend\n");
        let after = hash_of("class A\n  def foo(x)\n    puts(x)\n    1\n  end\nend\n");
        assert_eq!(before.definitions, after.definitions);
        assert_ne!(before.usages, after.usages);
    }

    #[test]
    fn test_definition_edits_change_definitions_hash() {
        let base = hash_of("class A\n  def foo(x)\n  end\nend\n");
        for edited in [
            "class A\n  def foo(x, y)\n  end\nend\n",
            "class A\n  def bar(x)\n  end\nend\n",
            "module A\n  def foo(x)\n  end\nend\n",
            "class A < B\n  def foo(x)\n  end\nend\n",
            "class A\n  def self.foo(x)\n  end\nend\n",
            "class A\n  X = 1\n  def foo(x)\n  end\nend\n",
            "class A\n  def foo(x)\n    @y = 1\n  end\nend\n",
        ] {
            assert_ne!(base.definitions, hash_of(edited).definitions, "{edited}");
        }
    }

    #[test]
    fn test_alias_target_is_part_of_definitions_hash() {
        let base = hash_of("class A\nend\nclass B\nend\nX = A\n");
        let retargeted = hash_of("class A\nend\nclass B\nend\nX = B\n");
        let not_an_alias = hash_of("class A\nend\nclass B\nend\nX = 1\n");
        assert_ne!(base.definitions, retargeted.definitions);
        assert_ne!(base.definitions, not_an_alias.definitions);
        // Non-constant values stay out of it.
        assert_eq!(not_an_alias.definitions, hash_of("class A\nend\nclass B\nend\nX = 2\n").definitions);
    }

    #[test]
    fn test_hash_ignores_name_table_order() {
        // A state that interned other names first still hashes the same.
        let (mut gs, _) = index(&[("a.rb", "zzz = 1\nclass Other\nend\n"), ("b.rb", "")]);
        let tree = reindex(&mut gs, "b.rb", "class A\n  def foo\n  end\nend\n");
        assert_eq!(
            compute_file_hash(&gs, &tree),
            hash_of("class A\n  def foo\n  end\nend\n")
        );
    }

    #[test]
    fn test_usages_cover_sends_and_initialize() {
        let hash = hash_of("A.new(1)\nx = :sym\n@field\n");
        for name in ["A", "new", "initialize", "x", "sym", "@field"] {
            assert!(hash.usages.contains(ShortNameHash::new(name)), "{name}");
        }
        assert!(!hash.usages.contains(ShortNameHash::new("missing")));
    }
}
