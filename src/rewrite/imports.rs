//! Import renames and the end-of-walk import merge.

use std::collections::HashSet;

use jupgrade_java_cst::{make, NodeId, NodeKind, NodeTag, Tree, TreeError};
use tracing::debug;

use super::context::{PendingImport, RewriteContext, RuleKind};
use crate::rules::RuleTables;

/// Renames one import through the table matching its static-ness.
pub fn rename_import(
    tree: &mut Tree,
    id: NodeId,
    rules: &RuleTables,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let (name, is_static, asterisk, leading) = match tree.node(id)? {
        NodeKind::Import(import) => (
            import.name(),
            import.is_static(),
            import.is_asterisk(),
            import.import_kw.leading.clone(),
        ),
        _ => return Ok(()),
    };
    let mapped = if is_static {
        rules.static_import(&name)
    } else {
        rules.type_import(&name)
    };
    let Some(mapped) = mapped else {
        return Ok(());
    };
    if mapped == name {
        return Ok(());
    }
    debug!(from = %name, to = %mapped, is_static, "rename import");
    let replacement = make::import(tree, mapped, is_static, asterisk);
    tree.set_leading_trivia(replacement, leading);
    tree.replace(id, replacement)?;
    ctx.record(RuleKind::ImportRename);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ImportKey {
    name: String,
    is_static: bool,
    asterisk: bool,
}

fn import_keys(tree: &Tree, items: &[NodeId]) -> Vec<(NodeId, ImportKey)> {
    items
        .iter()
        .filter_map(|id| {
            let import = tree.get(*id)?.as_import()?;
            Some((
                *id,
                ImportKey {
                    name: import.name(),
                    is_static: import.is_static(),
                    asterisk: import.is_asterisk(),
                },
            ))
        })
        .collect()
}

fn is_covered(existing: &HashSet<ImportKey>, pending: &PendingImport) -> bool {
    let exact = ImportKey {
        name: pending.name.clone(),
        is_static: pending.is_static,
        asterisk: false,
    };
    if existing.contains(&exact) {
        return true;
    }
    match pending.name.rsplit_once('.') {
        Some((owner, _)) => existing.contains(&ImportKey {
            name: owner.to_string(),
            is_static: pending.is_static,
            asterisk: true,
        }),
        None => false,
    }
}

/// Collapses duplicate imports and adds the imports the rules requested.
///
/// Returns the imports that were added, rendered as `name` or
/// `static name`.
pub fn merge_imports(tree: &mut Tree, ctx: &RewriteContext) -> Result<Vec<String>, TreeError> {
    let Some(root) = tree.root() else {
        return Ok(Vec::new());
    };
    let items = match tree.node(root)? {
        NodeKind::CompilationUnit(unit) => unit.items.clone(),
        _ => return Ok(Vec::new()),
    };

    let mut seen = HashSet::new();
    for (id, key) in import_keys(tree, &items) {
        if !seen.insert(key) {
            debug!(import = %id, "drop duplicate import");
            tree.remove(id)?;
        }
    }

    let missing: Vec<&PendingImport> = ctx
        .pending_imports()
        .iter()
        .filter(|pending| !is_covered(&seen, pending))
        .collect();
    if missing.is_empty() {
        return Ok(Vec::new());
    }

    let items = match tree.node(root)? {
        NodeKind::CompilationUnit(unit) => unit.items.clone(),
        _ => return Ok(Vec::new()),
    };
    let last_import = items
        .iter()
        .rposition(|id| tree.tag(*id) == Some(NodeTag::Import));
    let package = items
        .iter()
        .position(|id| tree.tag(*id) == Some(NodeTag::Package));

    let eol = ctx.line_ending();
    let blank_line = format!("{eol}{eol}");
    let (mut index, mut leading) = match (last_import, package) {
        (Some(last), _) => (last + 1, eol.to_string()),
        (None, Some(package)) => (package + 1, blank_line),
        (None, None) => match items.first() {
            Some(first) => {
                let taken = tree.take_leading_trivia(*first).unwrap_or_default();
                tree.set_leading_trivia(*first, blank_line);
                (0, taken)
            }
            None => (0, String::new()),
        },
    };

    let mut added = Vec::with_capacity(missing.len());
    let mut new_ids = Vec::with_capacity(missing.len());
    for pending in missing {
        let id = make::import(tree, &pending.name, pending.is_static, false);
        tree.set_leading_trivia(id, std::mem::replace(&mut leading, eol.to_string()));
        tree.set_parent(id, Some(root));
        new_ids.push(id);
        added.push(pending.to_string());
        debug!(import = %pending, "add import");
    }
    if let Some(NodeKind::CompilationUnit(unit)) = tree.get_mut(root) {
        for id in new_ids {
            unit.items.insert(index, id);
            index += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_java_cst::parse_compilation_unit;

    fn rename_all(source: &str) -> String {
        let rules = RuleTables::default();
        let mut ctx = RewriteContext::new("T.java");
        let mut tree = parse_compilation_unit(source).unwrap();
        let root = tree.root().unwrap();
        for id in tree.find_all(root, |kind| matches!(kind, NodeKind::Import(_))) {
            rename_import(&mut tree, id, &rules, &mut ctx).unwrap();
        }
        tree.to_source().unwrap()
    }

    fn merge(source: &str, requests: &[(&str, bool)]) -> (String, Vec<String>) {
        let mut ctx = RewriteContext::new("T.java");
        for (name, is_static) in requests {
            if *is_static {
                ctx.add_static_import(name);
            } else {
                ctx.add_import(name);
            }
        }
        let mut tree = parse_compilation_unit(source).unwrap();
        let added = merge_imports(&mut tree, &ctx).unwrap();
        (tree.to_source().unwrap(), added)
    }

    #[test]
    fn renames_type_and_static_imports() {
        assert_eq!(
            rename_all("import org.junit.Test;\nimport static org.junit.Assert.assertEquals;\n"),
            "import org.junit.jupiter.api.Test;\nimport static org.junit.jupiter.api.Assertions.assertEquals;\n"
        );
    }

    #[test]
    fn static_ness_selects_the_table() {
        // A static-table key imported as a type is left alone, and vice versa.
        let source = "import org.junit.Assert.assertEquals;\nimport static org.junit.Test;\n";
        assert_eq!(rename_all(source), source);
    }

    #[test]
    fn asterisk_is_kept() {
        assert_eq!(
            rename_all("import static org.junit.Assert.*;\nimport org.junit.*;\n"),
            "import static org.junit.jupiter.api.Assertions.*;\nimport org.junit.*;\n"
        );
    }

    #[test]
    fn unmapped_imports_are_untouched() {
        let source = "package p;\n\nimport java.util.List; // keep\nimport org.junit.runner.RunWith;\n";
        assert_eq!(rename_all(source), source);
    }

    #[test]
    fn merge_appends_after_last_import() {
        let (out, added) = merge(
            "import a.B;\n\nclass T {}\n",
            &[("org.junit.jupiter.api.DisplayName", false), ("java.time.Duration.ofMillis", true)],
        );
        assert_eq!(
            out,
            "import a.B;\nimport org.junit.jupiter.api.DisplayName;\nimport static java.time.Duration.ofMillis;\n\nclass T {}\n"
        );
        assert_eq!(
            added,
            vec!["org.junit.jupiter.api.DisplayName", "static java.time.Duration.ofMillis"]
        );
    }

    #[test]
    fn merge_skips_present_and_covered_imports() {
        let source = "import org.junit.jupiter.api.DisplayName;\nimport static org.junit.jupiter.api.Assertions.*;\nclass T {}\n";
        let (out, added) = merge(
            source,
            &[
                ("org.junit.jupiter.api.DisplayName", false),
                ("org.junit.jupiter.api.Assertions.assertThrows", true),
            ],
        );
        assert_eq!(out, source);
        assert!(added.is_empty());
    }

    #[test]
    fn merge_collapses_duplicates() {
        let (out, _) = merge(
            "import a.B;\nimport a.B;\nimport static a.B;\nclass T {}\n",
            &[],
        );
        assert_eq!(out, "import a.B;\nimport static a.B;\nclass T {}\n");
    }

    #[test]
    fn merge_after_package() {
        let (out, _) = merge("package p;\n\nclass T {}\n", &[("a.B", false), ("a.C", false)]);
        assert_eq!(out, "package p;\n\nimport a.B;\nimport a.C;\n\nclass T {}\n");
    }

    #[test]
    fn merge_at_top() {
        let (out, _) = merge("// header\nclass T {}\n", &[("a.B", false)]);
        assert_eq!(out, "// header\nimport a.B;\n\nclass T {}\n");
    }
}
