//! Unified diffs for dry runs.
//!
//! Line differences come from the `difference` crate; this module only
//! groups them into hunks with three lines of context.

use difference::{Changeset, Difference};

const CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineTag {
    Same,
    Removed,
    Added,
}

impl LineTag {
    fn prefix(self) -> char {
        match self {
            LineTag::Same => ' ',
            LineTag::Removed => '-',
            LineTag::Added => '+',
        }
    }

    fn in_old(self) -> bool {
        self != LineTag::Added
    }

    fn in_new(self) -> bool {
        self != LineTag::Removed
    }
}

/// Renders the changes from `old` to `new` as a unified diff labelled with
/// `path`. Returns an empty string when the texts are equal.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let changeset = Changeset::new(old, new, "\n");
    let mut lines: Vec<(LineTag, &str)> = Vec::new();
    for diff in &changeset.diffs {
        let (tag, text) = match diff {
            Difference::Same(text) => (LineTag::Same, text),
            Difference::Rem(text) => (LineTag::Removed, text),
            Difference::Add(text) => (LineTag::Added, text),
        };
        lines.extend(text.split('\n').map(|line| (tag, line)));
    }
    // Both texts ending in a newline leave one empty segment behind.
    if matches!(lines.last(), Some((LineTag::Same, ""))) {
        lines.pop();
    }

    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for (index, (tag, _)) in lines.iter().enumerate() {
        if *tag == LineTag::Same {
            continue;
        }
        let start = index.saturating_sub(CONTEXT);
        let end = (index + CONTEXT + 1).min(lines.len());
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => hunks.push((start, end)),
        }
    }

    let mut out = format!("--- a/{}\n+++ b/{}\n", path, path);
    for (start, end) in hunks {
        let before = &lines[..start];
        let old_before = before.iter().filter(|(tag, _)| tag.in_old()).count();
        let new_before = before.iter().filter(|(tag, _)| tag.in_new()).count();
        let hunk = &lines[start..end];
        let old_count = hunk.iter().filter(|(tag, _)| tag.in_old()).count();
        let new_count = hunk.iter().filter(|(tag, _)| tag.in_new()).count();
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            hunk_start(old_before, old_count),
            old_count,
            hunk_start(new_before, new_count),
            new_count
        ));
        for (tag, text) in hunk {
            out.push(tag.prefix());
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

fn hunk_start(before: usize, count: usize) -> usize {
    if count == 0 {
        before
    } else {
        before + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_texts_produce_nothing() {
        assert_eq!(unified_diff("A.java", "a\n", "a\n"), "");
    }

    #[test]
    fn single_line_change() {
        let old = "import org.junit.Test;\n\nclass ATest {}\n";
        let new = "import org.junit.jupiter.api.Test;\n\nclass ATest {}\n";
        assert_eq!(
            unified_diff("ATest.java", old, new),
            "--- a/ATest.java\n+++ b/ATest.java\n@@ -1,3 +1,3 @@\n\
             -import org.junit.Test;\n+import org.junit.jupiter.api.Test;\n \n class ATest {}\n"
        );
    }

    #[test]
    fn distant_changes_get_separate_hunks() {
        let old: String = (1..=20).map(|i| format!("line {}\n", i)).collect();
        let new = old.replace("line 2\n", "line two\n").replace("line 19\n", "line nineteen\n");
        let diff = unified_diff("f", &old, &new);
        let headers: Vec<&str> = diff.lines().filter(|l| l.starts_with("@@")).collect();
        assert_eq!(headers, vec!["@@ -1,5 +1,5 @@", "@@ -16,5 +16,5 @@"]);
    }

    #[test]
    fn inserted_lines_count_only_in_new() {
        let old = "a\nb\n";
        let new = "a\nx\ny\nb\n";
        let diff = unified_diff("f", old, new);
        assert!(diff.contains("@@ -1,2 +1,4 @@"));
        assert!(diff.contains("+x\n+y\n"));
    }
}
