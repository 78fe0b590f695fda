//! Rule tables driving the JUnit 4 to JUnit 5 rewrite.
//!
//! The tables are plain data: qualified-name import renames (type and static
//! imports kept apart), simple annotation-name renames, runner classes with
//! their replacement extensions, and the assertion/assumption calls whose
//! message argument moves to the end.
//!
//! [`RuleTables::default`] returns the built-in JUnit tables. A JSON file can
//! override any subset of them; tables missing from the file keep their
//! defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Static import of the duration constructor used by `assertTimeout`.
pub const OF_MILLIS_IMPORT: &str = "java.time.Duration.ofMillis";
/// Static import of the bounded-execution assertion.
pub const ASSERT_TIMEOUT_IMPORT: &str = "org.junit.jupiter.api.Assertions.assertTimeout";
/// Static import of the must-throw assertion.
pub const ASSERT_THROWS_IMPORT: &str = "org.junit.jupiter.api.Assertions.assertThrows";
/// Type import for the annotation replacing `@RunWith`.
pub const EXTEND_WITH_IMPORT: &str = "org.junit.jupiter.api.extension.ExtendWith";
/// Type import for synthesized display names.
pub const DISPLAY_NAME_IMPORT: &str = "org.junit.jupiter.api.DisplayName";

const JUPITER_ASSERTIONS: &str = "org.junit.jupiter.api.Assertions";
const JUPITER_ASSUMPTIONS: &str = "org.junit.jupiter.api.Assumptions";

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("cannot read rule tables from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule tables in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only mappings consulted by the rewrite rules.
///
/// Built once per process and shared by reference; nothing in a conversion
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// Non-static imports: qualified name to qualified name.
    pub type_imports: BTreeMap<String, String>,
    /// Static imports (members and asterisk owners): qualified name to
    /// qualified name.
    pub static_imports: BTreeMap<String, String>,
    /// Simple annotation names renamed to marker annotations.
    pub annotations: BTreeMap<String, String>,
    /// Runner class simple name to the simple name of its extension.
    pub runners: BTreeMap<String, String>,
    /// Assertion or assumption method name to the qualified class its calls
    /// bind to.
    pub calls: BTreeMap<String, String>,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::junit4_to_junit5()
    }
}

impl RuleTables {
    /// The built-in JUnit 4 to JUnit 5 tables.
    pub fn junit4_to_junit5() -> Self {
        let type_imports = table(&[
            ("org.junit.Test", "org.junit.jupiter.api.Test"),
            ("org.junit.Before", "org.junit.jupiter.api.BeforeEach"),
            ("org.junit.BeforeClass", "org.junit.jupiter.api.BeforeAll"),
            ("org.junit.After", "org.junit.jupiter.api.AfterEach"),
            ("org.junit.AfterClass", "org.junit.jupiter.api.AfterAll"),
            ("org.junit.Ignore", "org.junit.jupiter.api.Disabled"),
            ("org.junit.Assert", JUPITER_ASSERTIONS),
            ("org.junit.Assume", JUPITER_ASSUMPTIONS),
            (
                "org.springframework.test.context.junit4.SpringRunner",
                "org.springframework.test.context.junit.jupiter.SpringExtension",
            ),
            (
                "org.springframework.test.context.junit4.SpringJUnit4ClassRunner",
                "org.springframework.test.context.junit.jupiter.SpringExtension",
            ),
            (
                "org.mockito.junit.MockitoJUnitRunner",
                "org.mockito.junit.jupiter.MockitoExtension",
            ),
            (
                "org.mockito.runners.MockitoJUnitRunner",
                "org.mockito.junit.jupiter.MockitoExtension",
            ),
        ]);

        let mut static_imports = table(&[
            ("org.junit.Assert", JUPITER_ASSERTIONS),
            ("org.junit.Assume", JUPITER_ASSUMPTIONS),
            ("org.junit.Assert.assertThat", "org.hamcrest.MatcherAssert.assertThat"),
        ]);
        for method in [
            "assertTrue",
            "assertFalse",
            "assertEquals",
            "assertNotEquals",
            "assertArrayEquals",
            "assertNotNull",
            "assertNull",
            "assertSame",
            "assertNotSame",
            "fail",
        ] {
            static_imports.insert(
                format!("org.junit.Assert.{}", method),
                format!("{}.{}", JUPITER_ASSERTIONS, method),
            );
        }
        for method in ["assumeTrue", "assumeFalse"] {
            static_imports.insert(
                format!("org.junit.Assume.{}", method),
                format!("{}.{}", JUPITER_ASSUMPTIONS, method),
            );
        }

        let annotations = table(&[
            ("Before", "BeforeEach"),
            ("BeforeClass", "BeforeAll"),
            ("After", "AfterEach"),
            ("AfterClass", "AfterAll"),
        ]);

        let runners = table(&[
            ("SpringRunner", "SpringExtension"),
            ("SpringJUnit4ClassRunner", "SpringExtension"),
            ("MockitoJUnitRunner", "MockitoExtension"),
        ]);

        let mut calls = BTreeMap::new();
        for method in ["assumeTrue", "assumeFalse"] {
            calls.insert(method.to_string(), JUPITER_ASSUMPTIONS.to_string());
        }
        for method in [
            "assertTrue",
            "assertFalse",
            "assertNotNull",
            "assertArrayEquals",
            "assertEquals",
            "assertNotEquals",
        ] {
            calls.insert(method.to_string(), JUPITER_ASSERTIONS.to_string());
        }

        RuleTables {
            type_imports,
            static_imports,
            annotations,
            runners,
            calls,
        }
    }

    /// Parses tables from JSON. Tables the JSON leaves out keep their
    /// built-in contents.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads tables from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, RulesError> {
        let text = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| RulesError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn type_import(&self, name: &str) -> Option<&str> {
        self.type_imports.get(name).map(String::as_str)
    }

    pub fn static_import(&self, name: &str) -> Option<&str> {
        self.static_imports.get(name).map(String::as_str)
    }

    pub fn annotation(&self, simple_name: &str) -> Option<&str> {
        self.annotations.get(simple_name).map(String::as_str)
    }

    /// The extension replacing runner class `simple_name`.
    pub fn runner_extension(&self, simple_name: &str) -> Option<&str> {
        self.runners.get(simple_name).map(String::as_str)
    }

    /// The qualified class a call named `method` binds to.
    pub fn call_binding(&self, method: &str) -> Option<&str> {
        self.calls.get(method).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_cover_junit_imports() {
        let rules = RuleTables::default();
        assert_eq!(
            rules.type_import("org.junit.Before"),
            Some("org.junit.jupiter.api.BeforeEach")
        );
        assert_eq!(
            rules.static_import("org.junit.Assert.assertEquals"),
            Some("org.junit.jupiter.api.Assertions.assertEquals")
        );
        assert_eq!(
            rules.static_import("org.junit.Assert.assertThat"),
            Some("org.hamcrest.MatcherAssert.assertThat")
        );
        assert_eq!(rules.type_import("org.junit.Assert.assertEquals"), None);
        assert_eq!(rules.static_import("org.junit.Test"), None);
    }

    #[test]
    fn static_and_type_tables_are_distinct() {
        let rules = RuleTables::default();
        for key in rules.static_imports.keys() {
            if key.starts_with("org.junit.Assert.") || key.starts_with("org.junit.Assume.") {
                assert!(rules.type_import(key).is_none(), "{key}");
            }
        }
    }

    #[test]
    fn call_bindings() {
        let rules = RuleTables::default();
        assert_eq!(
            rules.call_binding("assumeTrue"),
            Some("org.junit.jupiter.api.Assumptions")
        );
        assert_eq!(
            rules.call_binding("assertNotEquals"),
            Some("org.junit.jupiter.api.Assertions")
        );
        assert_eq!(rules.call_binding("assertNull"), None);
        assert_eq!(rules.call_binding("assertSame"), None);
        assert_eq!(rules.calls.len(), 8);
    }

    #[test]
    fn runners_and_annotations() {
        let rules = RuleTables::default();
        assert_eq!(rules.runner_extension("SpringRunner"), Some("SpringExtension"));
        assert_eq!(
            rules.runner_extension("SpringJUnit4ClassRunner"),
            Some("SpringExtension")
        );
        assert_eq!(rules.runner_extension("Parameterized"), None);
        assert_eq!(rules.annotation("AfterClass"), Some("AfterAll"));
        assert_eq!(rules.annotation("Test"), None);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let rules =
            RuleTables::from_json_str(r#"{ "annotations": { "Before": "Setup" } }"#).unwrap();
        assert_eq!(rules.annotation("Before"), Some("Setup"));
        assert_eq!(rules.annotation("After"), None);
        assert_eq!(rules.type_imports, RuleTables::default().type_imports);
    }

    #[test]
    fn json_round_trips() {
        let rules = RuleTables::default();
        let json = rules.to_json().to_string();
        assert_eq!(RuleTables::from_json_str(&json).unwrap(), rules);
    }

    #[test]
    fn from_json_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{ not json").unwrap();
        match RuleTables::from_json_file(&path).unwrap_err() {
            RulesError::Json { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected {:?}", other),
        }
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            RuleTables::from_json_file(&missing),
            Err(RulesError::Io { .. })
        ));
    }

    #[test]
    fn tables_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleTables>();
    }
}
