//! Property declarations shared between build files
//!
//! Gradle and Maven builds often declare a version once and reference it
//! from many places:
//! - Groovy: `ext.kotlin_version = '1.2.61'`, `def ver = "1.0"`
//! - Kotlin DSL: `val ktorVersion = "2.3.0"`, `extra["ver"] = "1.0"`
//! - `gradle.properties`: `kotlin_version=1.2.61`
//! - Maven: `<properties><junit.version>4.13</junit.version></properties>`
//!
//! Only the declaration line is ever rewritten; call sites keep their
//! `$name` reference.

use crate::domain::DependencyFile;
use regex::Regex;
use std::sync::LazyLock;

static ASSIGN_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:def|val|var)\s+|(?:(?:project|rootProject)\.)?ext\.)?([A-Za-z_][\w]*)\s*=\s*'([^'\n]*)'").unwrap()
});
static ASSIGN_DOUBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:(?:def|val|var)\s+|(?:(?:project|rootProject)\.)?ext\.)?([A-Za-z_][\w]*)\s*=\s*"([^"\n]*)""#).unwrap()
});
static KOTLIN_EXTRA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:project\.)?extra\["([\w.\-]+)"\]\s*=\s*"([^"\n]*)""#).unwrap()
});
static PROPERTIES_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w.\-]+)\s*[=:]\s*(\S(?:.*\S)?)\s*$").unwrap());
static XML_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([\w.\-]+)>\s*([^<\s][^<]*?)\s*</([\w.\-]+)>").unwrap());

/// One declaration of a property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    /// Property name without `project.`/`rootProject.`/`ext.` prefixes
    pub name: String,
    /// Declared value
    pub value: String,
    /// File the declaration lives in
    pub file: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Byte range of the value within the line
    value_range: (usize, usize),
}

/// All property declarations found in a set of files
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    declarations: Vec<PropertyDeclaration>,
}

impl PropertyTable {
    /// Scan files for declarations, in file order
    pub fn scan(files: &[DependencyFile]) -> Self {
        let declarations = files
            .iter()
            .flat_map(scan_file)
            .collect();
        Self { declarations }
    }

    pub fn declarations(&self) -> &[PropertyDeclaration] {
        &self.declarations
    }

    /// Find the declaration a reference from `callsite` resolves to
    ///
    /// The callsite's own file wins, then the nearest file in an enclosing
    /// directory, then the first file declaring the name. Two different
    /// values inside the winning file are an error.
    pub fn resolve(&self, name: &str, callsite: &str) -> Result<Option<&PropertyDeclaration>, String> {
        let name = normalize_name(name);
        let candidates: Vec<&PropertyDeclaration> =
            self.declarations.iter().filter(|d| d.name == name).collect();
        let Some(first) = candidates.first() else {
            return Ok(None);
        };

        let callsite_dir = directory_of(callsite);
        let winner = if candidates.iter().any(|d| d.file == callsite) {
            callsite.to_string()
        } else {
            candidates
                .iter()
                .filter(|d| is_ancestor(directory_of(&d.file), callsite_dir))
                .fold(None::<&&PropertyDeclaration>, |best, d| match best {
                    // ties keep the earlier file
                    Some(b) if directory_of(&b.file).len() >= directory_of(&d.file).len() => Some(b),
                    _ => Some(d),
                })
                .map(|d| d.file.clone())
                .unwrap_or_else(|| first.file.clone())
        };

        let in_winner: Vec<&PropertyDeclaration> =
            candidates.into_iter().filter(|d| d.file == winner).collect();
        if let Some(conflict) = in_winner.iter().find(|d| d.value != in_winner[0].value) {
            return Err(format!(
                "conflicting declarations of '{}' in {}: '{}' and '{}'",
                name, winner, in_winner[0].value, conflict.value
            ));
        }
        Ok(in_winner.first().copied())
    }
}

impl PropertyDeclaration {
    /// `content` with this declaration's value replaced, every other byte kept
    pub fn apply(&self, content: &str, new_value: &str) -> String {
        let mut result = String::with_capacity(content.len());
        for (idx, line) in content.split_inclusive('\n').enumerate() {
            if idx + 1 == self.line && line.get(self.value_range.0..self.value_range.1) == Some(self.value.as_str()) {
                result.push_str(&line[..self.value_range.0]);
                result.push_str(new_value);
                result.push_str(&line[self.value_range.1..]);
            } else {
                result.push_str(line);
            }
        }
        result
    }
}

fn normalize_name(name: &str) -> &str {
    let mut name = name.trim();
    for prefix in ["rootProject.", "project.", "ext."] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
        }
    }
    name
}

fn directory_of(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[..idx]).unwrap_or("")
}

fn is_ancestor(dir: &str, of: &str) -> bool {
    dir.is_empty() || dir == of || of.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

fn scan_file(file: &DependencyFile) -> Vec<PropertyDeclaration> {
    let is_properties = file.name.ends_with(".properties");
    let is_xml = file.name.ends_with(".xml");
    let mut declarations = Vec::new();
    let mut in_properties_block = false;

    for (idx, line) in file.content.lines().enumerate() {
        let found = if is_properties {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') || trimmed.starts_with('!') {
                None
            } else {
                PROPERTIES_LINE.captures(line)
            }
        } else if is_xml {
            if line.contains("<properties>") {
                in_properties_block = true;
            }
            let caps = XML_PROPERTY
                .captures(line)
                .filter(|c| in_properties_block && c.get(1).map(|m| m.as_str()) == c.get(3).map(|m| m.as_str()));
            if line.contains("</properties>") {
                in_properties_block = false;
            }
            caps
        } else {
            KOTLIN_EXTRA
                .captures(line)
                .or_else(|| ASSIGN_SINGLE.captures(line))
                .or_else(|| ASSIGN_DOUBLE.captures(line))
        };

        let Some(caps) = found else { continue };
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        declarations.push(PropertyDeclaration {
            name: normalize_name(name.as_str()).to_string(),
            value: value.as_str().to_string(),
            file: file.name.clone(),
            line: idx + 1,
            value_range: (value.start(), value.end()),
        });
    }

    declarations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<DependencyFile> {
        vec![
            DependencyFile::new(
                "build.gradle",
                "buildscript {\n    ext.kotlin_version = '1.2.61'\n    dependencies {\n        classpath \"org.jetbrains.kotlin:kotlin-gradle-plugin:$kotlin_version\"\n    }\n}\n",
            ),
            DependencyFile::new(
                "app/build.gradle",
                "dependencies {\n    implementation \"org.jetbrains.kotlin:kotlin-stdlib:${kotlin_version}\"\n}\n",
            ),
        ]
    }

    #[test]
    fn test_scan_groovy_ext() {
        let table = PropertyTable::scan(&files());
        assert_eq!(table.declarations().len(), 1);
        let decl = &table.declarations()[0];
        assert_eq!(decl.name, "kotlin_version");
        assert_eq!(decl.value, "1.2.61");
        assert_eq!(decl.line, 2);
    }

    #[test]
    fn test_resolve_from_subproject_uses_enclosing_file() {
        let table = PropertyTable::scan(&files());
        let decl = table.resolve("kotlin_version", "app/build.gradle").unwrap().unwrap();
        assert_eq!(decl.file, "build.gradle");
    }

    #[test]
    fn test_resolve_strips_prefixes() {
        let table = PropertyTable::scan(&files());
        assert!(table.resolve("rootProject.ext.kotlin_version", "build.gradle").unwrap().is_some());
        assert!(table.resolve("missing", "build.gradle").unwrap().is_none());
    }

    #[test]
    fn test_callsite_file_wins() {
        let files = vec![
            DependencyFile::new("gradle.properties", "kotlin_version=1.3.0\n"),
            DependencyFile::new("app/build.gradle", "def kotlin_version = \"1.2.0\"\n"),
        ];
        let table = PropertyTable::scan(&files);
        let decl = table.resolve("kotlin_version", "app/build.gradle").unwrap().unwrap();
        assert_eq!(decl.value, "1.2.0");
        let decl = table.resolve("kotlin_version", "other/build.gradle").unwrap().unwrap();
        assert_eq!(decl.value, "1.3.0");
    }

    #[test]
    fn test_same_depth_tie_keeps_first_file() {
        let files = vec![
            DependencyFile::new("gradle.properties", "kotlin_version=1.3.0\n"),
            DependencyFile::new("build.gradle", "ext.kotlin_version = '1.2.0'\n"),
        ];
        let table = PropertyTable::scan(&files);
        let decl = table.resolve("kotlin_version", "app/build.gradle").unwrap().unwrap();
        assert_eq!(decl.file, "gradle.properties");
        assert_eq!(decl.value, "1.3.0");
    }

    #[test]
    fn test_conflicting_declarations_in_one_file() {
        let files = vec![DependencyFile::new(
            "build.gradle",
            "ext.ver = '1.0.0'\next.ver = '2.0.0'\n",
        )];
        let table = PropertyTable::scan(&files);
        let err = table.resolve("ver", "build.gradle").unwrap_err();
        assert!(err.contains("conflicting"));
    }

    #[test]
    fn test_maven_properties_block() {
        let pom = "<project>\n  <properties>\n    <junit.version>4.13</junit.version>\n  </properties>\n  <version>1.0</version>\n</project>\n";
        let table = PropertyTable::scan(&[DependencyFile::new("pom.xml", pom)]);
        assert_eq!(table.declarations().len(), 1);
        assert_eq!(table.declarations()[0].name, "junit.version");
    }

    #[test]
    fn test_kotlin_dsl_declarations() {
        let script = "val ktorVersion = \"2.3.0\"\nextra[\"okhttp.version\"] = \"4.12.0\"\n";
        let table = PropertyTable::scan(&[DependencyFile::new("build.gradle.kts", script)]);
        let names: Vec<&str> = table.declarations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["ktorVersion", "okhttp.version"]);
    }

    #[test]
    fn test_apply_rewrites_only_the_declaration() {
        let files = files();
        let table = PropertyTable::scan(&files);
        let decl = &table.declarations()[0];
        let updated = decl.apply(&files[0].content, "1.3.0");
        assert!(updated.contains("ext.kotlin_version = '1.3.0'"));
        assert!(updated.contains("kotlin-gradle-plugin:$kotlin_version"));
        assert_eq!(updated.lines().count(), files[0].content.lines().count());
    }
}
