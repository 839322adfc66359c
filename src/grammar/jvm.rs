//! Gradle and Maven versions (`1.2.3`, `1.+`, `[1.0,2.0)`)
//!
//! Maven interval ranges are left alone; there is no unambiguous way to
//! move them.

use super::{RequirementGrammar, Separator, Syntax};
use crate::domain::{Ecosystem, Version};

static SYNTAX: Syntax = Syntax {
    operators: &[],
    separator: Separator::Comma,
    alternatives: None,
    bare_versions: true,
    wildcards: true,
    dual_bound: false,
};

/// Grammar shared by Gradle and Maven
pub struct JvmGrammar {
    ecosystem: Ecosystem,
}

impl JvmGrammar {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }
}

fn is_interval(text: &str) -> bool {
    text.trim_start().starts_with(['[', '('])
}

impl RequirementGrammar for JvmGrammar {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    fn syntax(&self) -> &'static Syntax {
        &SYNTAX
    }

    fn satisfied_by(&self, text: &str, version: &Version) -> Option<bool> {
        if is_interval(text) {
            return None;
        }
        crate::constraint::VersionReq::parse(text)
            .ok()
            .map(|req| req.matches(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_exact_and_dynamic() {
        let grammar = JvmGrammar::new(Ecosystem::Gradle);
        assert_eq!(grammar.rewrite("1.2.61", &v("1.3.0")).unwrap(), "1.3.0");
        assert_eq!(grammar.rewrite("1.+", &v("2.4.0")).unwrap(), "2.+");
        assert_eq!(grammar.rewrite("1.2.+", &v("1.4.0")).unwrap(), "1.4.+");
    }

    #[test]
    fn test_interval_left_alone() {
        let grammar = JvmGrammar::new(Ecosystem::Maven);
        assert!(grammar.rewrite("[1.0,2.0)", &v("2.1.0")).is_err());
        assert_eq!(grammar.satisfied_by("[1.0,2.0)", &v("1.5.0")), None);
    }

    #[test]
    fn test_snapshot_demands_prerelease() {
        let grammar = JvmGrammar::new(Ecosystem::Maven);
        assert!(grammar.requires_prerelease("2.0.0-SNAPSHOT"));
        assert!(!grammar.requires_prerelease("2.0.0.RELEASE"));
    }
}
