//! Elm package constraints (`1.0.0 <= v < 2.0.0`) and exact versions

use super::{RequirementGrammar, Separator, Syntax};
use crate::domain::Ecosystem;

static SYNTAX: Syntax = Syntax {
    operators: &[],
    separator: Separator::Whitespace,
    alternatives: None,
    bare_versions: true,
    wildcards: false,
    dual_bound: true,
};

/// Grammar for elm.json constraints
pub struct ElmGrammar;

impl RequirementGrammar for ElmGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Elm
    }

    fn syntax(&self) -> &'static Syntax {
        &SYNTAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_application_exact_version() {
        assert_eq!(ElmGrammar.rewrite("1.0.5", &v("1.1.0")).unwrap(), "1.1.0");
    }

    #[test]
    fn test_dual_bound_moves_upper() {
        assert_eq!(
            ElmGrammar.rewrite("1.0.0 <= v < 2.0.0", &v("2.0.0")).unwrap(),
            "1.0.0 <= v < 3.0.0"
        );
    }

    #[test]
    fn test_satisfied_by_dual_bound() {
        assert_eq!(ElmGrammar.satisfied_by("1.0.0 <= v < 2.0.0", &v("1.9.9")), Some(true));
        assert_eq!(ElmGrammar.satisfied_by("1.0.0 <= v < 2.0.0", &v("2.0.0")), Some(false));
    }
}
