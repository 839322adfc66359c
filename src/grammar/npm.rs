//! npm semver ranges (`^1.2.3`, `>=1.0.0 <2.0.0`, `^1.0.0 || ^2.0.0`)

use super::{RequirementGrammar, Separator, Syntax};
use crate::domain::Ecosystem;

static SYNTAX: Syntax = Syntax {
    operators: &[">=", "<=", "^", "~", ">", "<", "="],
    separator: Separator::Whitespace,
    alternatives: Some("||"),
    bare_versions: true,
    wildcards: true,
    dual_bound: false,
};

/// Grammar for package.json ranges
pub struct NpmGrammar;

impl RequirementGrammar for NpmGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn syntax(&self) -> &'static Syntax {
        &SYNTAX
    }
}
