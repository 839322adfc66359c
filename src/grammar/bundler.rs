//! RubyGems requirements (`~> 1.2`, `>= 1.0, < 2.0`)

use super::{RequirementGrammar, Separator, Syntax};
use crate::domain::Ecosystem;

static SYNTAX: Syntax = Syntax {
    operators: &["~>", ">=", "<=", "!=", "=", ">", "<"],
    separator: Separator::Comma,
    alternatives: None,
    bare_versions: true,
    wildcards: false,
    dual_bound: false,
};

/// Grammar for Gemfile and gemspec requirements
pub struct BundlerGrammar;

impl RequirementGrammar for BundlerGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Bundler
    }

    fn syntax(&self) -> &'static Syntax {
        &SYNTAX
    }
}
