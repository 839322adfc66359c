//! PEP 440 specifiers (`==1.2.3`, `~=1.4`, `>=1.0,<2.0`)

use super::{RequirementGrammar, Separator, Syntax};
use crate::domain::Ecosystem;

static SYNTAX: Syntax = Syntax {
    operators: &["===", "==", "~=", "!=", ">=", "<=", ">", "<"],
    separator: Separator::Comma,
    alternatives: None,
    bare_versions: false,
    wildcards: true,
    dual_bound: false,
};

/// Grammar for requirements.txt / pyproject specifiers
pub struct PipGrammar;

impl RequirementGrammar for PipGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pip
    }

    fn syntax(&self) -> &'static Syntax {
        &SYNTAX
    }
}
