//! Rewrites all requirements of one dependency to a target release

use super::{forms, property::PropertyTable, RequirementGrammar, UpdateStrategy};
use crate::domain::{Dependency, DependencyFile, PackageRelease, Requirement, Version};
use crate::error::EngineError;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Requirements and property files after a rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    pub requirements: Vec<Requirement>,
    /// Property-declaring files whose content changed
    pub files: Vec<DependencyFile>,
}

/// Moves requirement text to a target version using one ecosystem's grammar
pub struct RequirementRewriter<'a> {
    grammar: &'a dyn RequirementGrammar,
    strategy: UpdateStrategy,
    files: &'a [DependencyFile],
}

impl<'a> RequirementRewriter<'a> {
    pub fn new(grammar: &'a dyn RequirementGrammar, strategy: UpdateStrategy) -> Self {
        Self {
            grammar,
            strategy,
            files: &[],
        }
    }

    /// Files that may hold property declarations (builder pattern)
    pub fn with_files(mut self, files: &'a [DependencyFile]) -> Self {
        self.files = files;
        self
    }

    /// Rewrite a single requirement text; unrecognised text comes back unchanged
    pub fn rewrite_text(&self, text: &str, old: Option<&Version>, new: &Version) -> String {
        if old.is_some_and(|old| old.same_precedence(new)) {
            return text.to_string();
        }
        if self.strategy == UpdateStrategy::BumpVersionsIfNecessary
            && self.grammar.satisfied_by(text, new) == Some(true)
        {
            return text.to_string();
        }
        match self.grammar.rewrite(text, new) {
            Ok(updated) => updated,
            Err(_) => {
                debug!(requirement = text, target = %new, "No rewrite form matched");
                text.to_string()
            }
        }
    }

    /// Rewrite every requirement of `dependency` to `target`
    ///
    /// Symbolic requirements rewrite their declaration once, however many
    /// requirements refer to it.
    pub fn rewrite(
        &self,
        dependency: &Dependency,
        old: Option<&Version>,
        target: &PackageRelease,
    ) -> Result<RewriteOutput, EngineError> {
        let table = PropertyTable::scan(self.files);
        let mut contents: BTreeMap<String, String> = BTreeMap::new();
        let mut rewritten_declarations = HashSet::new();
        let mut requirements = Vec::with_capacity(dependency.requirements.len());

        for requirement in &dependency.requirements {
            let updated = if let Some(name) = requirement.property_name() {
                let declaration = table.resolve(name, &requirement.file).map_err(|reason| {
                    EngineError::unresolvable(&dependency.name, requirement.to_string(), reason)
                })?;

                match declaration {
                    Some(declaration) => {
                        let new_value = self.rewrite_text(&declaration.value, old, &target.version);
                        let key = (declaration.file.clone(), declaration.line);
                        if new_value != declaration.value && rewritten_declarations.insert(key) {
                            let current = contents
                                .get(&declaration.file)
                                .cloned()
                                .or_else(|| self.original_content(&declaration.file))
                                .unwrap_or_default();
                            contents.insert(declaration.file.clone(), declaration.apply(&current, &new_value));
                            debug!(
                                dependency = %dependency.name,
                                property = name,
                                file = %declaration.file,
                                line = declaration.line,
                                "Rewrote property declaration"
                            );
                        }
                        match &requirement.requirement {
                            Some(text) if *text == declaration.value => {
                                requirement.with_text(Some(new_value))
                            }
                            Some(text) => {
                                requirement.with_text(Some(self.rewrite_text(text, old, &target.version)))
                            }
                            None => requirement.clone(),
                        }
                    }
                    None => {
                        warn!(
                            dependency = %dependency.name,
                            property = name,
                            "Property declaration not found; rewriting requirement text only"
                        );
                        self.rewrite_plain(requirement, old, &target.version)
                    }
                }
            } else if let Some(old_ref) = requirement.pinned_ref() {
                match forms::rewrite_ref(old_ref, old, target) {
                    Ok(new_ref) => {
                        let text = requirement
                            .requirement
                            .as_ref()
                            .map(|t| t.replace(old_ref, &new_ref));
                        requirement.with_ref(new_ref).with_text(text)
                    }
                    Err(_) => requirement.clone(),
                }
            } else {
                self.rewrite_plain(requirement, old, &target.version)
            };
            requirements.push(updated);
        }

        let files = contents
            .into_iter()
            .map(|(name, content)| DependencyFile::new(name, content))
            .collect();
        Ok(RewriteOutput {
            requirements,
            files,
        })
    }

    fn rewrite_plain(&self, requirement: &Requirement, old: Option<&Version>, new: &Version) -> Requirement {
        match &requirement.requirement {
            Some(text) => requirement.with_text(Some(self.rewrite_text(text, old, new))),
            None => requirement.clone(),
        }
    }

    fn original_content(&self, name: &str) -> Option<String> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.clone())
    }
}
