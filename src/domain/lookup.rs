use crate::domain::{Pattern, Requirement};

/// One requirement matched by one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    /// The matched requirement.
    pub requirement: &'a Requirement,
    /// The pattern that matched it.
    pub pattern: &'a Pattern,
}

/// The result of matching a set of patterns against a manifest's
/// requirements.
///
/// Hits are ordered by requirement (manifest order) and then by pattern
/// (caller order). A requirement matched by two patterns therefore appears
/// twice, once per pattern.
#[derive(Debug, Clone)]
pub struct Lookup<'a> {
    patterns: &'a [Pattern],
    hits: Vec<Hit<'a>>,
    found: Vec<bool>,
}

impl<'a> Lookup<'a> {
    /// Matches every pattern against every requirement.
    #[must_use]
    pub fn run(requirements: &'a [Requirement], patterns: &'a [Pattern]) -> Self {
        let mut found = vec![false; patterns.len()];
        let mut hits = Vec::new();

        for requirement in requirements {
            for (i, pattern) in patterns.iter().enumerate() {
                if !pattern.matches(requirement.path()) {
                    continue;
                }
                found[i] = true;
                hits.push(Hit {
                    requirement,
                    pattern,
                });
            }
        }

        tracing::debug!(
            requirements = requirements.len(),
            patterns = patterns.len(),
            hits = hits.len(),
            "lookup complete"
        );

        Self {
            patterns,
            hits,
            found,
        }
    }

    /// The matches, in manifest order then pattern order.
    #[must_use]
    pub fn hits(&self) -> &[Hit<'a>] {
        &self.hits
    }

    /// One flag per pattern, in caller order: whether it matched anything.
    #[must_use]
    pub fn found(&self) -> &[bool] {
        &self.found
    }

    /// The patterns that matched nothing, in caller order.
    pub fn missing(&self) -> impl Iterator<Item = &'a Pattern> + '_ {
        self.patterns
            .iter()
            .zip(&self.found)
            .filter(|(_, found)| !**found)
            .map(|(pattern, _)| pattern)
    }

    /// Whether every pattern matched at least one requirement.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.found.iter().all(|found| *found)
    }
}
