//! Per-file index of recorded failures keyed by their exact source range.

use std::collections::HashMap;

use crate::failure::Failure;

/// A failure annotated with whether it can be fixed automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub failure: Failure,
    pub fixable: bool,
}

impl Problem {
    pub fn new(failure: Failure) -> Self {
        let fixable = failure.is_fixable();
        Self { failure, fixable }
    }

    /// Rule name of the underlying failure, or an empty string.
    pub fn rule_name(&self) -> &str {
        self.failure.rule()
    }
}

/// Maps `(start, end)` to the single problem recorded for that range.
///
/// Lookup is exact: a query only hits when it uses the same start and end the
/// failure was recorded with.
#[derive(Debug, Default, Clone)]
pub struct ProblemStore {
    problems: HashMap<(u32, u32), Problem>,
}

impl ProblemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `problem` for the range, replacing any previous entry.
    pub fn set(&mut self, start: u32, end: u32, problem: Problem) {
        self.problems.insert((start, end), problem);
    }

    pub fn get(&self, start: u32, end: u32) -> Option<&Problem> {
        self.problems.get(&(start, end))
    }

    pub fn values(&self) -> impl Iterator<Item = &Problem> {
        self.problems.values()
    }

    /// Fixable problems whose failure was produced by `rule_name`.
    pub fn fixable_for_rule<'a>(&'a self, rule_name: &'a str) -> impl Iterator<Item = &'a Problem> {
        self.values()
            .filter(move |p| p.fixable && p.rule_name() == rule_name)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
