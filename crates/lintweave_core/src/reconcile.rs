//! Reconciliation of replacements proposed by different failures.

use tracing::{debug, warn};

use crate::failure::{Failure, Replacement};

/// Returns the replacements of the largest greedy, non-conflicting subset of
/// `failures`, in one left-to-right pass.
///
/// Failures are ordered by the start of their first replacement; ties keep the
/// input order, which decides which of two conflicting fixes wins. A failure is
/// skipped as a whole when the last accepted replacement ends at or after its
/// first replacement's start. Touching ranges therefore count as overlapping,
/// which also rejects some adjacent edits that would be safe to combine.
pub fn non_overlapping_replacements<'a, I>(failures: I) -> Vec<Replacement>
where
    I: IntoIterator<Item = &'a Failure>,
{
    let mut candidates: Vec<&[Replacement]> = failures
        .into_iter()
        .map(Failure::replacements)
        .filter(|replacements| !replacements.is_empty())
        .collect();

    // `sort_by_key` is stable
    candidates.sort_by_key(|replacements| replacements[0].start);

    let mut accepted: Vec<Replacement> = Vec::new();
    for replacements in candidates {
        let first = &replacements[0];
        if let Some(last) = accepted.last()
            && last.end() >= first.start
        {
            debug!(
                "Skipping overlapping fix at [{}, {}]",
                first.start,
                first.end()
            );
            continue;
        }
        accepted.extend(replacements.iter().cloned());
    }

    accepted
}

/// Result of applying replacements to text.
#[derive(Debug)]
pub struct AppliedFixes {
    /// Number of replacements applied.
    pub applied: usize,
    /// The fixed content.
    pub content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

/// Applies an already reconciled batch of replacements to `content`.
///
/// Replacements are applied from the end of the text to the beginning so that
/// earlier offsets stay valid. Out-of-range replacements are skipped.
pub fn apply_replacements(content: &str, replacements: &[Replacement]) -> AppliedFixes {
    let mut sorted: Vec<&Replacement> = replacements.iter().collect();
    sorted.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = content.to_string();
    let mut applied = 0;

    for replacement in sorted {
        let start = replacement.start as usize;
        let end = replacement.end() as usize;

        if end > result.len() || !result.is_char_boundary(start) || !result.is_char_boundary(end)
        {
            warn!(
                "Invalid replacement: start={}, end={}, content_len={}",
                start,
                end,
                result.len()
            );
            continue;
        }

        result.replace_range(start..end, &replacement.text);
        applied += 1;
    }

    AppliedFixes {
        applied,
        modified: applied > 0,
        content: result,
    }
}
