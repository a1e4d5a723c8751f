//! Best-run and best-score selection
//!
//! Both selectors are pure. Direction semantics follow [`Direction`]:
//! only `"ascending"` prefers larger values.

use std::cmp::Ordering;

use crate::domain::entities::{
    Direction, RunRecord, ScoreResult, ScoreType, SubmissionRecord,
};

/// Outcome of top-N run selection
#[derive(Debug, Clone, PartialEq)]
pub enum RunSelection {
    /// The input contained no runs at all
    NoRunsFound,
    /// The first `min(N, len)` runs in ranked order (may be empty when N is 0)
    Top(Vec<RunRecord>),
}

impl RunSelection {
    pub fn runs(&self) -> &[RunRecord] {
        match self {
            RunSelection::NoRunsFound => &[],
            RunSelection::Top(runs) => runs,
        }
    }
}

/// Rank runs by `metric` and keep the first `top_n`
///
/// Sorting is stable, so runs with equal metric values keep their input
/// order. Runs without a numeric value for `metric` rank after all others.
pub fn best_runs(
    records: &[RunRecord],
    metric: &str,
    direction: &Direction,
    top_n: usize,
) -> RunSelection {
    if records.is_empty() {
        return RunSelection::NoRunsFound;
    }

    let mut ranked: Vec<&RunRecord> = records.iter().collect();
    ranked.sort_by(|a, b| compare_metric(a.metric(metric), b.metric(metric), direction));

    RunSelection::Top(ranked.into_iter().take(top_n).cloned().collect())
}

fn compare_metric(a: Option<f64>, b: Option<f64>, direction: &Direction) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if direction.higher_is_better() {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Effective score of a submission: private, else public, else the direction default
pub fn effective_score(record: &SubmissionRecord, direction: &Direction) -> f64 {
    record
        .private_score
        .or(record.public_score)
        .unwrap_or_else(|| direction.default_score())
}

/// Pick the submission with the best effective score
///
/// `"ascending"` selects the maximum, any other label the minimum. The first
/// occurrence wins ties. Returns `None` for an empty list.
pub fn best_submission(records: &[SubmissionRecord], direction: &Direction) -> Option<ScoreResult> {
    let mut best: Option<(&SubmissionRecord, f64)> = None;

    for record in records {
        let score = effective_score(record, direction);
        let better = match best {
            None => true,
            Some((_, current)) if direction.higher_is_better() => score > current,
            Some((_, current)) => score < current,
        };
        if better {
            best = Some((record, score));
        }
    }

    best.map(|(record, score)| ScoreResult {
        score,
        score_type: if record.private_score.is_some() {
            ScoreType::Private
        } else {
            ScoreType::Public
        },
    })
}
