//! Label Transitions
//!
//! Pure decision logic shared by both reconcilers: given the CLA labels a
//! PR currently carries and the latest verdict, which labels to add and
//! which to remove.

use crate::github::{Label, StatusState};

use super::{CLA_NO, CLA_YES};

/// Terminal or in-progress outcome of the CLA check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pending,
    Success,
    /// Covers both `failure` and `error` statuses
    Failure,
}

impl Verdict {
    /// `None` for states GitHub does not define
    pub fn from_state(state: StatusState) -> Option<Self> {
        match state {
            StatusState::Pending => Some(Verdict::Pending),
            StatusState::Success => Some(Verdict::Success),
            StatusState::Failure | StatusState::Error => Some(Verdict::Failure),
            StatusState::Empty | StatusState::Unknown => None,
        }
    }
}

/// Which CLA labels a PR currently has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelState {
    pub has_yes: bool,
    pub has_no: bool,
}

impl LabelState {
    pub fn new(has_yes: bool, has_no: bool) -> Self {
        Self { has_yes, has_no }
    }

    pub fn from_labels(labels: &[Label]) -> Self {
        Self {
            has_yes: labels.iter().any(|l| l.name == CLA_YES),
            has_no: labels.iter().any(|l| l.name == CLA_NO),
        }
    }
}

/// Label mutations needed to converge a PR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub remove: Vec<&'static str>,
    pub add: Vec<&'static str>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Compute the mutations for `verdict` against `current`.
///
/// The verdict alone picks the target, so a PR carrying both labels ends up
/// with exactly the right one. Pending never changes anything.
pub fn transition(current: LabelState, verdict: Verdict) -> Transition {
    let (wanted, wanted_present, stale, stale_present) = match verdict {
        Verdict::Pending => return Transition::default(),
        Verdict::Success => (CLA_YES, current.has_yes, CLA_NO, current.has_no),
        Verdict::Failure => (CLA_NO, current.has_no, CLA_YES, current.has_yes),
    };

    let mut out = Transition::default();
    if stale_present {
        out.remove.push(stale);
    }
    if !wanted_present {
        out.add.push(wanted);
    }
    out
}
