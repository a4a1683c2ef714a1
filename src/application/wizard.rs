use crate::domain::draft::{DraftStatus, TransactionDraft};
use tracing::debug;

/// Pages of the transfer wizard, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    SelectDestination,
    EnterAmount,
    Review,
    Confirm,
    Done,
}

/// Sequences the wizard steps against the current draft.
///
/// Entering a step whose prerequisite data is missing is not an error: the
/// coordinator lands on the earliest unmet prerequisite instead, so the user
/// is walked back to whatever still needs filling in.
#[derive(Debug, Default)]
pub struct WizardCoordinator {
    current: WizardStep,
}

impl WizardCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    /// Moves toward `requested`, clamped to the furthest step the draft's
    /// data allows. Returns the step actually landed on.
    pub fn go_to(&mut self, requested: WizardStep, draft: &TransactionDraft) -> WizardStep {
        let ceiling = Self::furthest_reachable(draft);
        let landed = requested.min(ceiling);
        if landed != requested {
            debug!(?requested, ?landed, "redirected to unmet prerequisite");
        }
        self.current = landed;
        landed
    }

    /// Terminal transition, only after a successful submission.
    pub fn finish(&mut self) {
        self.current = WizardStep::Done;
    }

    pub fn reset(&mut self) {
        self.current = WizardStep::SelectDestination;
    }

    // `Done` is excluded: it is reachable only through `finish`.
    fn furthest_reachable(draft: &TransactionDraft) -> WizardStep {
        if !draft.has_recipient() {
            WizardStep::SelectDestination
        } else if !draft.has_amount() {
            WizardStep::EnterAmount
        } else if draft.status != DraftStatus::Confirmed {
            WizardStep::Review
        } else {
            WizardStep::Confirm
        }
    }
}
