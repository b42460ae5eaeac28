//! Yes/no gate in front of destructive actions.

/// Outcome of a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Confirmed,
    Declined,
    /// Prompt closed without an answer.
    Dismissed,
}

impl ConfirmationDecision {
    /// Maps a tri-state UI answer; `None` means the prompt was dismissed.
    pub fn from_answer(answer: Option<bool>) -> Self {
        match answer {
            Some(true) => Self::Confirmed,
            Some(false) => Self::Declined,
            None => Self::Dismissed,
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

/// What the user is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest<'a> {
    pub reminder_id: &'a str,
    /// Title from the current projection, when known.
    pub title: Option<&'a str>,
    pub prompt: String,
}

impl<'a> ConfirmationRequest<'a> {
    pub fn delete(reminder_id: &'a str, title: Option<&'a str>) -> Self {
        let prompt = match title {
            Some(title) => format!("Are you sure you want to delete \"{title}\"?"),
            None => "Are you sure you want to delete this reminder?".to_string(),
        };
        Self {
            reminder_id,
            title,
            prompt,
        }
    }
}

/// Asks the user and blocks until a decision is made.
///
/// Only [`ConfirmationDecision::Confirmed`] lets the guarded action run.
pub trait ConfirmationGate {
    fn request(&mut self, request: &ConfirmationRequest<'_>) -> ConfirmationDecision;
}

impl<F> ConfirmationGate for F
where
    F: FnMut(&ConfirmationRequest<'_>) -> ConfirmationDecision,
{
    fn request(&mut self, request: &ConfirmationRequest<'_>) -> ConfirmationDecision {
        self(request)
    }
}

/// Gate that answers every request with the same decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDecision(pub ConfirmationDecision);

impl ConfirmationGate for FixedDecision {
    fn request(&mut self, _request: &ConfirmationRequest<'_>) -> ConfirmationDecision {
        self.0
    }
}
