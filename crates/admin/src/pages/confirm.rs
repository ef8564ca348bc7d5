//! Pending-action state for the shared confirmation modal.
//!
//! The modal shows a message and waits; what happens on "confirm" is a
//! typed action held by the page, not a stored callback. Clicking outside
//! or cancelling drops the action unexecuted.

/// A confirmation waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<A> {
    message: String,
    action: A,
}

impl<A> Confirmation<A> {
    #[must_use]
    pub fn new(message: impl Into<String>, action: A) -> Self {
        Self {
            message: message.into(),
            action,
        }
    }

    /// The message shown in the modal body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the confirmation, yielding the action to execute.
    #[must_use]
    pub fn into_action(self) -> A {
        self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Action {
        Delete(i64),
    }

    #[test]
    fn test_confirmation_holds_typed_action() {
        let pending = Confirmation::new("Bạn có chắc chắn?", Action::Delete(7));
        assert_eq!(pending.message(), "Bạn có chắc chắn?");
        assert_eq!(pending.into_action(), Action::Delete(7));
    }
}
