//! Destructive-action confirmation.

use std::fmt;

use campus_model::ItemId;

/// What the user is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    /// Resource the items belong to (e.g. `courses`).
    pub resource: String,
    /// Items that will be deleted.
    pub ids: Vec<ItemId>,
}

impl ConfirmPrompt {
    /// Prompt for deleting `ids` from `resource`.
    pub fn delete(resource: impl Into<String>, ids: Vec<ItemId>) -> Self {
        Self {
            resource: resource.into(),
            ids,
        }
    }

    /// Number of items affected.
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

impl fmt::Display for ConfirmPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ids.as_slice() {
            [id] => write!(f, "Delete {} '{}'? This cannot be undone.", self.resource, id),
            ids => write!(
                f,
                "Delete {} {}? This cannot be undone.",
                ids.len(),
                self.resource
            ),
        }
    }
}

/// Source of user consent for destructive actions.
///
/// Any `FnMut(&ConfirmPrompt) -> bool` closure is a `Confirm`, so a UI
/// dialog and a test stub plug in the same way.
pub trait Confirm {
    /// Returns true when the user approves the action.
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmPrompt) -> bool,
{
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool {
        self(prompt)
    }
}
