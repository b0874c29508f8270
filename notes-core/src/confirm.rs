//! Confirmation before destructive actions.
//!
//! Front ends differ in how they ask (terminal dialog, stdin prompt), but the
//! delete flow only ever awaits a yes/no answer through [`Confirm`].

use async_trait::async_trait;

#[async_trait(?Send)]
pub trait Confirm {
    /// Ask the user; `true` means proceed.
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Answers every prompt the same way without asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assume(pub bool);

#[async_trait(?Send)]
impl Confirm for Assume {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        tracing::debug!(title, message, answer = self.0, "confirmation assumed");
        self.0
    }
}
