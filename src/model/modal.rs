//! Overlay stack
//!
//! Only the top overlay receives key events; the form underneath keeps its
//! state while an overlay is open.

/// An overlay drawn above the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Quit confirmation
    QuitConfirm,
    /// Keyboard shortcuts
    Help,
}

/// Overlays in the order they were opened
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Open an overlay; reopening the one on top is a no-op
    pub fn push(&mut self, modal: Modal) {
        if self.top() != Some(modal) {
            self.stack.push(modal);
        }
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<Modal> {
        self.stack.last().copied()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::Help);
        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(Modal::QuitConfirm));

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::Help));
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_reopening_top_modal_does_not_stack() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Help);
        stack.push(Modal::Help);
        stack.pop();
        assert!(stack.top().is_none());
    }
}
