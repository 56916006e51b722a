//! Command hints shown under the active screen.

use checkout_core::CheckoutStep;

/// One command the user can type, and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(
        key: &'static str,
        action: &'static str,
    ) -> Self {
        Self { key, action }
    }
}

/// Joins hints into a single status line.
pub fn build_status_bar(hints: &[KeyHint]) -> String {
    hints
        .iter()
        .map(|h| format!("{}: {}", h.key, h.action))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Hints for the screen of `step`, followed by the global ones.
pub fn hints_for(step: CheckoutStep) -> Vec<KeyHint> {
    let local: &[KeyHint] = match step {
        CheckoutStep::Product => &[hints::SELECT, hints::CONTINUE],
        CheckoutStep::Registration | CheckoutStep::Payment => {
            &[hints::EDIT, hints::NEXT, hints::BACK]
        }
        CheckoutStep::Confirmation => &[hints::CONFIRM, hints::BACK, hints::START],
    };
    local
        .iter()
        .chain(&[hints::STEP, hints::HELP, hints::QUIT])
        .copied()
        .collect()
}

pub mod hints {
    use super::KeyHint;

    pub const SELECT: KeyHint = KeyHint::new("<id>", "Select");
    pub const CONTINUE: KeyHint = KeyHint::new("next", "Continue");
    pub const EDIT: KeyHint = KeyHint::new("field=value", "Edit");
    pub const NEXT: KeyHint = KeyHint::new("next", "Next");
    pub const BACK: KeyHint = KeyHint::new("back", "Back");
    pub const CONFIRM: KeyHint = KeyHint::new("confirm", "Confirm");
    pub const START: KeyHint = KeyHint::new("start", "New purchase");
    pub const STEP: KeyHint = KeyHint::new("step N", "Jump");
    pub const HELP: KeyHint = KeyHint::new("help", "Help");
    pub const QUIT: KeyHint = KeyHint::new("quit", "Quit");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_bar_joins_hints() {
        assert_eq!(
            build_status_bar(&[hints::NEXT, hints::QUIT]),
            "next: Next | quit: Quit"
        );
    }

    #[test]
    fn every_screen_ends_with_the_global_hints() {
        for step in CheckoutStep::ALL {
            let shown = hints_for(step);
            assert_eq!(shown.last(), Some(&hints::QUIT));
        }
    }
}
