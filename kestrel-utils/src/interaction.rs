use kestrel_core::{Control, ControlStyle};

use crate::pagination::token::{build_control_id, control_operation};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfirmationAction {
    Confirm,
    Decline,
}

impl ConfirmationAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Decline => "decline",
        }
    }
}

pub fn build_confirmation_custom_id(nonce: &str, action: ConfirmationAction) -> String {
    build_control_id(nonce, action.as_str())
}

pub fn build_confirmation_controls(nonce: &str) -> Vec<Control> {
    vec![
        Control::new(
            build_confirmation_custom_id(nonce, ConfirmationAction::Confirm),
            "Confirm",
            ControlStyle::Danger,
        ),
        Control::new(
            build_confirmation_custom_id(nonce, ConfirmationAction::Decline),
            "Decline",
            ControlStyle::Secondary,
        ),
    ]
}

pub fn parse_confirmation_custom_id(custom_id: &str, nonce: &str) -> Option<ConfirmationAction> {
    match control_operation(custom_id, nonce)? {
        "confirm" => Some(ConfirmationAction::Confirm),
        "decline" => Some(ConfirmationAction::Decline),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_ids_are_namespaced() {
        let controls = build_confirmation_controls("n0nce");

        assert_eq!(controls[0].custom_id, "n0nce:confirm");
        assert_eq!(
            parse_confirmation_custom_id(&controls[1].custom_id, "n0nce"),
            Some(ConfirmationAction::Decline)
        );
        assert_eq!(parse_confirmation_custom_id("other:confirm", "n0nce"), None);
        assert_eq!(parse_confirmation_custom_id("n0nce:next", "n0nce"), None);
    }
}
