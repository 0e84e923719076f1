//! Pagination UI component builders (previous/next buttons).

use kestrel_core::{Control, ControlStyle};

use super::token::{NavOperation, build_control_id};

pub const PREV_LABEL: &str = "⬅️";
pub const NEXT_LABEL: &str = "➡️";

/// Build previous/next button controls for a paginator.
pub fn build_nav_controls(nonce: &str) -> Vec<Control> {
    vec![
        Control::new(
            build_control_id(nonce, NavOperation::Prev.as_str()),
            PREV_LABEL,
            ControlStyle::Secondary,
        ),
        Control::new(
            build_control_id(nonce, NavOperation::Next.as_str()),
            NEXT_LABEL,
            ControlStyle::Secondary,
        ),
    ]
}
