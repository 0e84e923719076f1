//! Stable facade for pagination helpers used by command handlers.

use std::time::Duration;

/// Default lifetime of a paginator without navigation.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(300);

mod components;
mod page;
pub mod paginator;
pub mod respond;
pub mod token;

pub use components::{NEXT_LABEL, PREV_LABEL, build_nav_controls};
pub use page::{list_pages, next_cursor, page_window, prev_cursor, total_pages};
pub use paginator::{
    ClickFilter, Paginator, PaginatorError, PaginatorListener, PaginatorStatus, Step, only_actor,
};
pub use respond::{PAGINATION_WRONG_USER_MESSAGE, PaginatorHandle, schedule_expiry, send_paginator};
pub use token::{NavOperation, generate_nonce};
