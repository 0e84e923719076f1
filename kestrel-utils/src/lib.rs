/// Generic embed page builders shared across commands.
pub mod embed;
/// Confirm/decline controls for component-confirmation flows.
pub mod interaction;
/// Paginator controller and its helpers.
pub mod pagination;
