//! Self-expiring, circular paginator state machine.
//!
//! [`Paginator`] holds no transport: [`Paginator::handle`] decides what an
//! event means for the session and returns a [`Step`]. [`PaginatorListener`]
//! registers it with a listener registry and performs the resulting edits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use kestrel_core::{
    ButtonClick, Control, Event, InteractionHandle, Listener, ListenerControl, MessageHandle, Page,
    Transport, TransportError,
};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::components::build_nav_controls;
use super::page::{next_cursor, prev_cursor};
use super::respond::PAGINATION_WRONG_USER_MESSAGE;
use super::token::{NavOperation, generate_nonce, parse_nav_control_id};

/// Predicate deciding which clicks may navigate a paginator.
pub type ClickFilter = Arc<dyn Fn(&ButtonClick) -> bool + Send + Sync>;

#[derive(Debug, Error)]
pub enum PaginatorError {
    #[error("a paginator needs at least one page")]
    NoPages,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginatorStatus {
    Active,
    /// Terminal: no further transitions.
    Expired,
}

/// What the paginator wants done after seeing an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Not a click; nothing changed.
    Ignore,
    /// A click whose control id is not one of this paginator's; nothing changed.
    Unmatched { component_id: String },
    /// A click for this paginator from an actor the filter rejects.
    Rejected(InteractionHandle),
    /// The cursor moved: render `page` with `controls` through `interaction`.
    Render {
        page: Page,
        controls: Vec<Control>,
        interaction: InteractionHandle,
    },
    /// The paginator is expired and must be detached.
    Expired,
}

#[derive(Debug)]
struct State {
    cursor: usize,
    expires_at: Instant,
    status: PaginatorStatus,
}

/// Accept clicks from a single user only.
pub fn only_actor(user_id: u64) -> impl Fn(&ButtonClick) -> bool + Send + Sync + 'static {
    move |click| click.actor == user_id
}

pub struct Paginator {
    nonce: String,
    pages: Vec<Page>,
    duration: Duration,
    filter: ClickFilter,
    state: Mutex<State>,
}

impl Paginator {
    /// Create a paginator over `pages` that expires `duration` after the last
    /// accepted navigation.
    pub fn new(pages: Vec<Page>, duration: Duration) -> Result<Self, PaginatorError> {
        if pages.is_empty() {
            return Err(PaginatorError::NoPages);
        }

        Ok(Self {
            nonce: generate_nonce(),
            pages,
            duration,
            filter: Arc::new(|_| true),
            state: Mutex::new(State {
                cursor: 0,
                expires_at: Instant::now() + duration,
                status: PaginatorStatus::Active,
            }),
        })
    }

    /// Restrict navigation to clicks accepted by `filter`.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ButtonClick) -> bool + Send + Sync + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn cursor(&self) -> usize {
        self.state().cursor
    }

    pub fn expires_at(&self) -> Instant {
        self.state().expires_at
    }

    pub fn status(&self) -> PaginatorStatus {
        self.state().status
    }

    pub fn is_expired(&self) -> bool {
        self.status() == PaginatorStatus::Expired
    }

    /// Page at the current cursor.
    pub fn current_page(&self) -> &Page {
        &self.pages[self.cursor()]
    }

    /// Navigation controls namespaced by this paginator's nonce.
    pub fn controls(&self) -> Vec<Control> {
        build_nav_controls(&self.nonce)
    }

    /// Move to `Expired`. Idempotent.
    pub fn expire(&self) {
        self.state().status = PaginatorStatus::Expired;
    }

    /// Expire when the deadline has passed. Returns whether the paginator is
    /// expired afterwards.
    pub fn expire_if_due(&self) -> bool {
        let mut state = self.state();
        if state.status == PaginatorStatus::Active && Instant::now() >= state.expires_at {
            state.status = PaginatorStatus::Expired;
        }
        state.status == PaginatorStatus::Expired
    }

    /// Current deadline while active.
    pub fn active_deadline(&self) -> Option<Instant> {
        let state = self.state();
        (state.status == PaginatorStatus::Active).then_some(state.expires_at)
    }

    /// Apply one delivered event.
    ///
    /// Expiry is checked first for every event. Only clicks carrying this
    /// paginator's nonce and passing the filter move the cursor and re-arm the
    /// deadline.
    pub fn handle(&self, event: &Event) -> Step {
        if self.expire_if_due() {
            return Step::Expired;
        }

        let Event::ButtonClicked(click) = event else {
            return Step::Ignore;
        };

        let Some(operation) = parse_nav_control_id(&click.component_id, &self.nonce) else {
            return Step::Unmatched {
                component_id: click.component_id.clone(),
            };
        };

        if !(self.filter)(click) {
            return Step::Rejected(click.interaction.clone());
        }

        let mut state = self.state();
        if state.status == PaginatorStatus::Expired {
            return Step::Expired;
        }

        let len = self.pages.len();
        state.cursor = match operation {
            NavOperation::Next => next_cursor(state.cursor, len),
            NavOperation::Prev => prev_cursor(state.cursor, len),
        };
        state.expires_at = Instant::now() + self.duration;

        Step::Render {
            page: self.pages[state.cursor].clone(),
            controls: self.controls(),
            interaction: click.interaction.clone(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry-facing wrapper that renders a [`Paginator`]'s steps.
pub struct PaginatorListener {
    paginator: Arc<Paginator>,
    transport: Arc<dyn Transport>,
}

impl PaginatorListener {
    pub fn new(paginator: Arc<Paginator>, transport: Arc<dyn Transport>) -> Self {
        Self {
            paginator,
            transport,
        }
    }
}

#[async_trait]
impl Listener for PaginatorListener {
    async fn on_event(&self, event: &Event) -> ListenerControl {
        match self.paginator.handle(event) {
            Step::Ignore => ListenerControl::Continue,
            Step::Unmatched { component_id } => {
                debug!(nonce = %self.paginator.nonce(), %component_id, "ignoring click for another control");
                ListenerControl::Continue
            }
            Step::Rejected(interaction) => {
                if let Err(source) = self
                    .transport
                    .respond_ephemeral(&interaction, PAGINATION_WRONG_USER_MESSAGE)
                    .await
                {
                    debug!(?source, nonce = %self.paginator.nonce(), "failed to notify rejected actor");
                }
                ListenerControl::Continue
            }
            Step::Render {
                page,
                controls,
                interaction,
            } => {
                let message = MessageHandle::Component(interaction);
                match self.transport.edit_message(&message, &page, &controls).await {
                    Ok(()) => ListenerControl::Continue,
                    Err(source) => {
                        warn!(
                            ?source,
                            nonce = %self.paginator.nonce(),
                            cursor = self.paginator.cursor(),
                            "paginator render failed, expiring"
                        );
                        self.paginator.expire();
                        ListenerControl::Detach
                    }
                }
            }
            Step::Expired => {
                debug!(nonce = %self.paginator.nonce(), "paginator expired");
                ListenerControl::Detach
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::Ready;

    fn pages(names: &[&str]) -> Vec<Page> {
        names.iter().map(|name| Page::text(*name)).collect()
    }

    fn click(id: String, actor: u64) -> Event {
        Event::ButtonClicked(ButtonClick {
            component_id: id,
            actor,
            channel_id: Some(10),
            interaction: InteractionHandle::new(1, 2, "tok"),
        })
    }

    fn rendered(step: Step) -> Page {
        match step {
            Step::Render { page, .. } => page,
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_empty_page_list() {
        assert!(matches!(
            Paginator::new(Vec::new(), Duration::from_secs(5)),
            Err(PaginatorError::NoPages)
        ));
    }

    #[tokio::test]
    async fn next_and_prev_wrap_around() {
        let paginator = Paginator::new(pages(&["A", "B", "C"]), Duration::from_secs(5)).unwrap();
        let next = format!("{}:next", paginator.nonce());
        let prev = format!("{}:prev", paginator.nonce());

        for expected in [1, 2, 0] {
            paginator.handle(&click(next.clone(), 1));
            assert_eq!(paginator.cursor(), expected);
        }
        for expected in [2, 1, 0] {
            paginator.handle(&click(prev.clone(), 1));
            assert_eq!(paginator.cursor(), expected);
        }
    }

    #[tokio::test]
    async fn render_carries_page_and_controls() {
        let paginator = Paginator::new(pages(&["A", "B"]), Duration::from_secs(5)).unwrap();
        let step = paginator.handle(&click(format!("{}:next", paginator.nonce()), 1));

        let Step::Render { page, controls, .. } = step else {
            panic!("expected render");
        };
        assert_eq!(page, Page::text("B"));
        let ids: Vec<String> = controls.into_iter().map(|c| c.custom_id).collect();
        assert_eq!(
            ids,
            vec![
                format!("{}:prev", paginator.nonce()),
                format!("{}:next", paginator.nonce())
            ]
        );
    }

    #[tokio::test]
    async fn foreign_and_non_click_events_are_ignored() {
        let paginator = Paginator::new(pages(&["A", "B"]), Duration::from_secs(5)).unwrap();
        let ready = Event::Ready(Ready {
            application_id: 1,
            user_name: "k".to_owned(),
            shard: None,
        });

        assert_eq!(paginator.handle(&ready), Step::Ignore);
        assert_eq!(
            paginator.handle(&click("other:next".to_owned(), 1)),
            Step::Unmatched {
                component_id: "other:next".to_owned()
            }
        );
        let jump = format!("{}:jump", paginator.nonce());
        assert_eq!(
            paginator.handle(&click(jump.clone(), 1)),
            Step::Unmatched { component_id: jump }
        );
        assert_eq!(paginator.cursor(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_rejection_changes_nothing() {
        let paginator = Paginator::new(pages(&["A", "B"]), Duration::from_secs(5))
            .unwrap()
            .with_filter(only_actor(7));
        let before = paginator.expires_at();

        tokio::time::advance(Duration::from_secs(2)).await;
        let step = paginator.handle(&click(format!("{}:next", paginator.nonce()), 8));

        assert!(matches!(step, Step::Rejected(_)));
        assert_eq!(paginator.cursor(), 0);
        assert_eq!(paginator.expires_at(), before);

        assert_eq!(
            rendered(paginator.handle(&click(format!("{}:next", paginator.nonce()), 7))),
            Page::text("B")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn expires_on_first_event_after_deadline() {
        let paginator = Paginator::new(pages(&["A", "B"]), Duration::from_secs(5)).unwrap();
        let next = format!("{}:next", paginator.nonce());

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(paginator.handle(&click(next.clone(), 1)), Step::Expired);
        assert!(paginator.is_expired());
        // No resurrection.
        assert_eq!(paginator.handle(&click(next, 1)), Step::Expired);
        assert_eq!(paginator.cursor(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_re_arms_the_deadline() {
        let paginator = Paginator::new(pages(&["A", "B"]), Duration::from_secs(4)).unwrap();
        let next = format!("{}:next", paginator.nonce());

        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(2)).await;
            assert!(matches!(
                paginator.handle(&click(next.clone(), 1)),
                Step::Render { .. }
            ));
            assert_eq!(paginator.expires_at(), Instant::now() + Duration::from_secs(4));
        }
        assert!(!paginator.is_expired());
    }

    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn listener_logs_unmatched_clicks() {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer({
                let logs = Arc::clone(&logs);
                move || LogBuffer(Arc::clone(&logs))
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let paginator = Arc::new(Paginator::new(pages(&["A", "B"]), Duration::from_secs(5)).unwrap());
        let listener = PaginatorListener::new(
            Arc::clone(&paginator),
            Arc::new(kestrel_core::testing::MockTransport::new()),
        );

        let control = listener.on_event(&click("other:next".to_owned(), 1)).await;

        assert_eq!(control, ListenerControl::Continue);
        let logs = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("ignoring click for another control"));
        assert!(logs.contains("other:next"));
    }
}
