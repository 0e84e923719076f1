use std::sync::Arc;
use std::time::Duration;

use kestrel_core::testing::{MockTransport, Recorded};
use kestrel_core::{
    ButtonClick, Context, Event, InteractionHandle, ListenerRegistry, MessageHandle, Page,
    ReplyTarget,
};
use kestrel_utils::pagination::{
    PAGINATION_WRONG_USER_MESSAGE, Paginator, PaginatorError, PaginatorHandle, only_actor,
    send_paginator,
};

const DURATION: Duration = Duration::from_secs(5);

fn context() -> (Context, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let ctx = Context::new(transport.clone(), ListenerRegistry::new(), (0, 1));
    (ctx, transport)
}

fn pages(names: &[&str]) -> Vec<Page> {
    names.iter().map(|name| Page::text(*name)).collect()
}

fn click(handle: &PaginatorHandle, operation: &str, actor: u64) -> Event {
    Event::ButtonClicked(ButtonClick {
        component_id: format!("{}:{operation}", handle.paginator().nonce()),
        actor,
        channel_id: Some(10),
        interaction: InteractionHandle::new(1, 99, "click-token"),
    })
}

/// Let listener workers and timers run.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

async fn send(ctx: &Context, names: &[&str]) -> PaginatorHandle {
    let paginator = Paginator::new(pages(names), DURATION).unwrap();
    send_paginator(ctx, ReplyTarget::Channel(10), paginator)
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn navigates_circularly_end_to_end() {
    let (ctx, transport) = context();
    let handle = send(&ctx, &["A", "B", "C"]).await;

    let Recorded::Sent { page, controls, .. } = &transport.calls()[0] else {
        panic!("first call must be the initial send");
    };
    assert_eq!(page, &Page::text("A"));
    assert_eq!(controls.len(), 2);
    assert_eq!(handle.cursor(), 0);

    for operation in ["next", "next", "next", "prev"] {
        ctx.registry.dispatch(click(&handle, operation, 1));
        settle().await;
    }

    assert_eq!(
        transport.edited_pages(),
        pages(&["B", "C", "A", "C"])
    );
    assert_eq!(handle.cursor(), 2);

    let edits_use_the_click = transport.calls().into_iter().all(|call| match call {
        Recorded::Edited { message, .. } => {
            message == MessageHandle::Component(InteractionHandle::new(1, 99, "click-token"))
        }
        _ => true,
    });
    assert!(edits_use_the_click);
}

#[tokio::test(start_paused = true)]
async fn concurrent_paginators_are_isolated() {
    let (ctx, _transport) = context();
    let first = send(&ctx, &["A", "B", "C"]).await;
    let second = send(&ctx, &["X", "Y", "Z"]).await;
    assert_ne!(first.paginator().nonce(), second.paginator().nonce());

    ctx.registry.dispatch(click(&first, "next", 1));
    settle().await;
    assert_eq!(first.cursor(), 1);
    assert_eq!(second.cursor(), 0);

    ctx.registry.dispatch(click(&second, "prev", 1));
    ctx.registry.dispatch(click(&second, "prev", 1));
    settle().await;
    assert_eq!(first.cursor(), 1);
    assert_eq!(second.cursor(), 1);
}

#[tokio::test(start_paused = true)]
async fn expires_without_activity_and_stays_expired() {
    let (ctx, transport) = context();
    let handle = send(&ctx, &["A", "B"]).await;
    assert_eq!(ctx.registry.len(), 1);

    tokio::time::advance(DURATION).await;
    settle().await;

    assert!(handle.is_expired());
    assert!(ctx.registry.is_empty());
    assert!(
        transport
            .calls()
            .contains(&Recorded::ControlsCleared(handle.message().clone()))
    );

    assert_eq!(ctx.registry.dispatch(click(&handle, "next", 1)), 0);
    settle().await;
    assert!(transport.edited_pages().is_empty());
    assert_eq!(handle.cursor(), 0);
}

#[tokio::test(start_paused = true)]
async fn activity_every_half_duration_keeps_it_alive() {
    let (ctx, transport) = context();
    let handle = send(&ctx, &["A", "B"]).await;

    for _ in 0..10 {
        tokio::time::advance(DURATION / 2).await;
        ctx.registry.dispatch(click(&handle, "next", 1));
        settle().await;
    }

    assert!(!handle.is_expired());
    assert_eq!(ctx.registry.len(), 1);
    assert_eq!(transport.edited_pages().len(), 10);
}

#[tokio::test(start_paused = true)]
async fn filtered_actor_cannot_navigate() {
    let (ctx, transport) = context();
    let paginator = Paginator::new(pages(&["A", "B"]), DURATION)
        .unwrap()
        .with_filter(only_actor(7));
    let handle = send_paginator(&ctx, ReplyTarget::Channel(10), paginator)
        .await
        .unwrap();
    let armed_until = handle.paginator().expires_at();

    tokio::time::advance(Duration::from_secs(1)).await;
    ctx.registry.dispatch(click(&handle, "next", 8));
    settle().await;

    assert_eq!(handle.cursor(), 0);
    assert_eq!(handle.paginator().expires_at(), armed_until);
    assert!(transport.edited_pages().is_empty());
    assert!(transport.calls().contains(&Recorded::Ephemeral {
        interaction: InteractionHandle::new(1, 99, "click-token"),
        content: PAGINATION_WRONG_USER_MESSAGE.to_owned(),
    }));

    ctx.registry.dispatch(click(&handle, "next", 7));
    settle().await;
    assert_eq!(handle.cursor(), 1);
}

#[tokio::test(start_paused = true)]
async fn render_failure_expires_and_detaches() {
    let (ctx, transport) = context();
    let handle = send(&ctx, &["A", "B"]).await;

    transport.fail_edits(true);
    ctx.registry.dispatch(click(&handle, "next", 1));
    settle().await;

    assert!(handle.is_expired());
    assert!(ctx.registry.is_empty());

    transport.fail_edits(false);
    assert_eq!(ctx.registry.dispatch(click(&handle, "next", 1)), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_send_leaves_no_listener() {
    let (ctx, transport) = context();
    transport.fail_sends(true);

    let paginator = Paginator::new(pages(&["A", "B"]), DURATION).unwrap();
    let result = send_paginator(&ctx, ReplyTarget::Channel(10), paginator).await;

    assert!(matches!(result, Err(PaginatorError::Transport(_))));
    assert!(ctx.registry.is_empty());
}

#[tokio::test(start_paused = true)]
async fn single_page_is_sent_without_controls() {
    let (ctx, transport) = context();
    let handle = send(&ctx, &["only"]).await;

    assert_eq!(handle.listener_id(), None);
    assert!(ctx.registry.is_empty());
    assert!(matches!(
        &transport.calls()[0],
        Recorded::Sent { controls, .. } if controls.is_empty()
    ));
}

#[tokio::test(start_paused = true)]
async fn owner_can_detach() {
    let (ctx, transport) = context();
    let handle = send(&ctx, &["A", "B"]).await;

    assert!(handle.detach());
    assert!(!handle.detach());
    assert!(handle.is_expired());
    assert!(ctx.registry.is_empty());

    // Controls go away without waiting for the old deadline.
    settle().await;
    let cleared = transport
        .calls()
        .into_iter()
        .filter(|call| *call == Recorded::ControlsCleared(handle.message().clone()))
        .count();
    assert_eq!(cleared, 1);

    assert_eq!(ctx.registry.dispatch(click(&handle, "next", 1)), 0);
    settle().await;
    assert!(transport.edited_pages().is_empty());
}
