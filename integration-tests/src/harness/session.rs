use accesswatch_core::session::{SessionState, ViewHandle};
use accesswatch_core::stream::StreamViews;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

/// Wait until the session reaches `want` (or panic).
pub async fn wait_for_state(handle: &ViewHandle, want: SessionState) {
    let mut states = handle.subscribe_state();
    let reached = timeout(WAIT, states.wait_for(|s| *s == want))
        .await
        .is_ok_and(|r| r.is_ok());
    assert!(
        reached,
        "session never reached {want}, last state {}",
        handle.session_state()
    );
}

/// Wait until a published snapshot satisfies `pred` (or panic).
pub async fn wait_for_views<F>(handle: &ViewHandle, pred: F) -> Arc<StreamViews>
where
    F: Fn(&StreamViews) -> bool,
{
    let mut updates = handle.subscribe_views();
    let result = timeout(WAIT, async {
        loop {
            let views = handle.views();
            if pred(&views) {
                return views;
            }
            if updates.changed().await.is_err() {
                panic!("session publisher dropped");
            }
        }
    })
    .await;

    match result {
        Ok(views) => views,
        Err(_) => panic!("views never matched, last {:?}", handle.views().totals),
    }
}
