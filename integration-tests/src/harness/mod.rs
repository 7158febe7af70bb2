mod session;
pub mod sse_server;
pub mod tracing;

pub use self::session::{wait_for_state, wait_for_views};
pub use self::sse_server::{Script, SseServer, VALID_AUTHORIZATION, access_frame};
pub use self::tracing::{CapturedEvent, captured_events, init_test_tracing};
