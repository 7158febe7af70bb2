mod render;
mod run;


pub use render::{redraw, render_dashboard, render_json};
pub use run::{WatchArgs, run_watch};
