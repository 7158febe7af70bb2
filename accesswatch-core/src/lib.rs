pub mod cli;
pub mod conf;
pub mod event;
pub mod filter;
pub mod logging;
pub mod session;
pub mod stream;
pub mod transport;
