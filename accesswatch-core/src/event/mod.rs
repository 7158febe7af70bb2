mod parse;
mod types;

#[cfg(test)]
mod tests;

pub use parse::parse_access_event;
pub use types::AccessEvent;
