use std::fmt;

/// Identity used to open a transport.
///
/// Passed explicitly into [`StreamSession::start`](crate::session::StreamSession::start);
/// a different credential is a different session.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Local sources that need no identity (stdin, files).
    Anonymous,
    Basic { username: String, password: String },
}

impl Credential {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Anonymous => f.write_str("Anonymous"),
            Credential::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
