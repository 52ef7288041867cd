use serde::Serialize;

/// Who is at the wheel in this client. Lives only as long as the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    name: String,
    authorized: bool,
}

impl Session {
    pub(crate) fn authorized(name: String) -> Self {
        Self {
            name,
            authorized: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// The session's one spin has been used.
    pub(crate) fn spend(&mut self) {
        self.authorized = false;
    }
}
