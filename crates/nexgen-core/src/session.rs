use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// An authenticated session as returned by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

impl Session {
    pub fn email(&self) -> &str {
        &self.user.email
    }
}

/// Shared auth state. Holders of a [`SessionHandle`] observe sign-in and
/// sign-out as they happen; there is exactly one writer per process.
#[derive(Debug)]
pub struct SessionWatch {
    tx: watch::Sender<Option<Session>>,
}

/// Read side of a [`SessionWatch`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionWatch {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            rx: self.tx.subscribe(),
        }
    }

    pub fn set(&self, session: Option<Session>) {
        // send_replace never fails even with no receivers
        self.tx.send_replace(session);
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until the session state changes. Returns the new value.
    pub async fn changed(&mut self) -> Option<Session> {
        // the sender lives as long as the SessionWatch; a closed channel
        // means shutdown, which reads the same as signed-out
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }
}
