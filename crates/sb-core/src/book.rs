//! In-memory session list.
//!
//! Sessions are addressed by position. An edit started with
//! [`SessionBook::begin_edit`] remembers the index; the next
//! [`SessionBook::submit`] replaces that slot instead of appending.

use sb_common::{Message, Session};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("no session at index {index} (book has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, BookError>;

/// What a form submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Appended { index: usize },
    Updated { index: usize },
}

impl SubmitOutcome {
    pub fn index(self) -> usize {
        match self {
            SubmitOutcome::Appended { index } | SubmitOutcome::Updated { index } => index,
        }
    }

    pub fn message(self) -> Message {
        match self {
            SubmitOutcome::Appended { .. } => Message::SessionSaveSuccess,
            SubmitOutcome::Updated { .. } => Message::SessionUpdateSuccess,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionBook {
    sessions: Vec<Session>,
    editing: Option<usize>,
}

impl SessionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions,
            editing: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.sessions.iter()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.sessions.len() {
            Ok(())
        } else {
            Err(BookError::IndexOutOfRange {
                index,
                len: self.sessions.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<&Session> {
        self.check(index)?;
        Ok(&self.sessions[index])
    }

    /// Append and return the new session's index.
    pub fn push(&mut self, session: Session) -> usize {
        self.sessions.push(session);
        self.sessions.len() - 1
    }

    pub fn replace(&mut self, index: usize, session: Session) -> Result<Session> {
        self.check(index)?;
        Ok(std::mem::replace(&mut self.sessions[index], session))
    }

    /// Remove the session at `index`; later sessions shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Session> {
        self.check(index)?;
        // an edit pointing past the removed slot would now address a neighbour
        match self.editing {
            Some(editing) if editing == index => self.editing = None,
            Some(editing) if editing > index => self.editing = Some(editing - 1),
            _ => {}
        }
        Ok(self.sessions.remove(index))
    }

    /// Swap in a whole new list (import). Any edit in progress is dropped.
    pub fn replace_all(&mut self, sessions: Vec<Session>) -> Vec<Session> {
        self.editing = None;
        std::mem::replace(&mut self.sessions, sessions)
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Enter edit mode for `index`, returning the session to prefill a form.
    pub fn begin_edit(&mut self, index: usize) -> Result<&Session> {
        self.check(index)?;
        self.editing = Some(index);
        debug!(index, "Editing session");
        Ok(&self.sessions[index])
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Store a submitted form: replace the session being edited, or append.
    ///
    /// The session is stored in [`Session::canonical`] form, so empty steeps
    /// and empty custom fields never reach the list.
    pub fn submit(&mut self, session: Session) -> Result<SubmitOutcome> {
        let session = session.canonical();
        let outcome = match self.editing.take() {
            Some(index) => {
                self.replace(index, session)?;
                SubmitOutcome::Updated { index }
            }
            None => SubmitOutcome::Appended {
                index: self.push(session),
            },
        };
        debug!(?outcome, "Session submitted");
        Ok(outcome)
    }

    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions
    }
}

impl<'a> IntoIterator for &'a SessionBook {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
