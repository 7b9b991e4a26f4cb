//! Server manager: owns the open client sessions and routes requests to them.
//!
//! Each accepted session is a domain object identified by an [`ObjectId`].
//! Ids start at [`FIRST_OBJECT_ID`] and are never reused while the server is
//! running.

use std::collections::BTreeMap;

use nx_service_nfp::{
    DispatchError, NfpUserMitmService, RawRequest, Response, ResultCode, UserInterface,
};

/// First domain object id handed out.
pub const FIRST_OBJECT_ID: u32 = 2;

/// Domain object id of an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

impl core::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// IUserManager `CreateUserInterface`
    Open,
    /// IUser request on an open session
    Request { object: ObjectId, request: RawRequest },
    /// Close an open session
    Close { object: ObjectId },
}

/// A reply sent back to the client.
#[derive(Debug)]
pub enum Reply {
    Opened(ObjectId),
    Closed(ObjectId),
    Response {
        object: ObjectId,
        cmd_id: u32,
        response: Response,
    },
    Error {
        object: Option<ObjectId>,
        cmd_id: Option<u32>,
        error: ServerError,
    },
}

/// Message channel between the server and its clients.
pub trait Transport {
    /// Receives the next message, or `None` once the peer has gone away.
    fn receive(&mut self) -> Result<Option<Message>, TransportError>;

    /// Sends a reply.
    fn send(&mut self, reply: Reply) -> Result<(), TransportError>;
}

/// Error returned by a [`Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport i/o failed")]
    Io(#[from] std::io::Error),
    #[error("failed to encode reply")]
    Encode(#[from] serde_json::Error),
}

/// Session table for the emulated `nfp:user` service.
pub struct ServerManager {
    service: NfpUserMitmService,
    sessions: BTreeMap<ObjectId, UserInterface>,
    next_object_id: u32,
    max_sessions: usize,
}

impl ServerManager {
    /// Creates a server that accepts at most `max_sessions` open sessions.
    pub fn new(service: NfpUserMitmService, max_sessions: usize) -> Self {
        Self {
            service,
            sessions: BTreeMap::new(),
            next_object_id: FIRST_OBJECT_ID,
            max_sessions,
        }
    }

    /// Returns the number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Accepts a new session.
    pub fn open_session(&mut self) -> Result<ObjectId, ServerError> {
        if self.sessions.len() >= self.max_sessions {
            tracing::warn!(max = self.max_sessions, "session limit reached");
            return Err(ServerError::SessionLimit(self.max_sessions));
        }

        let object = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.sessions.insert(object, self.service.create_user_interface());
        tracing::debug!(%object, open = self.sessions.len(), "session opened");
        Ok(object)
    }

    /// Closes a session, dropping its interface.
    pub fn close_session(&mut self, object: ObjectId) -> Result<(), ServerError> {
        self.sessions
            .remove(&object)
            .ok_or(ServerError::UnknownObject(object))?;
        tracing::debug!(%object, open = self.sessions.len(), "session closed");
        Ok(())
    }

    /// Dispatches a request to an open session.
    pub fn request(
        &mut self,
        object: ObjectId,
        request: RawRequest,
    ) -> Result<Response, ServerError> {
        let session = self
            .sessions
            .get_mut(&object)
            .ok_or(ServerError::UnknownObject(object))?;
        Ok(session.dispatch_raw(request)?)
    }

    /// Handles one message and builds its reply.
    pub fn handle(&mut self, message: Message) -> Reply {
        match message {
            Message::Open => match self.open_session() {
                Ok(object) => Reply::Opened(object),
                Err(error) => Reply::Error {
                    object: None,
                    cmd_id: None,
                    error,
                },
            },
            Message::Close { object } => match self.close_session(object) {
                Ok(()) => Reply::Closed(object),
                Err(error) => Reply::Error {
                    object: Some(object),
                    cmd_id: None,
                    error,
                },
            },
            Message::Request { object, request } => {
                let cmd_id = request.cmd_id;
                match self.request(object, request) {
                    Ok(response) => Reply::Response {
                        object,
                        cmd_id,
                        response,
                    },
                    Err(error) => {
                        tracing::warn!(
                            %object,
                            cmd_id,
                            %error,
                            code = %error.result_code(),
                            "request failed"
                        );
                        Reply::Error {
                            object: Some(object),
                            cmd_id: Some(cmd_id),
                            error,
                        }
                    }
                }
            }
        }
    }

    /// Serves messages until the transport reaches end of input.
    ///
    /// All sessions still open at that point are closed.
    pub fn process<T: Transport>(&mut self, transport: &mut T) -> Result<(), TransportError> {
        tracing::info!(max_sessions = self.max_sessions, "server running");
        while let Some(message) = transport.receive()? {
            let reply = self.handle(message);
            transport.send(reply)?;
        }
        tracing::info!(open = self.sessions.len(), "transport closed, shutting down");
        self.sessions.clear();
        Ok(())
    }
}

/// Error returned for a message the server could not handle.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("session limit of {0} reached")]
    SessionLimit(usize),
    #[error("no session with object id {0}")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ServerError {
    /// Result code reported to the client.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::SessionLimit(_) => ResultCode::OUT_OF_SESSIONS,
            Self::UnknownObject(_) => ResultCode::TARGET_NOT_FOUND,
            Self::Dispatch(err) => err.result_code(),
        }
    }
}
