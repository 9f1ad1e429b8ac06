use thiserror::Error;
use tokio::time::error::Elapsed;

/// Possible errors for the package.
#[derive(Error, Debug)]
pub enum RconError {
    /// Returned if the body is too long for the packet's 32-bit size field.
    #[error("packet body too large to encode ({0} bytes)")]
    PayloadTooLarge(usize),
    /// Returned if fewer bytes are available than the size field promises.
    #[error("packet truncated: expected {expected} bytes, got {available}")]
    TruncatedPacket { expected: usize, available: usize },
    /// Returned if the size field can't hold the id, the type and both
    /// terminators.
    #[error("packet size {0} is below the minimum of 10")]
    MalformedPacket(i32),
    /// Returned if we received a packet that does not have a type known to us.
    #[error("unknown rcon packet type: {0}")]
    UnknownPacketType(i32),
    /// Returned if the body is read as text but is not valid utf-8.
    #[error("packet body malformed (not valid ascii or utf-8)")]
    MalformedPacketBody(#[from] std::str::Utf8Error),
    /// Returned if the server announces a packet larger than we accept.
    #[error("packet of {size} bytes exceeds the limit of {limit}")]
    PacketTooLarge { size: usize, limit: usize },
    /// Returned if the host is down or behind a firewall.
    #[error("host cannot be reached")]
    UnreachableHost(#[source] std::io::Error),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem writing to the socket.
    #[error("cannot send message to host")]
    SendError(#[source] std::io::Error),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem reading from the socket.
    #[error("cannot receive response from host")]
    ReceiveError(#[source] std::io::Error),
    /// Returned if the host closed the connection.
    #[error("connection closed by host")]
    ConnectionClosed,
    /// Returned if you can't remember the password.
    #[error("bad password")]
    AuthenticationError,
    /// Returned if the server did not respond in time.
    #[error("timeout")]
    TimeoutError(#[from] Elapsed),
    /// Returned if reading commands from or printing responses to the
    /// console failed.
    #[error("console i/o failed")]
    ConsoleError(#[source] std::io::Error),
    /// Returned if a command is sent before authenticating.
    #[error("not authenticated")]
    NotAuthenticated,
    /// Returned if auth is attempted on a session that already passed it.
    #[error("already authenticated")]
    AlreadyAuthenticated,
    /// Returned when a session that failed auth or lost its transport is used
    /// again.
    #[error("session is closed")]
    SessionClosed,
}
