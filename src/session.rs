use log::{debug, trace, warn};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::timeout,
};

use crate::{
    config::ClientConfig,
    error::RconError,
    packet::{Origin, Packet, PacketType},
};

/// Where a [Session] is in the rcon exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, password not sent yet.
    Unauthenticated,
    /// The server accepted the password. Commands may be sent.
    Authenticated,
    /// The server rejected the password. Terminal.
    AuthFailed,
    /// The transport failed or the stream lost framing. Terminal.
    Broken,
}

/// Drives the rcon exchange over any ordered byte stream.
///
/// The session owns the stream for its whole life and keeps exactly one
/// request in flight: every packet sent is followed by a blocking read of the
/// response before anything else happens. Bytes that arrive past the end of a
/// packet are kept for the next [Session::receive].
pub struct Session<S> {
    stream: S,
    config: ClientConfig,
    state: SessionState,
    buffer: Vec<u8>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already connected stream.
    pub fn new(stream: S, config: ClientConfig) -> Self {
        Session {
            stream,
            config,
            state: SessionState::Unauthenticated,
            buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// False once auth failed or the transport broke.
    pub fn is_usable(&self) -> bool {
        matches!(
            self.state,
            SessionState::Unauthenticated | SessionState::Authenticated
        )
    }

    /// Tear the session down and hand back the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Send the password and wait for the server's verdict.
    ///
    /// Source servers answer an auth packet with an empty response value
    /// followed by the actual auth response, so response values are skipped
    /// until the auth response shows up. An id of -1 means the password was
    /// rejected.
    pub async fn authenticate(&mut self, password: &str) -> Result<(), RconError> {
        match self.state {
            SessionState::Unauthenticated => {}
            SessionState::Authenticated => return Err(RconError::AlreadyAuthenticated),
            SessionState::AuthFailed | SessionState::Broken => {
                return Err(RconError::SessionClosed)
            }
        }

        trace!("sending auth packet to server");
        self.send(&Packet::auth(password)).await?;

        loop {
            let response = self.receive().await?;
            trace!(
                "receive {:?} for packet id {} during auth",
                response.packet_type(),
                response.id()
            );

            if response.id() == -1 {
                warn!("server rejected the rcon password");
                self.state = SessionState::AuthFailed;
                return Err(RconError::AuthenticationError);
            }

            if response.packet_type() == PacketType::AuthResponse {
                debug!("auth complete");
                self.state = SessionState::Authenticated;
                return Ok(());
            }
        }
    }

    /// Run a command and return the single response packet the server sends
    /// back for it.
    pub async fn command(&mut self, command: &str) -> Result<Packet, RconError> {
        match self.state {
            SessionState::Authenticated => {}
            SessionState::Unauthenticated => return Err(RconError::NotAuthenticated),
            SessionState::AuthFailed | SessionState::Broken => {
                return Err(RconError::SessionClosed)
            }
        }

        trace!("sending command {:?}", command);
        self.send(&Packet::exec(command)).await?;
        let response = self.receive().await?;
        trace!("receive response for packet id {}", response.id());
        Ok(response)
    }

    /// Write one packet to the stream.
    pub async fn send(&mut self, packet: &Packet) -> Result<(), RconError> {
        self.ensure_open()?;
        let bytes = packet.pack()?;

        let written = match self.stream.write_all(&bytes).await {
            Ok(()) => self.stream.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            self.state = SessionState::Broken;
            return Err(RconError::SendError(e));
        }
        Ok(())
    }

    /// Read one complete packet sent by the server.
    pub async fn receive(&mut self) -> Result<Packet, RconError> {
        self.ensure_open()?;

        let frame = match self.read_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                debug!("session broken: {}", e);
                self.state = SessionState::Broken;
                return Err(e);
            }
        };

        Packet::unpack(&frame, Origin::Server)
    }

    fn ensure_open(&self) -> Result<(), RconError> {
        if self.is_usable() {
            Ok(())
        } else {
            Err(RconError::SessionClosed)
        }
    }

    /// Read until the buffer holds a whole frame, then split it off.
    async fn read_frame(&mut self) -> Result<Vec<u8>, RconError> {
        loop {
            if let Some(len) = Packet::frame_len(&self.buffer)? {
                if len > self.config.max_packet_size {
                    return Err(RconError::PacketTooLarge {
                        size: len,
                        limit: self.config.max_packet_size,
                    });
                }
                if self.buffer.len() >= len {
                    let rest = self.buffer.split_off(len);
                    return Ok(std::mem::replace(&mut self.buffer, rest));
                }
            }

            self.fill().await?;
        }
    }

    async fn fill(&mut self) -> Result<(), RconError> {
        // a zero sized read would look like end of stream
        let mut chunk = vec![0u8; self.config.read_chunk_size.max(1)];
        let read = self.stream.read(&mut chunk);

        let count = match self.config.read_timeout {
            Some(limit) => timeout(limit, read).await?,
            None => read.await,
        }
        .map_err(RconError::ReceiveError)?;

        if count == 0 {
            return Err(RconError::ConnectionClosed);
        }

        trace!("read {} bytes from stream", count);
        self.buffer.extend_from_slice(&chunk[..count]);
        Ok(())
    }
}
