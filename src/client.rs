use crate::{
    config::ClientConfig,
    error::RconError,
    packet::Packet,
    session::{Session, SessionState},
};
use log::trace;
use tokio::{
    net::{TcpStream, ToSocketAddrs},
    time::timeout,
};

/// Simple asynchronous rcon client. Call `connect()` to establish a connection
/// and authenticate. The client should be `mut` as every command goes through
/// the one underlying [Session].
///
/// ## Example
/// ```no_run
/// use sourcon::client::Client;
/// use std::error::Error;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let host = "127.0.0.1:27015";
///     let mut client = Client::connect(host, "<put rcon password here>").await?;
///     let response = client.command("echo hi").await?;
///
///     println!("{}", response.body());
///     Ok(())
/// }
/// ```
pub struct Client {
    session: Session<TcpStream>,
}

/// Response to a single command.
pub struct Response {
    packet: Packet,
}

impl Response {
    /// Body text. Bytes that aren't valid utf-8 are replaced.
    pub fn body(&self) -> String {
        self.packet.body_lossy()
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn into_packet(self) -> Packet {
        self.packet
    }
}

impl Client {
    pub async fn connect<A: ToSocketAddrs>(host: A, password: &str) -> Result<Self, RconError> {
        Self::connect_with(host, password, ClientConfig::default()).await
    }

    pub async fn connect_with<A: ToSocketAddrs>(
        host: A,
        password: &str,
        config: ClientConfig,
    ) -> Result<Self, RconError> {
        let stream = timeout(config.connect_timeout, TcpStream::connect(host))
            .await?
            .map_err(RconError::UnreachableHost)?;

        if let Ok(addr) = stream.peer_addr() {
            trace!("opened tcp stream to {}, attempting auth", addr);
        }

        let mut session = Session::new(stream, config);
        session.authenticate(password).await?;

        Ok(Client { session })
    }

    /// Run a rcon command and wait for its response.
    pub async fn command(&mut self, command: &str) -> Result<Response, RconError> {
        let packet = self.session.command(command).await?;
        Ok(Response { packet })
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&mut self) -> &mut Session<TcpStream> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<TcpStream> {
        self.session
    }
}
