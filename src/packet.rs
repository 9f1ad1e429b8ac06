use std::fmt;

use crate::error::RconError;

/// Packet types. `Exec` and `AuthResponse` share the wire value 2, so a
/// decoded 2 only means something once you know who sent it (see [Origin]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    // SERVERDATA_AUTH
    Auth,
    // SERVERDATA_EXECCOMMAND
    Exec,
    // SERVERDATA_AUTH_RESPONSE
    AuthResponse,
    // SERVERDATA_RESPONSE_VALUE
    Response,
}

/// Which side of the connection wrote a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Sent by the client: 3 is auth, 2 is a command.
    Client,
    /// Sent by the server: 2 is an auth response, 0 is command output.
    Server,
}

impl PacketType {
    pub fn value(&self) -> i32 {
        match self {
            PacketType::Auth => 3,
            PacketType::Exec => 2,
            PacketType::AuthResponse => 2,
            PacketType::Response => 0,
        }
    }

    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.value().to_le_bytes()
    }

    /// Interpret a raw type value sent by `origin`.
    pub fn from_value(value: i32, origin: Origin) -> Result<Self, RconError> {
        match (origin, value) {
            (Origin::Client, 3) => Ok(PacketType::Auth),
            (Origin::Client, 2) => Ok(PacketType::Exec),
            (Origin::Server, 2) => Ok(PacketType::AuthResponse),
            (_, 0) => Ok(PacketType::Response),
            _ => Err(RconError::UnknownPacketType(value)),
        }
    }
}

/// Read a little-endian i32 at `offset`, failing if `buf` is too short.
pub fn read_i32_le(buf: &[u8], offset: usize) -> Result<i32, RconError> {
    let end = offset + 4;
    match buf.get(offset..end) {
        Some(bytes) => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(bytes);
            Ok(i32::from_le_bytes(raw))
        }
        None => Err(RconError::TruncatedPacket {
            expected: end,
            available: buf.len(),
        }),
    }
}

/// Append `value` to `out` as little-endian bytes.
pub fn write_i32_le(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// A single rcon message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    packet_type: PacketType,
    body: Vec<u8>,
}

impl Packet {
    /// Size of the id, the type and the two terminators.
    pub const BASE_PACKET_SIZE: i32 = 10;
    /// Bytes taken by the size field itself.
    pub const SIZE_FIELD_LEN: usize = 4;

    const HEADER_LEN: usize = 12;

    pub fn new(id: i32, packet_type: PacketType, body: impl Into<Vec<u8>>) -> Self {
        Packet {
            id,
            packet_type,
            body: body.into(),
        }
    }

    /// Auth request with id 0.
    pub fn auth(password: &str) -> Self {
        Packet::new(0, PacketType::Auth, password)
    }

    /// Command request with id 0.
    pub fn exec(command: &str) -> Self {
        Packet::new(0, PacketType::Exec, command)
    }

    /// Decode the first packet in `buf`. Bytes past the end of that packet are
    /// ignored, so an oversized receive buffer can be passed as is.
    pub fn unpack(buf: &[u8], origin: Origin) -> Result<Self, RconError> {
        let frame_len = match Self::frame_len(buf)? {
            Some(len) => len,
            None => {
                return Err(RconError::TruncatedPacket {
                    expected: Self::SIZE_FIELD_LEN,
                    available: buf.len(),
                })
            }
        };

        if buf.len() < frame_len {
            return Err(RconError::TruncatedPacket {
                expected: frame_len,
                available: buf.len(),
            });
        }
        let frame = &buf[..frame_len];

        let id = read_i32_le(frame, 4)?;
        let packet_type = PacketType::from_value(read_i32_le(frame, 8)?, origin)?;
        let body = frame[Self::HEADER_LEN..frame_len - 2].to_vec();

        Ok(Packet {
            id,
            packet_type,
            body,
        })
    }

    /// Total wire length of the packet at the start of `buf`, or `None` if the
    /// size field hasn't fully arrived yet.
    pub fn frame_len(buf: &[u8]) -> Result<Option<usize>, RconError> {
        if buf.len() < Self::SIZE_FIELD_LEN {
            return Ok(None);
        }
        let size = read_i32_le(buf, 0)?;
        if size < Self::BASE_PACKET_SIZE {
            return Err(RconError::MalformedPacket(size));
        }
        Ok(Some(size as usize + Self::SIZE_FIELD_LEN))
    }

    // Since the only one of these values that can change in length is the body,
    // an easy way to calculate the size of a packet is to find the byte-length
    // of the packet body, then add 10 to it.
    pub fn size(&self) -> Result<i32, RconError> {
        Self::size_for(self.body.len())
    }

    /// Size field value for a body of `body_len` bytes.
    pub fn size_for(body_len: usize) -> Result<i32, RconError> {
        i32::try_from(body_len)
            .ok()
            .and_then(|len| len.checked_add(Self::BASE_PACKET_SIZE))
            .ok_or(RconError::PayloadTooLarge(body_len))
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    /// Body as text. Fails if the server sent something that isn't utf-8.
    pub fn body(&self) -> Result<&str, RconError> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn set_packet_type(&mut self, packet_type: PacketType) {
        self.packet_type = packet_type;
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    pub fn pack(&self) -> Result<Vec<u8>, RconError> {
        let size = self.size()?;
        // Size, ID, Type, Body, Terminator
        let mut payload = Vec::<u8>::with_capacity(size as usize + Self::SIZE_FIELD_LEN);
        write_i32_le(&mut payload, size);
        write_i32_le(&mut payload, self.id);
        write_i32_le(&mut payload, self.packet_type.value());
        payload.extend_from_slice(&self.body);
        // null terminate the body, then null terminate the entire packet
        payload.extend_from_slice(&[0u8, 0u8]);
        Ok(payload)
    }

    /// Body text for display, optionally preceded by the id in a 4 character
    /// column.
    pub fn printable(&self, show_id: bool) -> String {
        if show_id {
            format!("{:>4} {}", self.id, self.body_lossy())
        } else {
            self.body_lossy()
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printable(false))
    }
}
