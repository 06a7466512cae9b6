//! DBM Frame Structure
//!
//! Binary frame format with a 20-byte header.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;

/// Magic bytes identifying the protocol: "CDBM"
pub const MAGIC: [u8; 4] = *b"CDBM";

/// Protocol version
pub const VERSION: u8 = 1;

/// Fixed header size in bytes
pub const HEADER_SIZE: usize = 20;

/// Operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    // Requests
    Ping = 0x01,
    Contains = 0x02,
    Create = 0x03,
    Delete = 0x04,
    All = 0x05,

    // Responses
    Pong = 0x10,
    Ok = 0x11,
    Bool = 0x12,
    Names = 0x13,
    Error = 0x14,
}

impl OpCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(OpCode::Ping),
            0x02 => Some(OpCode::Contains),
            0x03 => Some(OpCode::Create),
            0x04 => Some(OpCode::Delete),
            0x05 => Some(OpCode::All),
            0x10 => Some(OpCode::Pong),
            0x11 => Some(OpCode::Ok),
            0x12 => Some(OpCode::Bool),
            0x13 => Some(OpCode::Names),
            0x14 => Some(OpCode::Error),
            _ => None,
        }
    }

    /// Command name used for metrics and logs
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Ping => "PING",
            OpCode::Contains => "CONTAINS",
            OpCode::Create => "CREATE",
            OpCode::Delete => "DELETE",
            OpCode::All => "ALL",
            OpCode::Pong => "PONG",
            OpCode::Ok => "OK",
            OpCode::Bool => "BOOL",
            OpCode::Names => "NAMES",
            OpCode::Error => "ERROR",
        }
    }
}

/// Frame header (20 bytes)
///
/// ```text
/// ┌──────────┬──────────┬──────────┬──────────┬─────────────────┐
/// │  Magic   │ Version  │  OpCode  │  Flags   │  Payload Len    │
/// │ (4 bytes)│ (1 byte) │ (1 byte) │ (2 bytes)│   (4 bytes)     │
/// ├──────────┴──────────┴──────────┴──────────┴─────────────────┤
/// │  Request ID (8 bytes)                                       │
/// └─────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub opcode: OpCode,
    pub flags: u16,
    pub payload_len: u32,
    pub request_id: u64,
}

impl FrameHeader {
    pub fn new(opcode: OpCode, request_id: u64) -> Self {
        Self {
            version: VERSION,
            opcode,
            flags: 0,
            payload_len: 0,
            request_id,
        }
    }

    pub fn with_payload_len(mut self, len: u32) -> Self {
        self.payload_len = len;
        self
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&MAGIC);
        buf.put_u8(self.version);
        buf.put_u8(self.opcode as u8);
        buf.put_u16(self.flags);
        buf.put_u32(self.payload_len);
        buf.put_u64(self.request_id);
    }

    /// Decode a header; `buf` must hold at least `HEADER_SIZE` bytes.
    pub fn decode(buf: &mut impl Buf) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        buf.copy_to_slice(&mut magic);
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid magic bytes",
            ));
        }

        let version = buf.get_u8();
        if version != VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported protocol version: {}", version),
            ));
        }

        let opcode_byte = buf.get_u8();
        let opcode = OpCode::from_u8(opcode_byte).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid opcode: {}", opcode_byte))
        })?;

        Ok(Self {
            version,
            opcode,
            flags: buf.get_u16(),
            payload_len: buf.get_u32(),
            request_id: buf.get_u64(),
        })
    }
}

/// Complete frame with header and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(opcode: OpCode, request_id: u64, payload: Bytes) -> Self {
        let header = FrameHeader::new(opcode, request_id).with_payload_len(payload.len() as u32);
        Self { header, payload }
    }

    pub fn opcode(&self) -> OpCode {
        self.header.opcode
    }

    pub fn request_id(&self) -> u64 {
        self.header.request_id
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        self.header.encode(buf);
        buf.put_slice(&self.payload);
    }
}
