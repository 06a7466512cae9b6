//! DBM Command Parsing
//!
//! Request variants carried by request frames.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;

use super::frame::{Frame, OpCode};

/// Parsed request from a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Health check
    Ping,

    /// Check whether a database exists
    Contains { name: String },

    /// Create a database
    Create { name: String },

    /// Delete a database
    Delete { name: String },

    /// List all databases
    All,
}

impl Command {
    /// Parse a command from a request frame
    pub fn from_frame(frame: &Frame) -> io::Result<Self> {
        match frame.header.opcode {
            OpCode::Ping => Ok(Command::Ping),
            OpCode::All => Ok(Command::All),
            OpCode::Contains => Ok(Command::Contains {
                name: read_string(&mut frame.payload.clone())?,
            }),
            OpCode::Create => Ok(Command::Create {
                name: read_string(&mut frame.payload.clone())?,
            }),
            OpCode::Delete => Ok(Command::Delete {
                name: read_string(&mut frame.payload.clone())?,
            }),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected opcode for command: {:?}", other),
            )),
        }
    }

    /// Build the request frame for this command
    pub fn to_frame(&self, request_id: u64) -> Frame {
        let (opcode, payload) = match self {
            Command::Ping => (OpCode::Ping, Bytes::new()),
            Command::All => (OpCode::All, Bytes::new()),
            Command::Contains { name } => (OpCode::Contains, string_payload(name)),
            Command::Create { name } => (OpCode::Create, string_payload(name)),
            Command::Delete { name } => (OpCode::Delete, string_payload(name)),
        };
        Frame::new(opcode, request_id, payload)
    }

    pub fn opcode(&self) -> OpCode {
        match self {
            Command::Ping => OpCode::Ping,
            Command::Contains { .. } => OpCode::Contains,
            Command::Create { .. } => OpCode::Create,
            Command::Delete { .. } => OpCode::Delete,
            Command::All => OpCode::All,
        }
    }
}

fn string_payload(s: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + s.len());
    write_string(&mut buf, s);
    buf.freeze()
}

/// Write a u32-length-prefixed UTF-8 string
pub(crate) fn write_string(buf: &mut BytesMut, s: &str) {
    buf.put_u32(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

/// Read a u32-length-prefixed UTF-8 string
pub(crate) fn read_string(buf: &mut Bytes) -> io::Result<String> {
    if buf.remaining() < 4 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Not enough data for length prefix",
        ));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Not enough data for string",
        ));
    }
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Invalid UTF-8 in string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_and_all_have_no_payload() {
        assert!(Command::Ping.to_frame(1).payload.is_empty());
        let frame = Command::All.to_frame(2);
        assert_eq!(Command::from_frame(&frame).unwrap(), Command::All);
    }

    #[test]
    fn test_named_command() {
        let cmd = Command::Create {
            name: "social_network".to_string(),
        };
        let frame = cmd.to_frame(5);
        assert_eq!(frame.opcode(), OpCode::Create);
        assert_eq!(frame.request_id(), 5);
        assert_eq!(&frame.payload[..4], &14u32.to_be_bytes());
        assert_eq!(Command::from_frame(&frame).unwrap(), cmd);
    }

    #[test]
    fn test_truncated_name() {
        let frame = Frame::new(OpCode::Contains, 1, Bytes::from_static(b"\x00\x00\x00\x09db"));
        let err = Command::from_frame(&frame).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_invalid_utf8_name() {
        let frame = Frame::new(OpCode::Delete, 1, Bytes::from_static(b"\x00\x00\x00\x02\xff\xfe"));
        let err = Command::from_frame(&frame).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_response_opcode_is_not_a_command() {
        let frame = Frame::new(OpCode::Ok, 1, Bytes::new());
        assert!(Command::from_frame(&frame).is_err());
    }
}
