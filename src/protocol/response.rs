//! DBM Response types
//!
//! Response variants for command execution results.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;

use super::command::{read_string, write_string};
use super::frame::{Frame, OpCode};

/// Response to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Pong response (for PING)
    Pong,

    /// Command succeeded with no value
    Ok,

    /// Boolean answer (CONTAINS)
    Bool(bool),

    /// Database listing (ALL)
    Names(Vec<String>),

    /// Command failed on the server
    Error(String),
}

impl Response {
    /// Convert response to a frame answering `request_id`
    pub fn to_frame(&self, request_id: u64) -> Frame {
        match self {
            Response::Pong => Frame::new(OpCode::Pong, request_id, Bytes::new()),
            Response::Ok => Frame::new(OpCode::Ok, request_id, Bytes::new()),
            Response::Bool(b) => {
                Frame::new(OpCode::Bool, request_id, Bytes::copy_from_slice(&[*b as u8]))
            }
            Response::Names(names) => {
                let mut buf = BytesMut::new();
                buf.put_u32(names.len() as u32);
                for name in names {
                    write_string(&mut buf, name);
                }
                Frame::new(OpCode::Names, request_id, buf.freeze())
            }
            Response::Error(msg) => {
                Frame::new(OpCode::Error, request_id, Bytes::copy_from_slice(msg.as_bytes()))
            }
        }
    }

    /// Parse response from a frame
    pub fn from_frame(frame: &Frame) -> io::Result<Self> {
        match frame.header.opcode {
            OpCode::Pong => Ok(Response::Pong),
            OpCode::Ok => Ok(Response::Ok),
            OpCode::Bool => match frame.payload.first() {
                Some(0) => Ok(Response::Bool(false)),
                Some(1) => Ok(Response::Bool(true)),
                _ => Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Invalid boolean payload",
                )),
            },
            OpCode::Names => {
                let mut buf = frame.payload.clone();
                if buf.remaining() < 4 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "Invalid names payload",
                    ));
                }
                let count = buf.get_u32() as usize;
                // Each entry carries at least its 4-byte length prefix
                let mut names = Vec::with_capacity(count.min(buf.remaining() / 4));
                for _ in 0..count {
                    names.push(read_string(&mut buf)?);
                }
                Ok(Response::Names(names))
            }
            OpCode::Error => {
                let msg = String::from_utf8_lossy(&frame.payload).to_string();
                Ok(Response::Error(msg))
            }
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected opcode for response: {:?}", other),
            )),
        }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Response::Pong => write!(f, "PONG"),
            Response::Ok => write!(f, "OK"),
            Response::Bool(b) => write!(f, "{}", b),
            Response::Names(names) => {
                if names.is_empty() {
                    return write!(f, "(empty list)");
                }
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) \"{}\"", i + 1, name)?;
                }
                Ok(())
            }
            Response::Error(msg) => write!(f, "(error) {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_payload() {
        let response = Response::Names(vec!["alpha".to_string(), "beta".to_string()]);
        let frame = response.to_frame(3);
        assert_eq!(frame.opcode(), OpCode::Names);
        assert_eq!(&frame.payload[..4], &2u32.to_be_bytes());
        assert_eq!(Response::from_frame(&frame).unwrap(), response);
    }

    #[test]
    fn test_truncated_names_payload() {
        let mut buf = BytesMut::new();
        buf.put_u32(3);
        write_string(&mut buf, "only-one");
        let frame = Frame::new(OpCode::Names, 1, buf.freeze());
        assert!(Response::from_frame(&frame).is_err());
    }

    #[test]
    fn test_bool_payload() {
        let frame = Response::Bool(true).to_frame(1);
        assert_eq!(frame.payload.as_ref(), &[1]);

        let bad = Frame::new(OpCode::Bool, 1, Bytes::from_static(&[7]));
        assert!(Response::from_frame(&bad).is_err());
        let empty = Frame::new(OpCode::Bool, 1, Bytes::new());
        assert!(Response::from_frame(&empty).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Response::Names(vec![]).to_string(), "(empty list)");
        assert_eq!(
            Response::Names(vec!["a".to_string(), "b".to_string()]).to_string(),
            "1) \"a\"\n2) \"b\""
        );
        assert_eq!(Response::Error("nope".to_string()).to_string(), "(error) nope");
    }
}
