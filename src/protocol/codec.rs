//! DBM Codec for Tokio
//!
//! Implements Encoder and Decoder traits for framed I/O.

use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use super::frame::{Frame, FrameHeader, HEADER_SIZE};

/// Default upper bound on a frame payload (16 MiB)
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Tokio codec for DBM frames
#[derive(Debug)]
pub struct DbmCodec {
    state: DecodeState,
    max_payload: usize,
}

#[derive(Debug, Default)]
enum DecodeState {
    #[default]
    Header,
    Payload(FrameHeader),
}

impl Default for DbmCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DbmCodec {
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            state: DecodeState::Header,
            max_payload,
        }
    }

    fn check_payload_len(&self, len: usize) -> io::Result<()> {
        if len > self.max_payload {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Frame payload of {} bytes exceeds limit of {}", len, self.max_payload),
            ));
        }
        Ok(())
    }
}

impl Decoder for DbmCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let DecodeState::Header = self.state {
            if src.len() < HEADER_SIZE {
                return Ok(None);
            }
            let header = FrameHeader::decode(&mut src.split_to(HEADER_SIZE).freeze())?;
            self.check_payload_len(header.payload_len as usize)?;
            self.state = DecodeState::Payload(header);
        }

        let payload_len = match &self.state {
            DecodeState::Payload(header) => header.payload_len as usize,
            DecodeState::Header => return Ok(None),
        };

        if src.len() < payload_len {
            src.reserve(payload_len - src.len());
            return Ok(None);
        }

        let payload = src.split_to(payload_len).freeze();
        match std::mem::take(&mut self.state) {
            DecodeState::Payload(header) => Ok(Some(Frame { header, payload })),
            DecodeState::Header => Ok(None),
        }
    }
}

impl Encoder<Frame> for DbmCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.check_payload_len(item.payload.len())?;
        dst.reserve(HEADER_SIZE + item.payload.len());
        item.encode(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::OpCode;
    use bytes::Bytes;

    #[test]
    fn test_partial_decode() {
        let mut codec = DbmCodec::new();
        let frame = Frame::new(OpCode::Create, 9, Bytes::from_static(b"\x00\x00\x00\x02db"));

        let mut full = BytesMut::new();
        codec.encode(frame.clone(), &mut full).unwrap();

        // Header only, then the rest of the payload arrives
        let mut buf = full.split_to(HEADER_SIZE + 3);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.unsplit(full);

        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut codec = DbmCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(Frame::new(OpCode::Ping, 1, Bytes::new()), &mut buf).unwrap();
        codec.encode(Frame::new(OpCode::All, 2, Bytes::new()), &mut buf).unwrap();

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().request_id(), 1);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().opcode(), OpCode::All);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut codec = DbmCodec::with_max_payload(4);
        let mut buf = BytesMut::new();
        FrameHeader::new(OpCode::Create, 1)
            .with_payload_len(5)
            .encode(&mut buf);

        let err = codec.decode(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let frame = Frame::new(OpCode::Create, 1, Bytes::from_static(b"12345"));
        assert!(codec.encode(frame, &mut BytesMut::new()).is_err());
    }
}
