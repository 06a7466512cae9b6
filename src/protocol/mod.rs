//! DBM Protocol - Database Manager Protocol
//!
//! Binary request/response protocol spoken between a node client and a
//! clusterdb server. Every frame carries a 20-byte fixed header.

mod codec;
mod command;
mod frame;
mod response;

pub use codec::{DbmCodec, DEFAULT_MAX_PAYLOAD};
pub use command::Command;
pub use frame::{Frame, FrameHeader, OpCode, HEADER_SIZE, MAGIC, VERSION};
pub use response::Response;
