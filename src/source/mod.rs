//! In-process command sources.
//!
//! The Discord source lives in `levelwatch-adapters`; the sources here are
//! fed from inside the process, for embedding levelwatch in another program
//! or driving it from tests.

mod channel;

pub use channel::ChannelSource;
