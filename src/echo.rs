//! Echo loop.
//!
//! Raw byte echo with no framing:
//! - Read at most one buffer's worth of bytes
//! - Zero bytes means the peer closed its write side
//! - Otherwise write exactly those bytes back, then read again
//!
//! Message boundaries are not preserved: whatever a single read returns is
//! written back as one unit before the next read.

use std::io::{self, Read, Write};
use tracing::trace;

/// Per-connection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Reads that returned data.
    pub reads: u64,
    /// Total bytes echoed back.
    pub bytes: u64,
}

/// Echo everything read from `stream` back to it until EOF.
///
/// `buf` bounds the size of each read. Errors other than `Interrupted` are
/// returned as-is; nothing is retried.
pub fn echo<S: Read + Write>(stream: &mut S, buf: &mut [u8]) -> io::Result<ConnectionStats> {
    let mut stats = ConnectionStats::default();

    loop {
        let n = match stream.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        stream.write_all(&buf[..n])?;

        stats.reads += 1;
        stats.bytes += n as u64;
        trace!(len = n, "Echoed chunk");
    }

    stream.flush()?;
    Ok(stats)
}
