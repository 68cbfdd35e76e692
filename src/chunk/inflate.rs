//! Zlib inflation for compressed sub-blocks.
//!
//! `flate2::read::ZlibDecoder` treats a stream that runs out of input as a
//! clean end of file, so a truncated sub-block would decode "successfully"
//! to a short payload. The loop here drives [`flate2::Decompress`] directly
//! and only succeeds once the stream end marker has been seen.

use flate2::{Decompress, DecompressError, FlushDecompress, Status};
use thiserror::Error;

/// Output growth step for the inflate loop.
const INFLATE_STEP: usize = 8 * 1024;

/// Why a sub-block failed to inflate.
#[derive(Debug, Error)]
pub(crate) enum InflateFailure {
    /// The zlib stream is malformed.
    #[error("{0}")]
    Corrupt(#[from] DecompressError),

    /// The input ran out before the stream end marker.
    #[error("input exhausted after {consumed} bytes, before end of zlib stream")]
    Truncated { consumed: u64 },
}

/// Inflates one complete zlib stream from `input`, appending to `out`.
///
/// Returns the number of bytes appended. Bytes in `input` after the stream
/// end marker are ignored.
pub(crate) fn inflate_into(input: &[u8], out: &mut Vec<u8>) -> Result<usize, InflateFailure> {
    let start_len = out.len();
    let mut stream = Decompress::new(true);

    loop {
        if out.capacity() - out.len() < INFLATE_STEP {
            out.reserve(INFLATE_STEP);
        }

        // total_in counts bytes taken from `input`, so it never exceeds its length.
        #[allow(clippy::cast_possible_truncation)]
        let rest = &input[stream.total_in() as usize..];
        let in_before = stream.total_in();
        let out_before = stream.total_out();

        let status = stream.decompress_vec(rest, out, FlushDecompress::None)?;

        match status {
            Status::StreamEnd => return Ok(out.len() - start_len),
            Status::Ok | Status::BufError => {
                // Spare capacity was available, so no progress means no input.
                if stream.total_in() == in_before && stream.total_out() == out_before {
                    return Err(InflateFailure::Truncated {
                        consumed: stream.total_in(),
                    });
                }
            }
        }
    }
}
