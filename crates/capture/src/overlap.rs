//! Suffix/prefix alignment between consecutive console snapshots.

/// Returns the byte index in `latest` where unseen content begins.
///
/// Finds the largest `i` such that the first `i` bytes of `latest` equal
/// the last `i` bytes of `prev`. Candidates are scanned from the longest
/// down so a short coincidental match cannot shadow the genuine
/// alignment. Returns 0 when no alignment exists, which means the remote
/// buffer was rotated or reset and the whole snapshot counts as new —
/// possibly re-logging text captured before the reset, since the remote
/// gives no truncation signal.
///
/// Pure function over bytes; an overlap boundary can therefore never
/// split a char-boundary check or depend on I/O, time, or instance
/// identity.
pub fn overlap_index(prev: &[u8], latest: &[u8]) -> usize {
    let max = prev.len().min(latest.len());
    for i in (1..=max).rev() {
        if latest[..i] == prev[prev.len() - i..] {
            return i;
        }
    }
    0
}
