//! `Range` request header handling for recording streams.

/// An inclusive byte range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a file of `total_len` bytes.
    pub fn content_range(&self, total_len: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_len)
    }
}

/// What part of a file a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable `Range` header: send the whole file.
    Full,
    /// A single satisfiable range.
    Partial(ByteRange),
    /// A well-formed range that lies outside the file.
    Unsatisfiable,
}

/// Interprets a `Range` header against a file of `total_len` bytes.
///
/// Only the first range of a multi-range request is honored. Headers that do
/// not parse are ignored, so the whole file is sent.
pub fn parse_range(header: Option<&str>, total_len: u64) -> RangeRequest {
    let Some(header) = header else {
        return RangeRequest::Full;
    };
    let Some(ranges) = header.trim().strip_prefix("bytes=") else {
        return RangeRequest::Full;
    };
    let Some(first) = ranges.split(',').next() else {
        return RangeRequest::Full;
    };
    let Some((start_s, end_s)) = first.trim().split_once('-') else {
        return RangeRequest::Full;
    };

    let last = match total_len.checked_sub(1) {
        Some(last) => last,
        None => return RangeRequest::Unsatisfiable,
    };

    // Suffix form: the final N bytes.
    if start_s.is_empty() {
        return match end_s.parse::<u64>() {
            Ok(0) => RangeRequest::Unsatisfiable,
            Ok(n) => RangeRequest::Partial(ByteRange {
                start: total_len.saturating_sub(n),
                end: last,
            }),
            Err(_) => RangeRequest::Full,
        };
    }

    let Ok(start) = start_s.parse::<u64>() else {
        return RangeRequest::Full;
    };
    let end = if end_s.is_empty() {
        last
    } else {
        match end_s.parse::<u64>() {
            Ok(end) => end,
            Err(_) => return RangeRequest::Full,
        }
    };

    if end < start {
        return RangeRequest::Full;
    }
    if start > last {
        return RangeRequest::Unsatisfiable;
    }

    RangeRequest::Partial(ByteRange {
        start,
        end: end.min(last),
    })
}
