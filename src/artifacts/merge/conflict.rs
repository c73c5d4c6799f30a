use bytes::{BufMut, Bytes, BytesMut};

pub const HEAD_MARKER: &str = "<<<<<<< HEAD\n";
pub const SEPARATOR_MARKER: &str = "=======\n";
pub const CLOSING_MARKER: &str = ">>>>>>>\n";

/// Content written for a conflicting file
///
/// The working copy goes first, the merged-in version second; an absent side contributes
/// nothing between its markers.
pub fn materialize(working: Option<&[u8]>, from: Option<&[u8]>) -> Bytes {
    let working = working.unwrap_or_default();
    let from = from.unwrap_or_default();

    let mut content = BytesMut::with_capacity(
        HEAD_MARKER.len() + working.len() + SEPARATOR_MARKER.len() + from.len() + CLOSING_MARKER.len(),
    );
    content.put_slice(HEAD_MARKER.as_bytes());
    content.put_slice(working);
    content.put_slice(SEPARATOR_MARKER.as_bytes());
    content.put_slice(from);
    content.put_slice(CLOSING_MARKER.as_bytes());

    content.freeze()
}
