//! SHA-1 trailer framing for the index file

use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::anyhow;
use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};

/// Append the SHA-1 of `body` to it
pub fn seal(body: &[u8]) -> Bytes {
    let mut sealed = BytesMut::with_capacity(body.len() + CHECKSUM_SIZE);
    sealed.put_slice(body);
    sealed.put_slice(Sha1::digest(body).as_slice());

    sealed.freeze()
}

/// Split off and verify the trailer, returning the body
pub fn unseal(content: &[u8]) -> anyhow::Result<&[u8]> {
    if content.len() < CHECKSUM_SIZE {
        return Err(anyhow!("Unexpected end-of-file while reading index"));
    }

    let (body, expected_checksum) = content.split_at(content.len() - CHECKSUM_SIZE);
    if Sha1::digest(body).as_slice() != expected_checksum {
        return Err(anyhow!("Checksum does not match value stored on disk"));
    }

    Ok(body)
}
