use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{BufRead, Write};

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Canonical bytes the object ID is derived from.
    ///
    /// Defaults to the full serialized form; objects carrying metadata that must not
    /// affect their identity override it.
    fn identity(&self) -> Result<Bytes> {
        self.serialize()
    }

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.identity()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}

/// Prefix `body` with the `<type> <size>\0` frame header
pub(crate) fn frame(object_type: ObjectType, body: &[u8]) -> Result<Bytes> {
    let mut object_bytes = Vec::with_capacity(body.len() + 16);
    let header = format!("{} {}\0", object_type.as_str(), body.len());
    object_bytes.write_all(header.as_bytes())?;
    object_bytes.write_all(body)?;

    Ok(Bytes::from(object_bytes))
}
