//! Blob object
//!
//! A blob is the snapshot of one file taken when it was staged. Unlike git, the file
//! name is part of the blob, so identical bytes under different names are distinct
//! objects while re-staging an unchanged file yields the same ID.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<file name>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Name of the file relative to the working root
    name: String,
    /// Raw file bytes
    content: Bytes,
}

impl Blob {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut body = Vec::with_capacity(self.name.len() + 1 + self.content.len());
        body.extend_from_slice(self.name.as_bytes());
        body.push(b'\0');
        body.extend_from_slice(&self.content);

        frame(self.object_type(), &body)
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut name = Vec::new();
        reader.read_until(b'\0', &mut name)?;
        if name.pop() != Some(b'\0') {
            anyhow::bail!("Invalid blob object: missing file name terminator");
        }
        let name = String::from_utf8(name).context("Invalid blob object: file name")?;

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(name, content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}
