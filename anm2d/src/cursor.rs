//! Position-tracked reader over an in-memory byte buffer.
//!
//! The cursor is schema-free: it reads little-endian primitives, zero
//! terminated strings, and counted collections, and knows nothing about the
//! animation container layout.

use crate::Error;
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct BinaryCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < len {
            return Err(Error::TruncatedInput {
                offset: self.position,
            });
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Reads bytes up to and including a zero terminator and returns the bytes
    /// before it. Bytes are mapped to characters 1:1 (Latin-1).
    pub fn read_string(&mut self) -> Result<String, Error> {
        let start = self.position;
        let Some(len) = self.bytes[self.position..].iter().position(|&b| b == 0) else {
            return Err(Error::UnterminatedString { offset: start });
        };
        let raw = &self.bytes[start..start + len];
        self.position += len + 1;
        Ok(raw.iter().map(|&b| b as char).collect())
    }

    /// Invokes `read` only when `cond` holds; otherwise returns `None` without
    /// advancing.
    pub fn read_if<T>(
        &mut self,
        cond: bool,
        read: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<Option<T>, Error> {
        if cond {
            Ok(Some(read(self)?))
        } else {
            Ok(None)
        }
    }

    /// Reads a u16 element count followed by that many elements.
    pub fn read_array_u16<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, Error>,
    ) -> Result<Vec<T>, Error> {
        let count = self.read_u16()? as usize;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    /// Reads a u32 element count followed by that many elements.
    pub fn read_array_u32<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, Error>,
    ) -> Result<Vec<T>, Error> {
        let count = self.read_u32()? as usize;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    /// Reads a u32 entry count followed by that many key/value pairs. Key
    /// uniqueness is not enforced; a duplicate key overwrites the earlier
    /// entry.
    pub fn read_map_u32<K: Eq + Hash, V>(
        &mut self,
        mut read_key: impl FnMut(&mut Self) -> Result<K, Error>,
        mut read_value: impl FnMut(&mut Self) -> Result<V, Error>,
    ) -> Result<HashMap<K, V>, Error> {
        let count = self.read_u32()? as usize;
        let mut out = HashMap::with_capacity(count);
        for _ in 0..count {
            let key = read_key(self)?;
            let value = read_value(self)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}
