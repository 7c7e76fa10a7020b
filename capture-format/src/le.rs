// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Little-endian cursor helpers shared by the format block codecs.
//!
//! Callers check the block length up front, so reads past the end are a bug
//! in the caller and are reported as truncation rather than panicking.

use uuid::Uuid;

use crate::{FormatError, Result};

pub(crate) struct LeReader<'a> {
    record: &'static str,
    data: &'a [u8],
    offset: usize,
}

impl<'a> LeReader<'a> {
    pub(crate) fn new(record: &'static str, data: &'a [u8]) -> Self {
        Self {
            record,
            data,
            offset: 0,
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.offset + N;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or_else(|| FormatError::truncated(self.record, end, self.data.len()))?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.offset = end;
        Ok(out)
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub(crate) fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub(crate) fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    /// Reads a GUID in its in-memory (mixed-endian) layout.
    pub(crate) fn guid(&mut self) -> Result<Uuid> {
        Ok(Uuid::from_bytes_le(self.take()?))
    }
}

pub(crate) trait LeWriter {
    fn put_u16(&mut self, value: u16);
    fn put_u32(&mut self, value: u32);
    fn put_i32(&mut self, value: i32);
    fn put_i64(&mut self, value: i64);
    fn put_guid(&mut self, value: &Uuid);
}

impl LeWriter for Vec<u8> {
    fn put_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn put_i32(&mut self, value: i32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn put_i64(&mut self, value: i64) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn put_guid(&mut self, value: &Uuid) {
        self.extend_from_slice(&value.to_bytes_le());
    }
}
