// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Four-character codes identifying pixel layouts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::guid::{Guid, guid_from_code};

/// A four-character code packed little-endian into a `u32`, as stored in
/// `BITMAPINFOHEADER::biCompression`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FourCc(pub u32);

impl FourCc {
    /// Planar YUV 4:2:0, Y plane followed by U then V.
    pub const I420: FourCc = FourCc::from_bytes(*b"I420");

    /// Packs four characters the way `MAKEFOURCC` does.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        FourCc(u32::from_le_bytes(bytes))
    }

    /// Returns the four characters in order.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Returns the media subtype GUID derived from this code.
    pub const fn subtype(self) -> Guid {
        guid_from_code(self.0)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            for b in bytes {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08x}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i420_matches_makefourcc() {
        let expected = (b'I' as u32) | (b'4' as u32) << 8 | (b'2' as u32) << 16 | (b'0' as u32) << 24;
        assert_eq!(FourCc::I420.0, expected);
        assert_eq!(FourCc::I420.to_string(), "I420");
    }

    #[test]
    fn non_printable_codes_render_as_hex() {
        assert_eq!(FourCc(0).to_string(), "0x00000000");
    }
}
