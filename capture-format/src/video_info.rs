// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! `VIDEOINFOHEADER` / `VIDEOINFOHEADER2` format blocks.
//!
//! Both records end with a 40-byte `BITMAPINFOHEADER` describing the frame:
//! ```text
//! VIDEOINFOHEADER   rcSource(16) rcTarget(16) dwBitRate(4) dwBitErrorRate(4)
//!                   AvgTimePerFrame(8) bmiHeader(40)                       = 88
//! VIDEOINFOHEADER2  rcSource(16) rcTarget(16) dwBitRate(4) dwBitErrorRate(4)
//!                   AvgTimePerFrame(8) dwInterlaceFlags(4) dwCopyProtectFlags(4)
//!                   dwPictAspectRatioX(4) dwPictAspectRatioY(4)
//!                   dwControlFlags(4) dwReserved2(4) bmiHeader(40)         = 112
//! ```
//! A positive `biHeight` is a bottom-up image, a negative one is top-down.

use crate::{
    FormatError, FourCc, Result,
    le::{LeReader, LeWriter},
    time::ReferenceTime,
};

/// Size of a `BITMAPINFOHEADER`.
pub const BITMAP_INFO_HEADER_SIZE: usize = 40;

/// Size of a `VIDEOINFOHEADER`.
pub const VIDEO_INFO_HEADER_SIZE: usize = 88;

/// Size of a `VIDEOINFOHEADER2`.
pub const VIDEO_INFO_HEADER2_SIZE: usize = 112;

/// Bits per pixel of an I420 frame (8 luma + 4 averaged chroma).
pub const I420_BIT_COUNT: u16 = 12;

/// Returns the stride of one DIB row in bytes, rounded up to 32 bits
/// (`WIDTHBYTES(width * bit_count)`).
pub fn dib_width_bytes(width: i32, bit_count: u16) -> u64 {
    let bits = width.unsigned_abs() as u64 * bit_count as u64;
    ((bits + 31) & !31) / 8
}

/// A rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// An empty rectangle means "the whole image".
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    fn read(reader: &mut LeReader<'_>) -> Result<Self> {
        Ok(Rect {
            left: reader.i32()?,
            top: reader.i32()?,
            right: reader.i32()?,
            bottom: reader.i32()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.put_i32(self.left);
        out.put_i32(self.top);
        out.put_i32(self.right);
        out.put_i32(self.bottom);
    }
}

/// Frame description shared by both video info records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub size: u32,
    pub width: i32,
    /// Signed: negative for top-down images.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: FourCc,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

impl BitmapInfoHeader {
    /// Describes a single-plane I420 frame with its image size filled in.
    pub fn i420(width: i32, height: i32) -> Self {
        let mut header = BitmapInfoHeader {
            size: BITMAP_INFO_HEADER_SIZE as u32,
            width,
            height,
            planes: 1,
            bit_count: I420_BIT_COUNT,
            compression: FourCc::I420,
            ..Default::default()
        };
        header.size_image = header.dib_size();
        header
    }

    /// Image size in bytes as computed by `DIBSIZE`: row stride times the
    /// absolute height. Saturates at `u32::MAX`.
    pub fn dib_size(&self) -> u32 {
        let size = dib_width_bytes(self.width, self.bit_count) * self.height.unsigned_abs() as u64;
        u32::try_from(size).unwrap_or(u32::MAX)
    }

    fn read(record: &'static str, reader: &mut LeReader<'_>) -> Result<Self> {
        let header = BitmapInfoHeader {
            size: reader.u32()?,
            width: reader.i32()?,
            height: reader.i32()?,
            planes: reader.u16()?,
            bit_count: reader.u16()?,
            compression: FourCc(reader.u32()?),
            size_image: reader.u32()?,
            x_pels_per_meter: reader.i32()?,
            y_pels_per_meter: reader.i32()?,
            clr_used: reader.u32()?,
            clr_important: reader.u32()?,
        };
        if header.width <= 0 {
            return Err(FormatError::invalid(
                record,
                format!("biWidth {} is not positive", header.width),
            ));
        }
        if header.height == 0 {
            return Err(FormatError::invalid(record, "biHeight is zero"));
        }
        Ok(header)
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.put_u32(self.size);
        out.put_i32(self.width);
        out.put_i32(self.height);
        out.put_u16(self.planes);
        out.put_u16(self.bit_count);
        out.put_u32(self.compression.0);
        out.put_u32(self.size_image);
        out.put_i32(self.x_pels_per_meter);
        out.put_i32(self.y_pels_per_meter);
        out.put_u32(self.clr_used);
        out.put_u32(self.clr_important);
    }
}

/// A decoded `VIDEOINFOHEADER`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoInfoHeader {
    pub source: Rect,
    pub target: Rect,
    pub bit_rate: u32,
    pub bit_error_rate: u32,
    pub avg_time_per_frame: ReferenceTime,
    pub bmi: BitmapInfoHeader,
}

impl VideoInfoHeader {
    /// Decodes a format block.
    ///
    /// # Errors
    ///
    /// [`FormatError::Truncated`] for blocks shorter than 88 bytes, and
    /// [`FormatError::Invalid`] when the frame width is not positive or the
    /// height is zero.
    pub fn parse(block: &[u8]) -> Result<Self> {
        const RECORD: &str = "VIDEOINFOHEADER";
        if block.len() < VIDEO_INFO_HEADER_SIZE {
            return Err(FormatError::truncated(
                RECORD,
                VIDEO_INFO_HEADER_SIZE,
                block.len(),
            ));
        }
        let mut reader = LeReader::new(RECORD, block);
        Ok(Self {
            source: Rect::read(&mut reader)?,
            target: Rect::read(&mut reader)?,
            bit_rate: reader.u32()?,
            bit_error_rate: reader.u32()?,
            avg_time_per_frame: reader.i64()?,
            bmi: BitmapInfoHeader::read(RECORD, &mut reader)?,
        })
    }

    /// Encodes this record as an 88-byte format block.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VIDEO_INFO_HEADER_SIZE);
        self.source.write(&mut out);
        self.target.write(&mut out);
        out.put_u32(self.bit_rate);
        out.put_u32(self.bit_error_rate);
        out.put_i64(self.avg_time_per_frame);
        self.bmi.write(&mut out);
        out
    }
}

/// A decoded `VIDEOINFOHEADER2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoInfoHeader2 {
    pub source: Rect,
    pub target: Rect,
    pub bit_rate: u32,
    pub bit_error_rate: u32,
    pub avg_time_per_frame: ReferenceTime,
    pub interlace_flags: u32,
    pub copy_protect_flags: u32,
    pub pict_aspect_ratio_x: u32,
    pub pict_aspect_ratio_y: u32,
    pub control_flags: u32,
    pub reserved2: u32,
    pub bmi: BitmapInfoHeader,
}

impl VideoInfoHeader2 {
    /// Decodes a format block. Same error rules as [`VideoInfoHeader::parse`]
    /// with a 112-byte minimum.
    pub fn parse(block: &[u8]) -> Result<Self> {
        const RECORD: &str = "VIDEOINFOHEADER2";
        if block.len() < VIDEO_INFO_HEADER2_SIZE {
            return Err(FormatError::truncated(
                RECORD,
                VIDEO_INFO_HEADER2_SIZE,
                block.len(),
            ));
        }
        let mut reader = LeReader::new(RECORD, block);
        Ok(Self {
            source: Rect::read(&mut reader)?,
            target: Rect::read(&mut reader)?,
            bit_rate: reader.u32()?,
            bit_error_rate: reader.u32()?,
            avg_time_per_frame: reader.i64()?,
            interlace_flags: reader.u32()?,
            copy_protect_flags: reader.u32()?,
            pict_aspect_ratio_x: reader.u32()?,
            pict_aspect_ratio_y: reader.u32()?,
            control_flags: reader.u32()?,
            reserved2: reader.u32()?,
            bmi: BitmapInfoHeader::read(RECORD, &mut reader)?,
        })
    }

    /// Encodes this record as a 112-byte format block.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VIDEO_INFO_HEADER2_SIZE);
        self.source.write(&mut out);
        self.target.write(&mut out);
        out.put_u32(self.bit_rate);
        out.put_u32(self.bit_error_rate);
        out.put_i64(self.avg_time_per_frame);
        out.put_u32(self.interlace_flags);
        out.put_u32(self.copy_protect_flags);
        out.put_u32(self.pict_aspect_ratio_x);
        out.put_u32(self.pict_aspect_ratio_y);
        out.put_u32(self.control_flags);
        out.put_u32(self.reserved2);
        self.bmi.write(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dib_size_rounds_rows_to_dwords() {
        // 640 * 12 bits = 960 bytes per row, already aligned.
        assert_eq!(BitmapInfoHeader::i420(640, 480).size_image, 960 * 480);
        // 3 * 12 bits = 36 bits -> 64 bits -> 8 bytes per row.
        assert_eq!(BitmapInfoHeader::i420(3, -2).dib_size(), 16);
    }

    #[test]
    fn encoded_sizes_match_layout() {
        let v1 = VideoInfoHeader {
            bmi: BitmapInfoHeader::i420(320, 240),
            ..Default::default()
        };
        assert_eq!(v1.to_bytes().len(), VIDEO_INFO_HEADER_SIZE);
        let v2 = VideoInfoHeader2 {
            bmi: BitmapInfoHeader::i420(320, 240),
            ..Default::default()
        };
        assert_eq!(v2.to_bytes().len(), VIDEO_INFO_HEADER2_SIZE);
    }

    #[test]
    fn empty_rect_covers_whole_image() {
        assert!(Rect::default().is_empty());
        assert!(
            !Rect {
                left: 0,
                top: 0,
                right: 4,
                bottom: 4
            }
            .is_empty()
        );
    }
}
