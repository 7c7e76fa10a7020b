// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Well-known media type identifiers.
//!
//! Major types, subtypes and format types are 128-bit GUIDs. Subtypes for
//! uncompressed formats are derived from a FourCC or wave format tag placed in
//! the first field of a fixed base GUID (`XXXXXXXX-0000-0010-8000-00AA00389B71`).

use uuid::Uuid;

use crate::FourCc;

/// A media type GUID.
pub type Guid = Uuid;

/// Trailing bytes shared by every FourCC-derived subtype GUID.
const FOURCC_BASE_TAIL: [u8; 8] = [0x80, 0x00, 0x00, 0xaa, 0x00, 0x38, 0x9b, 0x71];

/// Builds the GUID whose first field is `code`, on the FourCC base GUID.
///
/// Used for both FourCC video subtypes and wave format tag audio subtypes.
pub const fn guid_from_code(code: u32) -> Guid {
    Uuid::from_fields(code, 0x0000, 0x0010, &FOURCC_BASE_TAIL)
}

/// Returns the FourCC code embedded in a FourCC-derived GUID, if `guid` is one.
pub fn fourcc_of(guid: &Guid) -> Option<FourCc> {
    let (code, d2, d3, tail) = guid.as_fields();
    (d2 == 0x0000 && d3 == 0x0010 && *tail == FOURCC_BASE_TAIL).then_some(FourCc(code))
}

/// Major type for uncompressed and compressed audio.
pub const MEDIATYPE_AUDIO: Guid = guid_from_code(u32::from_le_bytes(*b"auds"));

/// Major type for video.
pub const MEDIATYPE_VIDEO: Guid = guid_from_code(u32::from_le_bytes(*b"vids"));

/// Integer PCM audio subtype (wave format tag 1).
pub const MEDIASUBTYPE_PCM: Guid = guid_from_code(0x0001);

/// IEEE floating point audio subtype (wave format tag 3).
pub const MEDIASUBTYPE_IEEE_FLOAT: Guid = guid_from_code(0x0003);

/// Planar YUV 4:2:0 video subtype.
pub const MEDIASUBTYPE_I420: Guid = FourCc::I420.subtype();

/// Format block holds a `WAVEFORMATEX` (optionally `WAVEFORMATEXTENSIBLE`).
pub const FORMAT_WAVE_FORMAT_EX: Guid = Uuid::from_u128(0x05589f81_c356_11ce_bf01_00aa0055595a);

/// Format block holds a `VIDEOINFOHEADER`.
pub const FORMAT_VIDEO_INFO: Guid = Uuid::from_u128(0x05589f80_c356_11ce_bf01_00aa0055595a);

/// Format block holds a `VIDEOINFOHEADER2`.
pub const FORMAT_VIDEO_INFO2: Guid = Uuid::from_u128(0xf72a76a0_eb0a_11d0_ace4_0000c0cc16ba);

/// Returns a short human-readable name for the well-known GUIDs above.
///
/// Other FourCC-derived subtypes render as `MEDIASUBTYPE_<code>`; anything
/// else renders as its hyphenated string form.
pub fn guid_name(guid: &Guid) -> String {
    match *guid {
        MEDIATYPE_AUDIO => "MEDIATYPE_Audio".to_string(),
        MEDIATYPE_VIDEO => "MEDIATYPE_Video".to_string(),
        MEDIASUBTYPE_PCM => "MEDIASUBTYPE_PCM".to_string(),
        MEDIASUBTYPE_IEEE_FLOAT => "MEDIASUBTYPE_IEEE_FLOAT".to_string(),
        MEDIASUBTYPE_I420 => "MEDIASUBTYPE_I420".to_string(),
        FORMAT_WAVE_FORMAT_EX => "FORMAT_WaveFormatEx".to_string(),
        FORMAT_VIDEO_INFO => "FORMAT_VideoInfo".to_string(),
        FORMAT_VIDEO_INFO2 => "FORMAT_VideoInfo2".to_string(),
        other => match fourcc_of(&other) {
            Some(code) => format!("MEDIASUBTYPE_{code}"),
            None => other.hyphenated().to_string(),
        },
    }
}
