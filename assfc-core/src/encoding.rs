//! Decoding of `name` table strings by platform and encoding id.

use encoding_rs::{Encoding, BIG5, EUC_KR, GBK};

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_ISO: u16 = 2;
pub const PLATFORM_WINDOWS: u16 = 3;

/// Decode a raw name string.
///
/// Returns `None` for unsupported platform/encoding pairs and for bytes
/// that are not valid in the selected encoding; callers skip such records.
pub fn decode_name(platform_id: u16, encoding_id: u16, bytes: &[u8]) -> Option<String> {
    match platform_id {
        PLATFORM_UNICODE => decode_utf16be(bytes).or_else(|| String::from_utf8(bytes.to_vec()).ok()),
        PLATFORM_MACINTOSH | PLATFORM_ISO => Some(decode_latin1(bytes)),
        PLATFORM_WINDOWS => match encoding_id {
            0 => Some(decode_latin1(bytes)),
            1 | 2 | 10 => decode_utf16be(bytes),
            3 => decode_legacy(GBK, bytes),
            4 => decode_legacy(BIG5, bytes),
            6 => decode_johab(&strip_nul(bytes)),
            _ => None,
        },
        _ => None,
    }
}

pub fn decode_utf16be(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

pub fn encode_utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Windows double-byte names are often stored as 16-bit units with a zero
/// high byte for single-byte characters.
fn strip_nul(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().filter(|&b| b != 0).collect()
}

fn decode_legacy(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(&strip_nul(bytes))
        .map(|s| s.into_owned())
}

const JOHAB_INITIAL: [i8; 32] = [
    -1, -1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1,
];

const JOHAB_MEDIAL: [i8; 32] = [
    -1, -1, -1, 0, 1, 2, 3, 4, -1, -1, 5, 6, 7, 8, 9, 10, -1, -1, 11, 12, 13, 14, 15, 16, -1, -1,
    17, 18, 19, 20, -1, -1,
];

const JOHAB_FINAL: [i8; 32] = [
    -1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, -1, 17, 18, 19, 20, 21, 22, 23,
    24, 25, 26, 27, -1, -1,
];

/// Johab (KS C 5601-1992 annex 3).
///
/// Hangul syllables are composed from their jamo indices; symbols and hanja
/// are moved to their KS X 1001 position and decoded as EUC-KR.
pub fn decode_johab(bytes: &[u8]) -> Option<String> {
    let mut out = String::new();
    let mut i = 0;

    while i < bytes.len() {
        let lead = bytes[i];
        if lead < 0x80 {
            out.push(char::from(lead));
            i += 1;
            continue;
        }
        let trail = *bytes.get(i + 1)?;
        i += 2;

        match lead {
            0x84..=0xD3 => out.push(johab_hangul(lead, trail)?),
            0xD9..=0xDE | 0xE0..=0xF9 => {
                let (k1, k2) = johab_to_ksx1001(lead, trail)?;
                let pair = [k1, k2];
                let (text, had_errors) = EUC_KR.decode_without_bom_handling(&pair);
                if had_errors {
                    return None;
                }
                out.push_str(&text);
            }
            _ => return None,
        }
    }

    Some(out)
}

fn johab_hangul(lead: u8, trail: u8) -> Option<char> {
    let code = u16::from_be_bytes([lead, trail]);
    let initial = JOHAB_INITIAL[usize::from((code >> 10) & 0x1F)];
    let medial = JOHAB_MEDIAL[usize::from((code >> 5) & 0x1F)];
    let last = JOHAB_FINAL[usize::from(code & 0x1F)];
    if initial < 0 || medial < 0 || last < 0 {
        return None;
    }
    let index = (initial as u32 * 21 + medial as u32) * 28 + last as u32;
    char::from_u32(0xAC00 + index)
}

fn johab_to_ksx1001(lead: u8, trail: u8) -> Option<(u8, u8)> {
    let row = match lead {
        0xD9..=0xDE => (lead - 0xD9) * 2 + 0xA1,
        _ => (lead - 0xE0) * 2 + 0xCA,
    };
    let offset = match trail {
        0x31..=0x7E => trail - 0x31,
        0x91..=0xFE => trail - 0x43,
        _ => return None,
    };
    if offset < 94 {
        Some((row, 0xA1 + offset))
    } else {
        Some((row + 1, 0xA1 + offset - 94))
    }
}
