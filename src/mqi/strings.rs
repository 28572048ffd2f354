// Fixed-width field transfer primitives.
//
// MQI fixed-width character fields are blank-padded to their declared width,
// never NUL-terminated. Oversized values are truncated silently; that is the
// protocol's accepted lossy policy, not an error.

use crate::mqi::constants::{Mqbyte, Mqchar};

// MQBYTE and the Rust byte must agree in width for the element-wise casts below
const _: () = assert!(std::mem::size_of::<Mqbyte>() == std::mem::size_of::<u8>());
const _: () = assert!(std::mem::size_of::<Mqchar>() == std::mem::size_of::<u8>());

/// Write `src` into the fixed-width field `dst`.
///
/// Copies up to `dst.len()` bytes; a shorter source is space-padded to the
/// full width, a longer one is truncated to it.
pub fn set_mqi_string(dst: &mut [Mqchar], src: &str) {
    let bytes = src.as_bytes();
    let n = bytes.len().min(dst.len());
    for i in 0..n {
        dst[i] = bytes[i] as Mqchar;
    }
    for pad in dst.iter_mut().skip(n) {
        *pad = b' ' as Mqchar;
    }
}

/// Read a fixed-width field back into a logical string.
///
/// Reads exactly `src.len()` bytes and trims trailing blanks and NULs, so the
/// recovered string carries no padding artifacts.
pub fn get_mqi_string(src: &[Mqchar]) -> String {
    let mut end = src.len();
    while end > 0 {
        let b = src[end - 1] as u8;
        if b == b' ' || b == 0 {
            end -= 1;
        } else {
            break;
        }
    }
    let bytes: Vec<u8> = src[..end].iter().map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Element-wise copy into a fixed-length native byte field.
///
/// The native element type (`MQBYTE`) and the Rust byte differ nominally, so
/// each element is cast explicitly rather than block-copied. A shorter source
/// leaves the remainder zeroed; a longer one is truncated.
pub fn set_mqi_bytes(dst: &mut [Mqbyte], src: &[u8]) {
    let n = src.len().min(dst.len());
    for i in 0..n {
        dst[i] = src[i] as Mqbyte;
    }
    for pad in dst.iter_mut().skip(n) {
        *pad = 0;
    }
}

/// Element-wise copy out of a fixed-length native byte field.
pub fn get_mqi_bytes(src: &[Mqbyte]) -> Vec<u8> {
    src.iter().map(|&b| b as u8).collect()
}
