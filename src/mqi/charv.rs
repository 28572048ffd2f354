// Variable-length string records (MQCHARV).
//
// Encode and decode are expected to be called as matching pairs around each
// native call. That lets us allocate the backing buffer on the native heap in
// the encode step and free it in the decode step. If the input string is
// empty, we still allocate a fixed-capacity buffer so the native call has
// room to write an output value; the decode step frees it unconditionally,
// because both branches of encode allocate.

use crate::mqi::constants::{Mqlong, Mqptr, MQCCSI_APPL};
use crate::native::heap::NativeHeap;
use std::io;
use std::ptr::{self, NonNull};

/// Capacity of the placeholder buffer attached to empty fields.
///
/// Must be at least the native library's documented maximum output size for
/// any MQCHARV field; taken from the MQI client convention, not tunable.
pub const VS_BUFFER_SIZE: usize = 10240;

/// Native variable-length string record, matching the MQCHARV layout.
#[repr(C)]
#[derive(Debug)]
pub struct Mqcharv {
    /// Address of the character data on the native heap.
    pub vs_ptr: Mqptr,
    /// Offset of the data within the buffer (unused by this layer, copied verbatim).
    pub vs_offset: Mqlong,
    /// Capacity of the buffer in bytes; set only for output placeholders.
    pub vs_buf_size: Mqlong,
    /// Length of the data in bytes.
    pub vs_length: Mqlong,
    /// Character-set identifier of the data.
    pub vs_ccsid: Mqlong,
}

impl Default for Mqcharv {
    fn default() -> Self {
        Self {
            vs_ptr: ptr::null_mut(),
            vs_offset: 0,
            vs_buf_size: 0,
            vs_length: 0,
            vs_ccsid: 0,
        }
    }
}

/// An owned native-heap buffer backing one MQCHARV record.
///
/// Exists only between allocation and attachment inside encode; pairing every
/// allocation with exactly one release happens through this type rather than
/// through discipline at the call sites.
struct VsBuffer {
    ptr: NonNull<u8>,
    len: usize,
    buf_size: usize,
}

impl VsBuffer {
    /// Placeholder for a field the native call may write an output into.
    fn for_output(heap: &dyn NativeHeap) -> io::Result<Self> {
        let ptr = heap.alloc(VS_BUFFER_SIZE)?;
        Ok(Self {
            ptr,
            len: 0,
            buf_size: VS_BUFFER_SIZE,
        })
    }

    /// Exact-fit copy of a non-empty source string, NUL-terminated.
    fn from_str(src: &str, heap: &dyn NativeHeap) -> io::Result<Self> {
        let ptr = heap.alloc(src.len() + 1)?;
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), src.len());
            *ptr.as_ptr().add(src.len()) = 0;
        }
        Ok(Self {
            ptr,
            len: src.len(),
            buf_size: 0,
        })
    }

    /// Transfer ownership of the buffer into the native record.
    fn attach(self, vs: &mut Mqcharv) {
        vs.vs_ptr = self.ptr.as_ptr() as Mqptr;
        vs.vs_length = self.len as Mqlong;
        vs.vs_buf_size = self.buf_size as Mqlong;
        vs.vs_ccsid = MQCCSI_APPL;
    }
}

/// Encode a string into a native MQCHARV record.
///
/// Empty sources get a `VS_BUFFER_SIZE` output placeholder with its capacity
/// recorded in `vs_buf_size`; non-empty sources get an exact-fit buffer with
/// `vs_length` set to the byte length. Either way the record owns a native
/// allocation afterwards, which the matching [`get_mqi_charv`] releases.
pub fn set_mqi_charv(vs: &mut Mqcharv, src: &str, heap: &dyn NativeHeap) -> io::Result<()> {
    let buf = if src.is_empty() {
        VsBuffer::for_output(heap)?
    } else {
        VsBuffer::from_str(src, heap)?
    };
    buf.attach(vs);
    Ok(())
}

/// Decode a native MQCHARV record and release its buffer.
///
/// Reads back exactly `vs_length` bytes, then frees the buffer whether it was
/// the empty-output placeholder or an exact-fit allocation, and nulls the
/// pointer so the record cannot be released twice.
///
/// # Safety
/// `vs` must have been populated by [`set_mqi_charv`] with the same `heap`
/// (and possibly mutated by the native call since); `vs_ptr` must be valid
/// for `vs_length` bytes of reads.
pub unsafe fn get_mqi_charv(vs: &mut Mqcharv, heap: &dyn NativeHeap) -> String {
    let out = if vs.vs_ptr.is_null() || vs.vs_length <= 0 {
        String::new()
    } else {
        let bytes = std::slice::from_raw_parts(vs.vs_ptr as *const u8, vs.vs_length as usize);
        String::from_utf8_lossy(bytes).into_owned()
    };
    release_mqi_charv(vs, heap);
    out
}

/// Release a record's buffer without reading it.
///
/// Used by the decode path and by encode's failure unwinding. Idempotent:
/// a record with a null pointer is left untouched.
///
/// # Safety
/// Same ownership requirements as [`get_mqi_charv`].
pub(crate) unsafe fn release_mqi_charv(vs: &mut Mqcharv, heap: &dyn NativeHeap) {
    if !vs.vs_ptr.is_null() {
        heap.free(vs.vs_ptr as *mut u8);
        vs.vs_ptr = ptr::null_mut();
    }
    vs.vs_length = 0;
    vs.vs_buf_size = 0;
}
