// The MQ Object Descriptor (MQOD) and its conversion to and from the native
// memory layout required by the client library's C API.
//
// `to_native` and `from_native` are expected to be called as matching pairs
// around each native call: encode, hand the native structure to the library,
// decode. The variable-length fields allocate in encode and free in decode,
// so skipping the decode after a successful encode leaks native memory; this
// layer does not track pairing state on the caller's behalf.

use crate::mqi::charv::{get_mqi_charv, release_mqi_charv, set_mqi_charv, Mqcharv};
use crate::mqi::constants::*;
use crate::mqi::strings::{get_mqi_string, set_mqi_bytes, set_mqi_string};
use crate::native::heap::{NativeHeap, LIBC_HEAP};
use std::io;
use std::ptr;

/// Opaque handle to a native object/response record array (MQOR/MQRR).
///
/// This layer copies the handle through in both directions and never
/// dereferences it; the records themselves are owned and interpreted by the
/// caller and the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHandle(Mqptr);

impl RecordHandle {
    pub const fn null() -> Self {
        Self(ptr::null_mut())
    }

    pub fn from_raw(ptr: Mqptr) -> Self {
        Self(ptr)
    }

    pub fn as_raw(&self) -> Mqptr {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl Default for RecordHandle {
    fn default() -> Self {
        Self::null()
    }
}

/// The native MQOD structure (version 4).
///
/// Field order, widths, and alignment mirror the published C definition; the
/// layout is an externally-imposed ABI contract verified by the layout
/// conformance tests, not a design choice of this crate.
#[repr(C)]
#[derive(Debug)]
pub struct Mqod {
    pub struc_id: [Mqchar; 4],
    pub version: Mqlong,
    pub object_type: Mqlong,
    pub object_name: [Mqchar; MQ_OBJECT_NAME_LENGTH],
    pub object_qmgr_name: [Mqchar; MQ_Q_MGR_NAME_LENGTH],
    pub dynamic_q_name: [Mqchar; MQ_OBJECT_NAME_LENGTH],
    pub alternate_user_id: [Mqchar; MQ_USER_ID_LENGTH],

    pub recs_present: Mqlong,
    pub known_dest_count: Mqlong,
    pub unknown_dest_count: Mqlong,
    pub invalid_dest_count: Mqlong,
    pub object_rec_offset: Mqlong,
    pub response_rec_offset: Mqlong,

    pub object_rec_ptr: Mqptr,
    pub response_rec_ptr: Mqptr,

    pub alternate_security_id: [Mqbyte; MQ_SECURITY_ID_LENGTH],
    pub resolved_q_name: [Mqchar; MQ_OBJECT_NAME_LENGTH],
    pub resolved_q_mgr_name: [Mqchar; MQ_Q_MGR_NAME_LENGTH],

    pub object_string: Mqcharv,
    pub selection_string: Mqcharv,
    pub res_object_string: Mqcharv,
    pub resolved_type: Mqlong,
}

impl Default for Mqod {
    fn default() -> Self {
        Self {
            struc_id: [0; 4],
            version: 0,
            object_type: 0,
            object_name: [0; MQ_OBJECT_NAME_LENGTH],
            object_qmgr_name: [0; MQ_Q_MGR_NAME_LENGTH],
            dynamic_q_name: [0; MQ_OBJECT_NAME_LENGTH],
            alternate_user_id: [0; MQ_USER_ID_LENGTH],
            recs_present: 0,
            known_dest_count: 0,
            unknown_dest_count: 0,
            invalid_dest_count: 0,
            object_rec_offset: 0,
            response_rec_offset: 0,
            object_rec_ptr: ptr::null_mut(),
            response_rec_ptr: ptr::null_mut(),
            alternate_security_id: [0; MQ_SECURITY_ID_LENGTH],
            resolved_q_name: [0; MQ_OBJECT_NAME_LENGTH],
            resolved_q_mgr_name: [0; MQ_Q_MGR_NAME_LENGTH],
            object_string: Mqcharv::default(),
            selection_string: Mqcharv::default(),
            res_object_string: Mqcharv::default(),
            resolved_type: 0,
        }
    }
}

/// Rust-native object descriptor: queue/topic identity plus resolution and
/// security metadata for one native call.
///
/// Fixed-width fields hold trimmed strings with no padding; padding and
/// truncation to the native widths happen in [`to_native`](Self::to_native).
/// The resolved fields are outputs of the native call and are read back by
/// [`from_native`](Self::from_native).
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    pub struc_id: String,
    pub version: Mqlong,
    pub object_type: Mqlong,
    pub object_name: String,
    pub object_qmgr_name: String,
    pub dynamic_q_name: String,
    pub alternate_user_id: String,

    pub recs_present: Mqlong,
    pub known_dest_count: Mqlong,
    pub unknown_dest_count: Mqlong,
    pub invalid_dest_count: Mqlong,
    pub object_rec_offset: Mqlong,
    pub response_rec_offset: Mqlong,

    pub object_rec_ptr: RecordHandle,
    pub response_rec_ptr: RecordHandle,

    pub alternate_security_id: [u8; MQ_SECURITY_ID_LENGTH],
    pub resolved_q_name: String,
    pub resolved_q_mgr_name: String,

    pub object_string: String,
    pub selection_string: String,
    pub res_object_string: String,
    pub resolved_type: Mqlong,
}

impl Default for ObjectDescriptor {
    fn default() -> Self {
        Self {
            struc_id: MQOD_STRUC_ID.to_string(),
            version: MQOD_VERSION_1,
            object_type: MQOT_Q,
            object_name: String::new(),
            object_qmgr_name: String::new(),
            dynamic_q_name: MQ_DEFAULT_DYNAMIC_Q_NAME.to_string(),
            alternate_user_id: String::new(),
            recs_present: 0,
            known_dest_count: 0,
            unknown_dest_count: 0,
            invalid_dest_count: 0,
            object_rec_offset: 0,
            response_rec_offset: 0,
            object_rec_ptr: RecordHandle::null(),
            response_rec_ptr: RecordHandle::null(),
            alternate_security_id: [0; MQ_SECURITY_ID_LENGTH],
            resolved_q_name: String::new(),
            resolved_q_mgr_name: String::new(),
            object_string: String::new(),
            selection_string: String::new(),
            res_object_string: String::new(),
            resolved_type: MQOT_NONE,
        }
    }
}

impl ObjectDescriptor {
    /// Descriptor with the documented defaults: `"OD  "` tag, version 1,
    /// queue object type, `"AMQ.*"` dynamic-queue template, zeroed security
    /// id, empty strings, resolved type `MQOT_NONE`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode this descriptor into a caller-supplied native structure,
    /// allocating variable-length buffers on `heap`.
    ///
    /// Fixed-width fields are padded or truncated to their native widths.
    /// On allocation failure the structure is left with no live buffers
    /// attached (already-made allocations are released and their pointers
    /// nulled) and the error is propagated; there is no partial-success mode.
    pub fn to_native_in(&self, od: &mut Mqod, heap: &dyn NativeHeap) -> io::Result<()> {
        set_mqi_string(&mut od.struc_id, &self.struc_id);
        od.version = self.version;
        od.object_type = self.object_type;
        set_mqi_string(&mut od.object_name, &self.object_name);
        set_mqi_string(&mut od.object_qmgr_name, &self.object_qmgr_name);
        set_mqi_string(&mut od.dynamic_q_name, &self.dynamic_q_name);
        set_mqi_string(&mut od.alternate_user_id, &self.alternate_user_id);

        od.recs_present = self.recs_present;
        od.known_dest_count = self.known_dest_count;
        od.unknown_dest_count = self.unknown_dest_count;
        od.invalid_dest_count = self.invalid_dest_count;
        od.object_rec_offset = self.object_rec_offset;
        od.response_rec_offset = self.response_rec_offset;

        od.object_rec_ptr = self.object_rec_ptr.as_raw();
        od.response_rec_ptr = self.response_rec_ptr.as_raw();

        set_mqi_bytes(&mut od.alternate_security_id, &self.alternate_security_id);
        set_mqi_string(&mut od.resolved_q_name, &self.resolved_q_name);
        set_mqi_string(&mut od.resolved_q_mgr_name, &self.resolved_q_mgr_name);

        set_mqi_charv(&mut od.object_string, &self.object_string, heap)?;
        if let Err(e) = set_mqi_charv(&mut od.selection_string, &self.selection_string, heap) {
            unsafe { release_mqi_charv(&mut od.object_string, heap) };
            return Err(e);
        }
        if let Err(e) = set_mqi_charv(&mut od.res_object_string, &self.res_object_string, heap) {
            unsafe {
                release_mqi_charv(&mut od.object_string, heap);
                release_mqi_charv(&mut od.selection_string, heap);
            }
            return Err(e);
        }

        od.resolved_type = self.resolved_type;
        Ok(())
    }

    /// Encode into `od` using the process heap. See [`to_native_in`](Self::to_native_in).
    pub fn to_native(&self, od: &mut Mqod) -> io::Result<()> {
        self.to_native_in(od, &LIBC_HEAP)
    }

    /// Decode a native structure (after the native call has mutated it) into
    /// a fresh descriptor, releasing the variable-length buffers that the
    /// matching encode allocated.
    ///
    /// # Safety
    /// `od` must have been populated by a matching
    /// [`to_native_in`](Self::to_native_in) on the same `heap` and not yet
    /// decoded; each variable-length `vs_ptr` must still be valid for
    /// `vs_length` bytes of reads. Calling this without a prior encode reads
    /// undefined native memory.
    pub unsafe fn from_native_in(od: &mut Mqod, heap: &dyn NativeHeap) -> Self {
        let mut security_id = [0u8; MQ_SECURITY_ID_LENGTH];
        for (i, b) in od.alternate_security_id.iter().enumerate() {
            security_id[i] = *b as u8;
        }

        Self {
            struc_id: get_mqi_string(&od.struc_id),
            version: od.version,
            object_type: od.object_type,
            object_name: get_mqi_string(&od.object_name),
            object_qmgr_name: get_mqi_string(&od.object_qmgr_name),
            dynamic_q_name: get_mqi_string(&od.dynamic_q_name),
            alternate_user_id: get_mqi_string(&od.alternate_user_id),

            recs_present: od.recs_present,
            known_dest_count: od.known_dest_count,
            unknown_dest_count: od.unknown_dest_count,
            invalid_dest_count: od.invalid_dest_count,
            object_rec_offset: od.object_rec_offset,
            response_rec_offset: od.response_rec_offset,

            object_rec_ptr: RecordHandle::from_raw(od.object_rec_ptr),
            response_rec_ptr: RecordHandle::from_raw(od.response_rec_ptr),

            alternate_security_id: security_id,
            resolved_q_name: get_mqi_string(&od.resolved_q_name),
            resolved_q_mgr_name: get_mqi_string(&od.resolved_q_mgr_name),

            object_string: get_mqi_charv(&mut od.object_string, heap),
            selection_string: get_mqi_charv(&mut od.selection_string, heap),
            res_object_string: get_mqi_charv(&mut od.res_object_string, heap),
            resolved_type: od.resolved_type,
        }
    }

    /// Decode from `od` using the process heap. See [`from_native_in`](Self::from_native_in).
    ///
    /// # Safety
    /// Same requirements as [`from_native_in`](Self::from_native_in); the
    /// matching encode must have used the process heap.
    pub unsafe fn from_native(od: &mut Mqod) -> Self {
        Self::from_native_in(od, &LIBC_HEAP)
    }
}
