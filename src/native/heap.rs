// Native heap abstraction for buffers the MQ library reads and rewrites in place.
// The library mutates these buffers between encode and decode, so they must live
// on the C heap, not in Rust-managed memory.

use std::fmt::Debug;
use std::io;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

/// Allocation boundary for foreign-owned buffers.
///
/// Every pointer handed out by `alloc` must be returned to `free` on the same
/// heap exactly once. The marshaling layer upholds this pairing internally;
/// implementations only provide the raw storage.
pub trait NativeHeap: Send + Sync + Debug {
    /// Allocate `size` bytes of uninitialized storage.
    ///
    /// # Returns
    /// * A non-null pointer, or `io::ErrorKind::OutOfMemory` on exhaustion.
    ///   Out-of-memory is unrecoverable at this layer and is propagated as-is.
    fn alloc(&self, size: usize) -> io::Result<NonNull<u8>>;

    /// Release storage previously returned by `alloc`.
    ///
    /// # Safety
    /// `ptr` must have come from `alloc` on this same heap and must not be
    /// freed more than once or used afterwards.
    unsafe fn free(&self, ptr: *mut u8);
}

/// The production heap: `libc::malloc` / `libc::free`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcHeap;

/// Shared instance for callers that do not need a custom heap.
pub static LIBC_HEAP: LibcHeap = LibcHeap;

impl NativeHeap for LibcHeap {
    fn alloc(&self, size: usize) -> io::Result<NonNull<u8>> {
        // malloc(0) may legally return NULL; always request at least one byte
        let request = size.max(1);
        let ptr = unsafe { libc::malloc(request) } as *mut u8;
        NonNull::new(ptr).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::OutOfMemory,
                format!("native heap allocation of {} bytes failed", request),
            )
        })
    }

    unsafe fn free(&self, ptr: *mut u8) {
        if !ptr.is_null() {
            libc::free(ptr as *mut libc::c_void);
        }
    }
}

/// Wraps another heap and counts allocations and releases.
///
/// Used to verify the matched-pair contract: after every decode that follows an
/// encode, `outstanding()` must be back to its pre-encode value. Also handy for
/// monitoring long-running callers for drift.
#[derive(Debug)]
pub struct TrackingHeap<H: NativeHeap> {
    inner: H,
    live: AtomicU64,
    total: AtomicU64,
}

impl<H: NativeHeap> TrackingHeap<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            live: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Number of allocations not yet released.
    pub fn outstanding(&self) -> u64 {
        self.live.load(Ordering::SeqCst)
    }

    /// Total allocations made through this heap since construction.
    pub fn total_allocations(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

impl<H: NativeHeap> NativeHeap for TrackingHeap<H> {
    fn alloc(&self, size: usize) -> io::Result<NonNull<u8>> {
        let ptr = self.inner.alloc(size)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        Ok(ptr)
    }

    unsafe fn free(&self, ptr: *mut u8) {
        if !ptr.is_null() {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
        self.inner.free(ptr);
    }
}
