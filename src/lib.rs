// Module naming follows MQI convention (MQOD = MQ Object Descriptor, MQCHARV = variable-length char)
pub mod mqi {
    pub mod charv;
    pub mod constants;
    pub mod mqod;
    pub mod strings;
    pub use charv::{Mqcharv, VS_BUFFER_SIZE}; // re-export for stable path
    pub use mqod::{Mqod, ObjectDescriptor, RecordHandle}; // re-export for stable path
}

pub mod native {
    pub mod heap;
    pub use heap::{LibcHeap, NativeHeap, TrackingHeap, LIBC_HEAP};
}
