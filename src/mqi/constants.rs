// MQI elementary types and the cmqc.h constants this layer depends on.
// Values are an externally-imposed ABI contract; do not change them.

use std::os::raw::{c_char, c_void};

/// MQI 32-bit signed integer (`MQLONG`).
pub type Mqlong = i32;
/// MQI character (`MQCHAR`, the platform C `char`).
pub type Mqchar = c_char;
/// MQI byte (`MQBYTE`).
pub type Mqbyte = u8;
/// MQI opaque pointer (`MQPTR`).
pub type Mqptr = *mut c_void;

// Fixed field widths (bytes)
pub const MQ_OBJECT_NAME_LENGTH: usize = 48;
pub const MQ_Q_MGR_NAME_LENGTH: usize = 48;
pub const MQ_USER_ID_LENGTH: usize = 12;
pub const MQ_SECURITY_ID_LENGTH: usize = 40;

// Object type codes
pub const MQOT_NONE: Mqlong = 0;
pub const MQOT_Q: Mqlong = 1;
pub const MQOT_NAMELIST: Mqlong = 2;
pub const MQOT_PROCESS: Mqlong = 3;
pub const MQOT_Q_MGR: Mqlong = 5;
pub const MQOT_STORAGE_CLASS: Mqlong = 6;
pub const MQOT_TOPIC: Mqlong = 8;
pub const MQOT_CHANNEL: Mqlong = 10;

/// Character-set tag for application-supplied variable-length strings.
pub const MQCCSI_APPL: Mqlong = -3;

// MQOD structure identity
pub const MQOD_STRUC_ID: &str = "OD  ";
pub const MQOD_VERSION_1: Mqlong = 1;
pub const MQOD_CURRENT_VERSION: Mqlong = 4;

/// Default model-queue name template used for dynamic queues.
pub const MQ_DEFAULT_DYNAMIC_Q_NAME: &str = "AMQ.*";
