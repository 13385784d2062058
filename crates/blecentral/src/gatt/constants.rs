// Per-PDU status marking usable entries
pub const ATT_STATUS_SUCCESS: u8 = 0;

// Descriptor UUIDs
pub const CHAR_USER_DESCRIPTION_UUID: u16 = 0x2901;
pub const CLIENT_CHAR_CONFIG_UUID: u16 = 0x2902;

// Client characteristic configuration values
pub const CCC_DISABLE: u16 = 0x0000;
pub const CCC_NOTIFY: u16 = 0x0001;
pub const CCC_INDICATE: u16 = 0x0002;
