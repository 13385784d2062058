// IO capability codes
pub const IO_CAP_DISPLAY_ONLY: u8 = 0x00;
pub const IO_CAP_DISPLAY_YES_NO: u8 = 0x01;
pub const IO_CAP_KEYBOARD_ONLY: u8 = 0x02;
pub const IO_CAP_NO_INPUT_NO_OUTPUT: u8 = 0x03;
pub const IO_CAP_KEYBOARD_DISPLAY: u8 = 0x04;

// Default encryption key size in bytes
pub const DEFAULT_ENC_KEY_SIZE: u8 = 16;

// Reason code sent when aborting an in-progress pairing
pub const TERM_AUTH_REASON: u8 = 3;
