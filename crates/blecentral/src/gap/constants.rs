// Address types
pub const PUBLIC_DEVICE_ADDRESS: u8 = 0x00;
pub const RANDOM_DEVICE_ADDRESS: u8 = 0x01;

// Connection handle reserved for a link that is still being established
pub const PENDING_CONN_HANDLE: u16 = 0xFFFE;

// Link termination reason: user terminated
pub const TERM_REASON_USER: u8 = 19;

// Scan parameter defaults
pub const DEFAULT_SCAN_DURATION: u16 = 10240;
pub const DEFAULT_SCAN_INTERVAL: u16 = 16;
pub const DEFAULT_SCAN_WINDOW: u16 = 16;

// Link parameter defaults applied to new connections
pub const DEFAULT_CONN_INTERVAL: u16 = 0x0018;
pub const DEFAULT_CONN_LATENCY: u16 = 0x0000;
pub const DEFAULT_CONN_TIMEOUT: u16 = 0x00C8;
