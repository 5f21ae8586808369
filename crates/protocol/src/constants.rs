/// Byte the client must send before anything else on a fresh connection.
pub const UNLOCK_SIGNAL: u8 = 0x01;

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 9001;

/// Largest payload a single frame may carry.
///
/// Applies to identity strings, request paths and directory entry names.
/// A zero length is equally invalid except as the end-of-listing marker.
pub const MAX_FRAME_LEN: usize = 4096;

/// Chunk size for streaming file contents in either direction.
pub const CHUNK_SIZE: usize = 4096;

/// Identity strings longer than this are truncated, not rejected.
pub const MAX_IDENTITY_LEN: usize = 255;
