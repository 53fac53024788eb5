/// Raw key bytes. Ordered byte-wise, unsigned.
pub type Key = Vec<u8>;

/// Where a record lives in the log.
///
/// Owned by the log storage layer. The index stores and returns it verbatim
/// and never looks inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LogRecordPos {
    /// Data file (segment) holding the record.
    pub file_id: u32,
    /// Byte offset of the record inside that file.
    pub offset: u64,
    /// Encoded record length in bytes.
    pub size: u32,
}

impl LogRecordPos {
    pub const fn new(file_id: u32, offset: u64, size: u32) -> Self {
        LogRecordPos {
            file_id,
            offset,
            size,
        }
    }
}

/// A key and its current log position, as copied out into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: Key,
    pub pos: LogRecordPos,
}
