/// Per-cell color averaging of the master image
pub mod averaging;
/// Bitset of tiles still available for assignment
pub mod bitset;
/// Generation engine and phase orchestration
pub mod executor;
/// Scoped resource release and cancellation
pub mod lifecycle;
/// Concurrent tile resolution, decoding and resizing
pub mod loader;
/// Nearest-color tile matching policies
pub mod matching;
