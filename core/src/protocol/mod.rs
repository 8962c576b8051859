//! The ASCII `angle,distance.` wire format.

pub mod buffer;
pub mod frame;
pub mod reading;

pub use buffer::RawFrameBuffer;
pub use frame::{FrameDecoder, DEFAULT_FRAME_CAPACITY, FRAME_DELIMITER};
pub use reading::{Reading, MAX_ANGLE_DEG};
