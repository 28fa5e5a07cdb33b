pub mod thought;

pub use thought::{NewThought, Thought, MESSAGE_MAX_LEN, MESSAGE_MIN_LEN};
