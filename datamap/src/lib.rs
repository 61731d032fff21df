pub use batch::*;
pub use storage::*;

mod batch;
mod storage;
