pub mod error;
pub mod ids;
pub mod records;
pub mod status;

pub use error::{AllocationError, TrakrError, TrakrResult};
pub use ids::*;
pub use records::*;
pub use status::*;
