pub mod conversion;
pub mod gas;
pub mod response;

pub use conversion::*;
pub use gas::*;
pub use response::*;
