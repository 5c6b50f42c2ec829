pub mod error;
pub mod knowledge;
pub mod model;
pub mod traits;
