//! 数据模型

pub mod form;
pub mod preference;
pub mod role;

pub use form::*;
pub use preference::*;
pub use role::*;
