pub mod config;
pub mod errors;
pub mod result;
pub mod util;

pub use errors::{AppError, Result};

/// 申请编号（后端分配，整数）
pub type ApplicationId = i64;
