//! 配置存储层
//! 角色与用户偏好都以 INI 文档的形式保存在可替换的后端中

pub mod ini_document;
pub mod ini_file;
pub mod memory;

pub use ini_document::{reserved_char, IniDocument, IniSection};
pub use ini_file::IniFileBackend;
pub use memory::MemoryBackend;

use crate::error::AppError;

/// 角色配置文档名
pub const ROLES_DOCUMENT: &str = "roles";
/// 全局配置文档名
pub const APP_DOCUMENT: &str = "config";
/// 全局配置中保存默认偏好的节
pub const GLOBAL_SECTION: &str = "global";

/// 配置后端：按名称整体读取/写回 INI 文档
pub trait ConfigBackend: Send + Sync {
    /// 读取文档，文档不存在时返回空文档
    fn load(&self, name: &str) -> Result<IniDocument, AppError>;

    /// 整体写回文档
    fn save(&self, name: &str, document: &IniDocument) -> Result<(), AppError>;
}
