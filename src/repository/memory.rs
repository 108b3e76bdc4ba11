//! 内存后端
//! 用于测试和无状态部署，可注入写入失败

use super::{ConfigBackend, IniDocument};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, IniDocument>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有文档初始化
    pub fn with_document(self, name: &str, document: IniDocument) -> Self {
        if let Ok(mut docs) = self.documents.write() {
            docs.insert(name.to_string(), document);
        }
        self
    }

    /// 之后的每次 save 都返回 PersistenceFailure
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// 成功写入的次数
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// 读取当前持久化的文档（不存在时为空）
    pub fn snapshot(&self, name: &str) -> IniDocument {
        self.documents
            .read()
            .ok()
            .and_then(|docs| docs.get(name).cloned())
            .unwrap_or_default()
    }
}

impl ConfigBackend for MemoryBackend {
    fn load(&self, name: &str) -> Result<IniDocument, AppError> {
        let docs = self
            .documents
            .read()
            .map_err(|_| AppError::Internal("Memory backend lock poisoned".to_string()))?;
        Ok(docs.get(name).cloned().unwrap_or_default())
    }

    fn save(&self, name: &str, document: &IniDocument) -> Result<(), AppError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::persistence(format!("Refusing to write {}", name)));
        }
        let mut docs = self
            .documents
            .write()
            .map_err(|_| AppError::Internal("Memory backend lock poisoned".to_string()))?;
        docs.insert(name.to_string(), document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
