//! 角色管理
//! 在 roles.ini 之上暂存角色的增删改，显式 save 后才写入后端

use crate::{
    error::AppError,
    models::role::{Role, RoleForm, RoleValues},
    repository::{reserved_char, ConfigBackend, IniDocument, ROLES_DOCUMENT},
};
use std::sync::Arc;

/// 角色名与授权键都会成为 roles.ini 中的节名/键名
fn check_names(name: &str, values: &RoleValues) -> Result<(), AppError> {
    if let Some(c) = reserved_char(name) {
        return Err(AppError::invalid_name(format!(
            "Role name \"{}\" must not contain {:?}",
            name.escape_debug(),
            c
        )));
    }
    for key in values.keys() {
        if let Some(c) = reserved_char(key) {
            return Err(AppError::invalid_name(format!(
                "Permission key \"{}\" must not contain {:?}",
                key.escape_debug(),
                c
            )));
        }
    }
    Ok(())
}

/// 角色集合的暂存/提交
///
/// 变更只作用于暂存副本；`save` 成功后暂存副本成为新的已提交状态，
/// 失败则回滚到上一次提交的状态。
pub struct RoleManager {
    backend: Arc<dyn ConfigBackend>,
    committed: IniDocument,
    staged: IniDocument,
}

impl RoleManager {
    /// 从后端读取当前角色集合
    pub fn open(backend: Arc<dyn ConfigBackend>) -> Result<Self, AppError> {
        let committed = backend.load(ROLES_DOCUMENT)?;
        Ok(Self {
            backend,
            staged: committed.clone(),
            committed,
        })
    }

    /// 当前（暂存）的全部角色
    pub fn list(&self) -> Vec<Role> {
        self.staged
            .sections()
            .map(|(name, values)| Role {
                name: name.to_string(),
                values: values.clone(),
            })
            .collect()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.staged.has_section(name)
    }

    pub fn get(&self, name: &str) -> Option<Role> {
        self.staged.section(name).map(|values| Role {
            name: name.to_string(),
            values: values.clone(),
        })
    }

    /// 是否有尚未保存的变更
    pub fn is_dirty(&self) -> bool {
        self.staged != self.committed
    }

    /// 新增角色
    pub fn add(&mut self, name: &str, values: RoleValues) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::invalid_name("Role name cannot be empty"));
        }
        check_names(name, &values)?;
        if self.exists(name) {
            return Err(AppError::invalid_name(format!(
                "Role \"{}\" already exists",
                name
            )));
        }

        self.staged.set_section(name, values);
        Ok(())
    }

    /// 更新角色，`name` 与 `old_name` 不同时即为重命名
    pub fn update(&mut self, name: &str, values: RoleValues, old_name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::invalid_name("Role name cannot be empty"));
        }
        check_names(name, &values)?;
        if !self.exists(old_name) {
            return Err(AppError::invalid_name(format!(
                "Role \"{}\" does not exist",
                old_name
            )));
        }
        if name != old_name && self.exists(name) {
            return Err(AppError::invalid_name(format!(
                "Role \"{}\" already exists",
                name
            )));
        }

        self.staged.remove_section(old_name);
        self.staged.set_section(name, values);
        Ok(())
    }

    /// 删除角色
    pub fn remove(&mut self, name: &str) -> Result<(), AppError> {
        if self.staged.remove_section(name).is_none() {
            return Err(AppError::invalid_name(format!(
                "Role \"{}\" does not exist",
                name
            )));
        }
        Ok(())
    }

    /// 读取角色为可编辑表单
    pub fn load(&self, name: &str) -> Result<RoleForm, AppError> {
        self.get(name)
            .map(RoleForm::from_role)
            .ok_or_else(|| AppError::invalid_name(format!("Role \"{}\" does not exist", name)))
    }

    /// 持久化暂存的角色集合
    pub fn save(&mut self) -> Result<(), AppError> {
        match self.backend.save(ROLES_DOCUMENT, &self.staged) {
            Ok(()) => {
                self.committed = self.staged.clone();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save roles, discarding staged changes");
                self.staged = self.committed.clone();
                Err(e)
            }
        }
    }
}
