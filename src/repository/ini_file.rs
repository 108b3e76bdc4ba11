//! 基于目录的 INI 文件后端
//! 读取走 config crate 的 INI 格式，写入使用临时文件 + rename 保证原子性

use super::{ConfigBackend, IniDocument, IniSection};
use crate::error::AppError;
use config::{Config, File, FileFormat};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_TEMP_ATTEMPTS: u32 = 100;

/// `<dir>/<name>.ini` 形式的文件后端
#[derive(Debug, Clone)]
pub struct IniFileBackend {
    dir: PathBuf,
}

impl IniFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 文档名只允许单级文件名，防止用户名等外部输入逃出目录
    fn path_for(&self, name: &str) -> Result<PathBuf, AppError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !valid {
            return Err(AppError::BadRequest(format!(
                "Invalid configuration name: {}",
                name
            )));
        }
        Ok(self.dir.join(format!("{}.ini", name)))
    }
}

impl ConfigBackend for IniFileBackend {
    fn load(&self, name: &str) -> Result<IniDocument, AppError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Configuration file missing, using empty document");
            return Ok(IniDocument::new());
        }

        let settings = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Ini))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let sections: BTreeMap<String, IniSection> = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        Ok(IniDocument::from_sections(sections))
    }

    fn save(&self, name: &str, document: &IniDocument) -> Result<(), AppError> {
        let path = self.path_for(name)?;
        if let Some((bad, c)) = document.first_reserved_name() {
            return Err(AppError::invalid_name(format!(
                "\"{}\" must not contain {:?}",
                bad.escape_debug(),
                c
            )));
        }
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::persistence(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let (mut file, temp_path) = create_temp_file(&self.dir, name)?;
        let written = file
            .write_all(document.render().as_bytes())
            .and_then(|_| file.sync_all());
        drop(file);

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(AppError::persistence(format!(
                "Failed to write {}: {}",
                temp_path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(AppError::persistence(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}

fn create_temp_file(dir: &Path, name: &str) -> Result<(fs::File, PathBuf), AppError> {
    let pid = std::process::id();
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let candidate = dir.join(format!(".{}.ini.tmp.{}.{}", name, pid, attempt));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::persistence(format!(
                    "Failed to create temp file in {}: {}",
                    dir.display(),
                    e
                )))
            }
        }
    }
    Err(AppError::persistence(format!(
        "Failed to create temp file in {} after {} attempts",
        dir.display(),
        MAX_TEMP_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_path_escape() {
        let backend = IniFileBackend::new("/tmp/console");
        assert!(backend.load("../passwd").is_err());
        assert!(backend.load("a/b").is_err());
        assert!(backend.load("").is_err());
    }

    #[test]
    fn test_missing_file_is_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = IniFileBackend::new(dir.path());
        let doc = backend.load("roles").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let backend = IniFileBackend::new(dir.path().join("nested"));

        let mut doc = IniDocument::new();
        doc.set("admins", "users", "alice, bob");
        doc.set("admins", "permissions", "*");
        doc.set("viewers", "groups", "staff");
        backend.save("roles", &doc).unwrap();

        let loaded = backend.load("roles").unwrap();
        assert_eq!(loaded, doc);

        // 不留下临时文件
        let leftovers: Vec<_> = fs::read_dir(backend.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_save_refuses_names_that_change_structure() {
        let dir = tempfile::tempdir().unwrap();
        let backend = IniFileBackend::new(dir.path());

        let mut forged = IniDocument::new();
        forged.set("evil]\n[admins", "permissions", "*");
        assert!(matches!(
            backend.save("roles", &forged),
            Err(AppError::InvalidName(_))
        ));

        let mut dotted = IniDocument::new();
        dotted.set("ops.team", "users", "alice");
        assert!(backend.save("roles", &dotted).is_err());

        let mut bad_key = IniDocument::new();
        bad_key.set("admins", "a=b", "x");
        assert!(backend.save("roles", &bad_key).is_err());

        assert!(!dir.path().join("roles.ini").exists());
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = IniFileBackend::new(dir.path());

        let mut doc = IniDocument::new();
        doc.set("operators", "permissions", "monitoring/command/*");
        backend.save("roles", &doc).unwrap();
        let first = fs::read_to_string(dir.path().join("roles.ini")).unwrap();
        backend.save("roles", &doc).unwrap();
        let second = fs::read_to_string(dir.path().join("roles.ini")).unwrap();

        assert_eq!(first, second);
    }
}
