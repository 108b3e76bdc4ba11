//! INI 配置文档
//! 节名 -> (键 -> 值) 的内存表示，以及写回磁盘时使用的序列化

use std::collections::BTreeMap;

/// 单个节的键值对
pub type IniSection = BTreeMap<String, String>;

/// 节名与键名中不允许出现的字符（另加所有控制字符）
///
/// 它们会改变 INI 结构；`.` 会被 config crate 读成嵌套路径。
pub const RESERVED_NAME_CHARS: &[char] = &['[', ']', '=', ';', '#', '.', '"', '\\'];

/// 名称中第一个不允许的字符
pub fn reserved_char(name: &str) -> Option<char> {
    name.chars()
        .find(|c| RESERVED_NAME_CHARS.contains(c) || c.is_control())
}

/// INI 文档（节与键均按名称排序，保证重复保存得到相同内容）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: BTreeMap<String, IniSection>) -> Self {
        Self { sections }
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.get(name)
    }

    /// 读取 `section` 中的 `key`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// 写入单个键，节不存在时自动创建
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// 删除单个键；节变空时一并删除
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        let entry = self.sections.get_mut(section)?;
        let removed = entry.remove(key);
        if entry.is_empty() {
            self.sections.remove(section);
        }
        removed
    }

    /// 整体替换一个节
    pub fn set_section(&mut self, name: &str, values: IniSection) {
        self.sections.insert(name.to_string(), values);
    }

    pub fn remove_section(&mut self, name: &str) -> Option<IniSection> {
        self.sections.remove(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &IniSection)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// 第一个含有保留字符的节名或键名
    pub fn first_reserved_name(&self) -> Option<(&str, char)> {
        self.sections.iter().find_map(|(name, values)| {
            reserved_char(name)
                .map(|c| (name.as_str(), c))
                .or_else(|| {
                    values
                        .keys()
                        .find_map(|key| reserved_char(key).map(|c| (key.as_str(), c)))
                })
        })
    }

    /// 序列化为 INI 文本
    ///
    /// 空节同样写出，角色可以不带任何授权存在。
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, (name, values)) in self.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(name);
            out.push_str("]\n");
            for (key, value) in values {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&quote_value(value));
                out.push('\n');
            }
        }
        out
    }
}

fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
