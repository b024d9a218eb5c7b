//! LocalStorage 封装模块
//!
//! `KeyValueStore` 是会话层依赖的存储接口；浏览器中由 `BrowserStorage`
//! 通过 `gloo-storage` 实现。

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

/// 键值存储接口
pub trait KeyValueStore {
    /// 读取字符串值，键不存在或出错时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 写入字符串值，成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除键值对，成功返回 `true`
    fn delete(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage
///
/// 无浏览器环境（原生目标、禁用存储的隐私模式）下读取返回 `None`，写入为空操作。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn available() -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .is_some()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        use gloo_storage::{LocalStorage, Storage};

        if !Self::available() {
            return None;
        }
        LocalStorage::get::<String>(key).ok()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        use gloo_storage::{LocalStorage, Storage};

        Self::available() && LocalStorage::set(key, value).is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        use gloo_storage::{LocalStorage, Storage};

        if !Self::available() {
            return false;
        }
        LocalStorage::delete(key);
        true
    }
}

/// 内存存储，测试用
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key).is_some()
    }
}
