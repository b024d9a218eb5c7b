//! 会话模块
//!
//! 持久化 Bearer Token。Token 存在即视为已认证，不校验有效期。

use crate::web::storage::KeyValueStore;
use eduweb_shared::TOKEN_STORAGE_KEY;
use std::rc::Rc;

pub struct SessionStore<S> {
    storage: Rc<S>,
}

impl<S> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Rc::clone(&self.storage),
        }
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Rc::new(storage),
        }
    }

    pub fn set_token(&self, token: &str) {
        if !self.storage.set(TOKEN_STORAGE_KEY, token) {
            leptos::logging::warn!("[Session] 无法持久化 token");
        }
    }

    /// 当前 token（空字符串视为不存在）
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(TOKEN_STORAGE_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn clear_token(&self) {
        self.storage.delete(TOKEN_STORAGE_KEY);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::MemoryStorage;

    #[test]
    fn test_token_lifecycle() {
        let session = SessionStore::new(MemoryStorage::default());
        assert!(!session.is_authenticated());

        session.set_token("tok123");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok123"));

        session.clear_token();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let session = SessionStore::new(MemoryStorage::default());
        let other = session.clone();
        session.set_token("abc");
        assert_eq!(other.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = SessionStore::new(MemoryStorage::default());
        session.set_token("");
        assert!(!session.is_authenticated());
    }
}
