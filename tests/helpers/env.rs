// Scoped environment variable guard for tests. Restores the previous value on drop.

use std::env;

#[derive(Debug)]
pub struct ScopedEnv {
    key: String,
    prev: Option<String>,
}

impl ScopedEnv {
    pub fn set<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        let key = key.into();
        let prev = env::var(&key).ok();
        env::set_var(&key, value.into());
        ScopedEnv { key, prev }
    }

    pub fn unset<K: Into<String>>(key: K) -> Self {
        let key = key.into();
        let prev = env::var(&key).ok();
        env::remove_var(&key);
        ScopedEnv { key, prev }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => env::set_var(&self.key, v),
            None => env::remove_var(&self.key),
        }
    }
}
