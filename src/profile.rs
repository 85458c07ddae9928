use crate::error::{Error, Result};
use crate::store::{KvStore, USERNAME_KEY};

pub const DEFAULT_USERNAME: &str = "Player";

pub struct Profile<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> Profile<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn username(&self) -> String {
        match self.store.get(USERNAME_KEY) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => DEFAULT_USERNAME.to_string(),
            Err(e) => {
                log::warn!("could not read username: {}", e);
                DEFAULT_USERNAME.to_string()
            }
        }
    }

    pub fn login(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyUsername);
        }
        self.store.set(USERNAME_KEY, name)?;
        Ok(name.to_string())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(USERNAME_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DetachedStore, MemoryStore};

    #[test]
    fn username_defaults_to_player() {
        let store = MemoryStore::new();
        assert_eq!(Profile::new(&store).username(), "Player");
    }

    #[test]
    fn login_stores_trimmed_name() {
        let store = MemoryStore::new();
        let profile = Profile::new(&store);
        assert_eq!(profile.login("  Steve ").unwrap(), "Steve");
        assert_eq!(profile.username(), "Steve");
        assert_eq!(store.get("username").unwrap(), Some("Steve".to_string()));
    }

    #[test]
    fn login_rejects_blank_name() {
        let store = MemoryStore::new();
        let profile = Profile::new(&store);
        assert!(matches!(profile.login("   "), Err(Error::EmptyUsername)));
        assert_eq!(profile.username(), "Player");
    }

    #[test]
    fn logout_restores_default() {
        let store = MemoryStore::new();
        let profile = Profile::new(&store);
        profile.login("Alex").unwrap();
        profile.logout().unwrap();
        assert_eq!(profile.username(), "Player");
    }

    #[test]
    fn detached_store_keeps_default() {
        let profile = Profile::new(&DetachedStore);
        profile.login("Alex").unwrap();
        assert_eq!(profile.username(), "Player");
    }
}
