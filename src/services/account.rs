//! Account service
//!
//! Runs the credential flow around the crypto core: hash the password once at
//! login and persist the hash, then re-derive the session key from the stored
//! hash whenever a [`CipherBox`] is needed. The password and the derived key
//! are never written to disk.

use chrono::Utc;
use tracing::{debug, info};

use crate::config::{AccountSettings, CryptPaths, Settings};
use crate::crypto::{CipherBox, KeyDeriver, SecureString};
use crate::error::{CryptError, CryptResult};

/// Service for login, logout and session keys
pub struct AccountService<'a> {
    paths: &'a CryptPaths,
    deriver: KeyDeriver,
}

impl<'a> AccountService<'a> {
    /// Create an account service using the default derivation parameters
    pub fn new(paths: &'a CryptPaths) -> Self {
        Self::with_deriver(paths, KeyDeriver::default())
    }

    /// Create an account service with custom derivation parameters
    pub fn with_deriver(paths: &'a CryptPaths, deriver: KeyDeriver) -> Self {
        Self { paths, deriver }
    }

    /// Hash the password and store the account credentials
    ///
    /// Replaces any previously stored account. Blocks for one PBKDF2 pass.
    pub fn login(
        &self,
        settings: &mut Settings,
        account_id: &str,
        password: &SecureString,
        password_salt: &str,
        key_salt: &str,
    ) -> CryptResult<AccountSettings> {
        require_non_empty("Account id", account_id)?;
        if account_id.trim() != account_id {
            return Err(CryptError::Validation(
                "Account id cannot have leading or trailing whitespace".into(),
            ));
        }
        require_non_empty("Password salt", password_salt)?;
        require_non_empty("Key salt", key_salt)?;

        debug!(account_id, "hashing password");
        let password_hash = self.deriver.hash_password(password, password_salt);

        let account = AccountSettings {
            account_id: account_id.to_string(),
            password_hash,
            key_salt: key_salt.to_string(),
            logged_in_at: Utc::now(),
        };

        settings.account = Some(account.clone());
        settings.save(self.paths)?;

        info!(account_id, "logged in");
        Ok(account)
    }

    /// Re-hash a new password for the stored account
    ///
    /// Envelopes produced under the old key cannot be opened with the new one.
    pub fn change_password(
        &self,
        settings: &mut Settings,
        new_password: &SecureString,
        password_salt: &str,
    ) -> CryptResult<()> {
        require_non_empty("Password salt", password_salt)?;

        let account = settings.account.as_mut().ok_or(CryptError::NotLoggedIn)?;
        account.password_hash = self.deriver.hash_password(new_password, password_salt);
        account.logged_in_at = Utc::now();
        let account_id = account.account_id.clone();

        settings.save(self.paths)?;

        info!(account_id = %account_id, "password changed");
        Ok(())
    }

    /// Forget the stored account; returns whether one was stored
    pub fn logout(&self, settings: &mut Settings) -> CryptResult<bool> {
        let Some(account) = settings.account.take() else {
            return Ok(false);
        };

        settings.save(self.paths)?;

        info!(account_id = %account.account_id, "logged out");
        Ok(true)
    }

    /// Derive the session key from the stored credentials
    ///
    /// Blocks for one PBKDF2 pass; keep the returned box for the session.
    pub fn open_session(&self, settings: &Settings) -> CryptResult<CipherBox> {
        let account = settings.account.as_ref().ok_or(CryptError::NotLoggedIn)?;

        debug!(account_id = %account.account_id, "deriving session key");
        let key = self.deriver.create_key(
            account.password_hash.as_str(),
            &account.account_id,
            &account.key_salt,
        );

        Ok(CipherBox::new(key))
    }
}

fn require_non_empty(what: &str, value: &str) -> CryptResult<()> {
    if value.is_empty() {
        return Err(CryptError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{create_key, hash_password};
    use tempfile::TempDir;

    const SALT_1: &str = "abcdefghijklmnopqrstuvwxyz";
    const SALT_2: &str = "zyxwvutsrqponmlkjihgfedcba";
    const ACCOUNT_ID: &str = "aabss-fjfj11-jfjf00-jj";

    fn setup() -> (TempDir, CryptPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CryptPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    fn fast(paths: &CryptPaths) -> AccountService<'_> {
        AccountService::with_deriver(paths, KeyDeriver::with_iterations(1))
    }

    #[test]
    fn test_login_persists_hash_not_password() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);
        let mut settings = Settings::default();

        let account = service
            .login(
                &mut settings,
                ACCOUNT_ID,
                &SecureString::new("hunter2-password"),
                SALT_1,
                SALT_2,
            )
            .unwrap();

        assert_eq!(account.account_id, ACCOUNT_ID);
        let raw = std::fs::read_to_string(paths.settings_file()).unwrap();
        assert!(!raw.contains("hunter2-password"));
        assert!(raw.contains(account.password_hash.as_str()));

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.account, Some(account));
    }

    #[test]
    fn test_login_matches_free_functions() {
        let (_temp_dir, paths) = setup();
        let service = AccountService::new(&paths);
        let mut settings = Settings::default();

        let account = service
            .login(
                &mut settings,
                ACCOUNT_ID,
                &SecureString::new("password"),
                SALT_1,
                SALT_2,
            )
            .unwrap();
        assert_eq!(account.password_hash, hash_password("password", SALT_1));

        let session = service.open_session(&settings).unwrap();
        let expected = CipherBox::new(create_key(
            account.password_hash.as_str(),
            ACCOUNT_ID,
            SALT_2,
        ));
        let envelope = session.encrypt_string("hello");
        assert_eq!(expected.decrypt(&envelope).unwrap(), "hello");
    }

    #[test]
    fn test_session_survives_reload() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);
        let mut settings = Settings::default();
        service
            .login(&mut settings, ACCOUNT_ID, &SecureString::new("pw"), SALT_1, SALT_2)
            .unwrap();
        let envelope = service
            .open_session(&settings)
            .unwrap()
            .encrypt_string("persisted");

        let reloaded = Settings::load_or_create(&paths).unwrap();
        let session = service.open_session(&reloaded).unwrap();
        assert_eq!(session.decrypt(&envelope).unwrap(), "persisted");
    }

    #[test]
    fn test_open_session_requires_login() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);

        let result = service.open_session(&Settings::default());
        assert!(matches!(result, Err(CryptError::NotLoggedIn)));
    }

    #[test]
    fn test_login_validates_inputs() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);
        let mut settings = Settings::default();
        let password = SecureString::new("pw");

        let err = service
            .login(&mut settings, "  ", &password, SALT_1, SALT_2)
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .login(&mut settings, ACCOUNT_ID, &password, "", SALT_2)
            .unwrap_err();
        assert!(err.is_validation());

        assert!(!settings.is_logged_in());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_login_rejects_padded_account_id() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);
        let mut settings = Settings::default();
        let password = SecureString::new("pw");

        for padded in [" aabss", "aabss\n", "\taabss "] {
            let err = service
                .login(&mut settings, padded, &password, SALT_1, SALT_2)
                .unwrap_err();
            assert!(err.is_validation(), "{:?} should be rejected", padded);
        }
        assert!(!settings.is_logged_in());

        // Interior whitespace is part of the opaque id
        let account = service
            .login(&mut settings, "a b", &password, SALT_1, SALT_2)
            .unwrap();
        assert_eq!(account.account_id, "a b");
    }

    #[test]
    fn test_change_password_changes_key() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);
        let mut settings = Settings::default();
        service
            .login(&mut settings, ACCOUNT_ID, &SecureString::new("old"), SALT_1, SALT_2)
            .unwrap();
        let old_envelope = service
            .open_session(&settings)
            .unwrap()
            .encrypt_string("a message long enough to span three AES blocks");

        service
            .change_password(&mut settings, &SecureString::new("new"), SALT_1)
            .unwrap();

        let new_session = service.open_session(&settings).unwrap();
        assert!(new_session.decrypt(&old_envelope).is_err());
        assert_eq!(
            settings.account.as_ref().unwrap().account_id,
            ACCOUNT_ID
        );
    }

    #[test]
    fn test_logout() {
        let (_temp_dir, paths) = setup();
        let service = fast(&paths);
        let mut settings = Settings::default();
        service
            .login(&mut settings, ACCOUNT_ID, &SecureString::new("pw"), SALT_1, SALT_2)
            .unwrap();

        assert!(service.logout(&mut settings).unwrap());
        assert!(!service.logout(&mut settings).unwrap());

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.is_logged_in());
    }
}
