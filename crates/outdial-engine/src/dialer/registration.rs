//! Calling-identity registration cache.
//!
//! The registered telephony identity is a single shared credential session
//! reused across items. Re-registration only happens when the next item's
//! credential differs from the one currently registered: a small cache
//! keyed by credential with a hard invalidate-on-change policy.

use crate::contact::DialIdentity;
use crate::error::Result;
use crate::telephony::TelephonyProvider;

/// Tracks which credential is currently registered with the provider.
///
/// Owned exclusively by the worker task, so no synchronization is needed.
pub struct RegistrationCache {
    current: Option<DialIdentity>,
}

impl RegistrationCache {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Ensure `identity` is the registered credential.
    ///
    /// Returns `Ok(true)` when a (re)registration happened, `Ok(false)` on
    /// a cache hit. A provider failure invalidates the cache and
    /// propagates, so the next attempt registers from scratch.
    pub async fn ensure(
        &mut self,
        provider: &dyn TelephonyProvider,
        identity: &DialIdentity,
    ) -> Result<bool> {
        if self.current.as_ref() == Some(identity) {
            return Ok(false);
        }
        self.current = None;
        provider
            .register_identity(&identity.username, &identity.password)
            .await?;
        self.current = Some(identity.clone());
        Ok(true)
    }
}

impl Default for RegistrationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telephony::FakeTelephony;

    fn identity(user: &str) -> DialIdentity {
        DialIdentity {
            username: user.to_string(),
            password: "pw".to_string(),
        }
    }

    #[tokio::test]
    async fn registers_once_per_credential() {
        let fake = FakeTelephony::new();
        let mut cache = RegistrationCache::new();

        assert!(cache.ensure(&fake, &identity("7001")).await.unwrap());
        assert!(!cache.ensure(&fake, &identity("7001")).await.unwrap());
        assert!(cache.ensure(&fake, &identity("7002")).await.unwrap());
        assert_eq!(fake.registrations(), ["7001", "7002"]);
    }

    #[tokio::test]
    async fn failure_invalidates_the_cache() {
        let fake = FakeTelephony::new();
        fake.reject_identity("7009");
        let mut cache = RegistrationCache::new();

        cache.ensure(&fake, &identity("7001")).await.unwrap();
        assert!(cache.ensure(&fake, &identity("7009")).await.is_err());
        // The failed switch cleared the cache; the old credential must
        // re-register.
        assert!(cache.ensure(&fake, &identity("7001")).await.unwrap());
        assert_eq!(fake.registration_count(), 2);
    }
}
