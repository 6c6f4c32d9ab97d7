//! Profile persistence
//!
//! Profiles live under two keys of a [`KeyValueStore`]:
//!
//! - [`PROFILES_KEY`] holds a JSON array of profiles in storage order
//! - [`LAST_USED_KEY`] holds the plain name of the last saved or loaded profile
//!
//! [`ProfileStore::open`] reads the collection once; every change afterwards
//! is written through to the store before it returns.

use tracing::{debug, info, instrument};

use core_kernel::KeyValueStore;
use domain_allocation::AllocationTree;

use crate::error::ProfileError;
use crate::profile::Profile;

/// Key holding the JSON array of saved profiles
pub const PROFILES_KEY: &str = "investmentProfiles";
/// Key holding the name of the last-used profile
pub const LAST_USED_KEY: &str = "lastUsedProfile";

/// What a delete changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// A profile with the name existed and was removed
    pub removed: bool,
    /// The last-used pointer named the profile and was cleared
    pub cleared_last_used: bool,
}

/// Named snapshots of allocation trees backed by a key-value store
#[derive(Debug)]
pub struct ProfileStore<S> {
    store: S,
    profiles: Vec<Profile>,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Opens the profile collection held in `store`
    ///
    /// A missing collection is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Malformed` if the stored collection is not a
    /// valid profile array, or `ProfileError::Port` if the store fails
    #[instrument(skip(store))]
    pub fn open(store: S) -> Result<Self, ProfileError> {
        let profiles = match store.get(PROFILES_KEY)? {
            Some(json) => serde_json::from_str::<Vec<Profile>>(&json)?,
            None => Vec::new(),
        };

        info!(count = profiles.len(), "Opened profile store");
        Ok(Self { store, profiles })
    }

    /// All profiles in storage order
    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    /// Profile names in storage order
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Looks up a profile by name
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves a snapshot of `tree` under `name` and marks it last used
    ///
    /// An existing profile with the same name is replaced; the replacement
    /// moves to the end of storage order.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::BlankName` if the name is empty or whitespace
    #[instrument(skip(self, tree))]
    pub fn save(&mut self, name: &str, tree: &AllocationTree) -> Result<&Profile, ProfileError> {
        if name.trim().is_empty() {
            return Err(ProfileError::BlankName);
        }

        let mut profiles: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|p| p.name != name)
            .cloned()
            .collect();
        let replaced = profiles.len() != self.profiles.len();
        profiles.push(Profile::capture(name, tree));

        self.write_profiles(&profiles)?;
        self.profiles = profiles;
        self.store.set(LAST_USED_KEY, name)?;

        info!(replaced, "Saved profile");
        Ok(&self.profiles[self.profiles.len() - 1])
    }

    /// Returns a deep copy of the named profile's tree and marks it last used
    ///
    /// The stored tree is not re-validated. An unknown name is not an error
    /// and leaves the last-used pointer unchanged.
    #[instrument(skip(self))]
    pub fn load(&self, name: &str) -> Result<Option<AllocationTree>, ProfileError> {
        let Some(profile) = self.get(name) else {
            debug!("No profile with this name");
            return Ok(None);
        };

        self.store.set(LAST_USED_KEY, name)?;
        debug!("Loaded profile");
        Ok(Some(profile.to_tree()))
    }

    /// Removes the named profile
    ///
    /// Clears the last-used pointer if it named this profile. Deleting an
    /// unknown name is not an error.
    #[instrument(skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<DeleteOutcome, ProfileError> {
        let profiles: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|p| p.name != name)
            .cloned()
            .collect();
        let removed = profiles.len() != self.profiles.len();

        self.write_profiles(&profiles)?;
        self.profiles = profiles;

        let cleared_last_used = self.last_used()?.as_deref() == Some(name);
        if cleared_last_used {
            self.store.remove(LAST_USED_KEY)?;
        }

        info!(removed, cleared_last_used, "Deleted profile");
        Ok(DeleteOutcome {
            removed,
            cleared_last_used,
        })
    }

    /// The name stored in the last-used pointer, if any
    pub fn last_used(&self) -> Result<Option<String>, ProfileError> {
        Ok(self.store.get(LAST_USED_KEY)?)
    }

    /// Resolves the last-used pointer to a profile, for start-up restore
    ///
    /// Returns the profile name and a deep copy of its tree, or `None` if
    /// there is no pointer or it names a profile that no longer exists.
    #[instrument(skip(self))]
    pub fn restore_last_used(&self) -> Result<Option<(String, AllocationTree)>, ProfileError> {
        let Some(name) = self.last_used()? else {
            return Ok(None);
        };

        match self.get(&name) {
            Some(profile) => {
                info!(profile = %name, "Restoring last used profile");
                Ok(Some((name, profile.to_tree())))
            }
            None => {
                debug!(profile = %name, "Last used profile no longer exists");
                Ok(None)
            }
        }
    }

    /// Removes every profile and the last-used pointer
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) -> Result<(), ProfileError> {
        self.store.remove(PROFILES_KEY)?;
        self.store.remove(LAST_USED_KEY)?;
        self.profiles.clear();

        info!("Cleared all profiles");
        Ok(())
    }

    fn write_profiles(&self, profiles: &[Profile]) -> Result<(), ProfileError> {
        let json = serde_json::to_string(profiles)?;
        self.store.set(PROFILES_KEY, &json)?;
        Ok(())
    }
}
