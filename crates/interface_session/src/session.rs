//! The allocation session
//!
//! An [`AllocationSession`] is the surface a UI drives. It owns the tree
//! being edited, the profile store and the current-profile indicator. Every
//! edit runs the validate, derive and chart pipeline again and commits the
//! outcome through a generation gate, so an outcome computed from a
//! superseded snapshot never replaces a newer one.

use tracing::{debug, info, instrument};

use core_kernel::{format_indian, CategoryId, KeyValueStore, SubCategoryId};
use domain_allocation::{
    AllocationError, AllocationTree, ChartDataAdapter, ChartSeries, DerivedTree, Recomputation,
    RecomputeToken, Recomputer, ValidationIssue,
};
use domain_profile::{DeleteOutcome, Profile, ProfileStore};

use crate::error::SessionError;

/// Editing state plus profile persistence for one user
#[derive(Debug)]
pub struct AllocationSession<S> {
    tree: AllocationTree,
    profiles: ProfileStore<S>,
    current_profile: Option<String>,
    recomputer: Recomputer,
    charts: ChartDataAdapter,
}

impl<S: KeyValueStore> AllocationSession<S> {
    /// Opens the profile collection in `store` and restores the last-used
    /// profile if the pointer resolves to one
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Profile` if the stored profiles cannot be read
    #[instrument(skip(store))]
    pub fn start(store: S) -> Result<Self, SessionError> {
        let profiles = ProfileStore::open(store)?;

        let (tree, current_profile) = match profiles.restore_last_used()? {
            Some((name, tree)) => (tree, Some(name)),
            None => (AllocationTree::new(), None),
        };

        let mut session = Self {
            tree,
            profiles,
            current_profile,
            recomputer: Recomputer::new(),
            charts: ChartDataAdapter::new(),
        };
        session.recompute();

        info!(
            profiles = session.profiles.list().len(),
            restored = session.current_profile.as_deref().unwrap_or(""),
            "Session started"
        );
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    pub fn tree(&self) -> &AllocationTree {
        &self.tree
    }

    /// Name of the profile last saved or loaded in this session
    pub fn current_profile(&self) -> Option<&str> {
        self.current_profile.as_deref()
    }

    /// Saved profiles in storage order
    pub fn profiles(&self) -> &[Profile] {
        self.profiles.list()
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.names()
    }

    /// The latest committed recomputation
    pub fn outcome(&self) -> Option<&Recomputation> {
        self.recomputer.latest()
    }

    /// The current validation issue, if any
    pub fn validation_issue(&self) -> Option<&ValidationIssue> {
        self.outcome().and_then(|o| o.validation.issue.as_ref())
    }

    /// The current validation message, if any
    pub fn validation_message(&self) -> Option<String> {
        self.outcome().and_then(Recomputation::message)
    }

    /// Derived amounts, present only while the tree is valid
    pub fn derived(&self) -> Option<&DerivedTree> {
        self.outcome().and_then(|o| o.derived.as_ref())
    }

    /// One record per category, or the sample series
    pub fn main_chart(&self) -> ChartSeries {
        self.charts.main_series(self.derived())
    }

    /// Sub-category records for one category, or the sample series
    pub fn sub_chart(&self, category_id: &CategoryId) -> ChartSeries {
        self.charts.sub_series(self.derived(), category_id)
    }

    /// Whether the charts show real data rather than samples
    pub fn has_valid_data(&self) -> bool {
        self.charts.has_valid_data(self.derived())
    }

    /// The total amount as typed, with Indian digit grouping
    pub fn formatted_total(&self) -> String {
        format_indian(self.tree.total_amount.as_str())
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Applies `change` to the tree and recomputes
    ///
    /// The tree mutators check keys before changing anything, so a failed
    /// change leaves the tree and the committed outcome as they were.
    pub fn edit<T>(
        &mut self,
        change: impl FnOnce(&mut AllocationTree) -> Result<T, AllocationError>,
    ) -> Result<T, SessionError> {
        let value = change(&mut self.tree)?;
        self.recompute();
        Ok(value)
    }

    pub fn set_total_amount(&mut self, raw: &str) -> Result<(), SessionError> {
        self.edit(|tree| {
            tree.set_total_amount(raw);
            Ok(())
        })
    }

    pub fn set_category_percentage(&mut self, id: &CategoryId, raw: &str) -> Result<(), SessionError> {
        self.edit(|tree| tree.set_category_percentage(id, raw))
    }

    /// Appends a user-defined category and returns its key
    pub fn add_category(
        &mut self,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
    ) -> Result<CategoryId, SessionError> {
        self.edit(|tree| tree.add_category(id, name).map(|category| category.id.clone()))
    }

    pub fn rename_category(&mut self, id: &CategoryId, name: &str) -> Result<(), SessionError> {
        self.edit(|tree| tree.rename_category(id, name))
    }

    pub fn remove_category(&mut self, id: &CategoryId) -> Result<(), SessionError> {
        self.edit(|tree| tree.remove_category(id).map(|_| ()))
    }

    /// Appends a blank sub-category and returns its key
    pub fn add_sub_category(&mut self, category_id: &CategoryId) -> Result<SubCategoryId, SessionError> {
        self.edit(|tree| tree.add_sub_category(category_id))
    }

    pub fn rename_sub_category(
        &mut self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        name: &str,
    ) -> Result<(), SessionError> {
        self.edit(|tree| tree.rename_sub_category(category_id, sub_category_id, name))
    }

    pub fn set_sub_category_percentage(
        &mut self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        raw: &str,
    ) -> Result<(), SessionError> {
        self.edit(|tree| tree.set_sub_category_percentage(category_id, sub_category_id, raw))
    }

    pub fn remove_sub_category(
        &mut self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
    ) -> Result<(), SessionError> {
        self.edit(|tree| tree.remove_sub_category(category_id, sub_category_id).map(|_| ()))
    }

    // ------------------------------------------------------------------
    // Recomputation
    // ------------------------------------------------------------------

    /// Validates and derives the current tree and commits the outcome
    pub fn recompute(&mut self) -> &Recomputation {
        self.recomputer.refresh(&self.tree)
    }

    /// Starts a recomputation that is completed separately
    ///
    /// Returns the token and a snapshot of the tree as it is now. Any edit
    /// made before [`complete_recompute`](Self::complete_recompute) is called
    /// supersedes the token.
    pub fn begin_recompute(&mut self) -> (RecomputeToken, AllocationTree) {
        (self.recomputer.begin(), self.tree.clone())
    }

    /// Computes the outcome for a snapshot and commits it if the token is
    /// still the latest
    ///
    /// Returns whether the outcome was committed.
    pub fn complete_recompute(&mut self, token: RecomputeToken, snapshot: &AllocationTree) -> bool {
        let outcome = self.recomputer.compute(token, snapshot);
        self.recomputer.commit(outcome)
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Saves the tree under `name` and makes it the current profile
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::BlankName` for an empty or whitespace name
    #[instrument(skip(self))]
    pub fn save_profile(&mut self, name: &str) -> Result<(), SessionError> {
        self.profiles.save(name, &self.tree)?;
        self.current_profile = Some(name.to_string());
        Ok(())
    }

    /// Replaces the tree with the named profile
    ///
    /// Returns false, changing nothing, if no profile has that name.
    #[instrument(skip(self))]
    pub fn load_profile(&mut self, name: &str) -> Result<bool, SessionError> {
        let Some(tree) = self.profiles.load(name)? else {
            return Ok(false);
        };

        self.tree = tree;
        self.current_profile = Some(name.to_string());
        self.recompute();
        Ok(true)
    }

    /// Deletes the named profile
    ///
    /// Clears the current-profile indicator if it named this profile. The
    /// tree is left as it is.
    #[instrument(skip(self))]
    pub fn delete_profile(&mut self, name: &str) -> Result<DeleteOutcome, SessionError> {
        let outcome = self.profiles.delete(name)?;
        if self.current_profile.as_deref() == Some(name) {
            debug!("Clearing current profile");
            self.current_profile = None;
        }
        Ok(outcome)
    }

    /// Deletes every profile and the last-used pointer, resets the tree to
    /// its initial shape, and supersedes any pending recomputation
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) -> Result<(), SessionError> {
        self.profiles.clear_all()?;
        self.tree.reset();
        self.current_profile = None;
        self.recomputer.invalidate();
        self.recompute();

        info!("Session cleared");
        Ok(())
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        self.profiles.store()
    }
}
