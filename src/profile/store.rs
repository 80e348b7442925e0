//! Profile storage seam
//!
//! Loading and saving profiles goes through `ProfileStore` so the validation
//! flow can be exercised without a database.

use crate::db::{Database, DbResult};
use crate::models::{Profile, ProfileFields};

#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore {
    /// Load a profile, `None` if the user has none yet
    fn load_profile(&self, user_id: &str) -> DbResult<Option<Profile>>;

    /// Create or patch a profile and return the stored result
    fn save_profile(&self, user_id: &str, fields: &ProfileFields) -> DbResult<Profile>;
}

impl ProfileStore for Database {
    fn load_profile(&self, user_id: &str) -> DbResult<Option<Profile>> {
        self.with_conn(|conn| Profile::get(conn, user_id))
    }

    fn save_profile(&self, user_id: &str, fields: &ProfileFields) -> DbResult<Profile> {
        self.with_conn_mut(|conn| Profile::upsert(conn, user_id, fields))
    }
}
