//! Durable-store interfaces consumed by the services.
//!
//! The crate ships a rusqlite implementation of every trait here (see
//! [`crate::db::Database`]); hosts with their own persistence implement them
//! directly.

use crate::error::Result;
use crate::model::{File, FileStatus, IdentifyMethod, SignRequest};

pub trait FileStore: Send + Sync {
    fn get_file(&self, id: i64) -> Result<Option<File>>;

    fn get_file_by_uuid(&self, uuid: &str) -> Result<Option<File>>;

    /// Lists the member files of an envelope.
    fn list_children(&self, envelope_id: i64) -> Result<Vec<File>>;

    /// Textual label for a file status code.
    fn status_label(&self, code: i32) -> String {
        FileStatus::try_from(code)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

pub trait SignRequestStore: Send + Sync {
    fn get_sign_request(&self, id: i64) -> Result<Option<SignRequest>>;

    fn get_sign_request_by_uuid(&self, uuid: &str) -> Result<Option<SignRequest>>;

    /// Finds the sign request of `file_id` reachable through an identify method
    /// of the same kind and value.
    fn find_by_identify_method(
        &self,
        method: &IdentifyMethod,
        file_id: i64,
    ) -> Result<Option<SignRequest>>;

    /// The row of the signer behind `sign_request` on another file of the same
    /// envelope, matched through shared identify methods.
    fn find_for_file(&self, file_id: i64, sign_request: &SignRequest)
        -> Result<Option<SignRequest>>;

    fn list_by_file(&self, file_id: i64) -> Result<Vec<SignRequest>>;

    /// Counts unsigned rows of `file_id` whose signing order is below `order`.
    fn count_unsigned_below_order(&self, file_id: i64, order: u32) -> Result<u64>;

    /// Inserts a new row and assigns its id.
    fn insert_sign_request(&self, sign_request: &mut SignRequest) -> Result<()>;

    fn update_sign_request(&self, sign_request: &SignRequest) -> Result<()>;
}

pub trait IdentifyMethodStore: Send + Sync {
    /// Inserts or updates an identify method; assigns its id when new.
    fn save_identify_method(&self, method: &mut IdentifyMethod) -> Result<()>;

    fn list_identify_methods(&self, sign_request_id: i64) -> Result<Vec<IdentifyMethod>>;
}

/// Pending job count for one job class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobClassCount {
    pub class: String,
    pub count: u64,
}

pub trait JobQueue: Send + Sync {
    fn count_by_class(&self) -> Result<Vec<JobClassCount>>;
}
