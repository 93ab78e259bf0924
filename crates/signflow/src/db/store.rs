//! Wires the repositories up to the service-facing store traits.

use super::{
    config_repo, file_repo, identify_method_repo, job_repo, sign_request_repo, Database,
};
use crate::config::AppConfig;
use crate::error::{Result, SignFlowError};
use crate::model::{File, IdentifyMethod, SignRequest};
use crate::store::{FileStore, IdentifyMethodStore, JobClassCount, JobQueue, SignRequestStore};

impl FileStore for Database {
    fn get_file(&self, id: i64) -> Result<Option<File>> {
        Ok(file_repo::find_by_id(self, id)?)
    }

    fn get_file_by_uuid(&self, uuid: &str) -> Result<Option<File>> {
        Ok(file_repo::find_by_uuid(self, uuid)?)
    }

    fn list_children(&self, envelope_id: i64) -> Result<Vec<File>> {
        Ok(file_repo::list_children(self, envelope_id)?)
    }
}

impl SignRequestStore for Database {
    fn get_sign_request(&self, id: i64) -> Result<Option<SignRequest>> {
        Ok(sign_request_repo::find_by_id(self, id)?)
    }

    fn get_sign_request_by_uuid(&self, uuid: &str) -> Result<Option<SignRequest>> {
        Ok(sign_request_repo::find_by_uuid(self, uuid)?)
    }

    fn find_by_identify_method(
        &self,
        method: &IdentifyMethod,
        file_id: i64,
    ) -> Result<Option<SignRequest>> {
        Ok(sign_request_repo::find_by_identify_method(
            self, method, file_id,
        )?)
    }

    fn find_for_file(
        &self,
        file_id: i64,
        sign_request: &SignRequest,
    ) -> Result<Option<SignRequest>> {
        match sign_request.id {
            Some(id) => Ok(sign_request_repo::find_same_signer_on_file(
                self, file_id, id,
            )?),
            None => Ok(None),
        }
    }

    fn list_by_file(&self, file_id: i64) -> Result<Vec<SignRequest>> {
        Ok(sign_request_repo::list_by_file(self, file_id)?)
    }

    fn count_unsigned_below_order(&self, file_id: i64, order: u32) -> Result<u64> {
        Ok(sign_request_repo::count_unsigned_below_order(
            self, file_id, order,
        )?)
    }

    fn insert_sign_request(&self, sign_request: &mut SignRequest) -> Result<()> {
        let id = sign_request_repo::insert(self, sign_request)?;
        sign_request.id = Some(id);
        Ok(())
    }

    fn update_sign_request(&self, sign_request: &SignRequest) -> Result<()> {
        let id = sign_request
            .id
            .ok_or_else(|| SignFlowError::SignRequestNotFound(sign_request.uuid.clone()))?;
        sign_request_repo::update(self, id, sign_request)?;
        Ok(())
    }
}

impl IdentifyMethodStore for Database {
    fn save_identify_method(&self, method: &mut IdentifyMethod) -> Result<()> {
        Ok(identify_method_repo::save(self, method)?)
    }

    fn list_identify_methods(&self, sign_request_id: i64) -> Result<Vec<IdentifyMethod>> {
        Ok(identify_method_repo::list_by_sign_request(
            self,
            sign_request_id,
        )?)
    }
}

impl JobQueue for Database {
    fn count_by_class(&self) -> Result<Vec<JobClassCount>> {
        Ok(job_repo::count_by_class(self)?)
    }
}

impl AppConfig for Database {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(config_repo::get(self, key)?)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        Ok(config_repo::set(self, key, value)?)
    }
}
