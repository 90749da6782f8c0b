use crate::error::RequestError;

pub type Result<T, E = RequestError> = core::result::Result<T, E>;
