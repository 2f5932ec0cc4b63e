pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("A journal analysis is already running.")]
	Busy,
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<fj_storage::Error> for Error {
	fn from(err: fj_storage::Error) -> Self {
		match err {
			fj_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			fj_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			fj_storage::Error::InvalidRow(message) => Self::Storage { message },
		}
	}
}
