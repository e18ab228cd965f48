use slotswap_core::error::CoreError;

/// Postgres SQLSTATEs for a transaction aborted by a concurrent one.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Error returned by registry and negotiator operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Storage errors caused by losing a race to another transaction surface as
/// `Conflict`, like any other lost compare-and-set.
impl From<sqlx::Error> for ExchangeError {
    fn from(err: sqlx::Error) -> Self {
        if is_transaction_conflict(&err) {
            tracing::warn!(error = %err, "Transaction aborted by a concurrent writer");
            return ExchangeError::Core(CoreError::Conflict(
                "Concurrent update, please retry".into(),
            ));
        }
        ExchangeError::Database(err)
    }
}

fn is_transaction_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        ),
        _ => false,
    }
}
