use talent_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
