use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("Field {tag} value is {len} characters long, the limit is 99")]
    ValueTooLong { tag: String, len: usize },
    #[error("Invalid field tag: {0:?}")]
    InvalidTag(String),
    #[error("Field {tag} contains non-ASCII characters")]
    NonAscii { tag: String },
    #[error("Malformed payload: {0}")]
    Malformed(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Settling {amount_thb} THB / {amount_usdt} USDT would overflow the reserves")]
    ReserveOverflow {
        amount_thb: rust_decimal::Decimal,
        amount_usdt: rust_decimal::Decimal,
    },
    #[error("No active transaction")]
    NoActiveTransaction,
}

pub type Result<T> = std::result::Result<T, GatewayError>;
