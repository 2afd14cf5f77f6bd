use crate::error::*;
use tracing::{error, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn error_code(&self) -> &'static str;
}

impl ErrorExt for BroadcastError {
    fn log_error(&self) -> &Self {
        error!("BroadcastError: {}", self);
        match self {
            BroadcastError::Listing(e) => {
                error!("Listing API error details: {:?}", e);
            }
            BroadcastError::Caption(e) => {
                error!("Caption service error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("BroadcastError (warning): {}", self);
        self
    }

    fn error_code(&self) -> &'static str {
        match self {
            BroadcastError::Listing(_) => "LISTING",
            BroadcastError::Caption(_) => "CAPTION",
            BroadcastError::Host { .. } => "HOST",
            BroadcastError::Network(_) => "NETWORK",
            BroadcastError::Url(_) => "URL",
        }
    }
}
