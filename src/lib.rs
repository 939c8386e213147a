pub mod error;

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod models {
    pub mod conversion;
    pub mod job;
}

pub mod service {
    pub mod cleanup;
    pub mod config_service;
    pub mod converter;
    pub mod directory;
    pub mod tracker;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod facade {
    pub mod conversion_facade;
    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod utils {
    pub mod command;
    pub mod convert;
    pub mod file;
    pub mod utils;
}

pub use error::{BatchError, Result};
pub use facade::conversion_facade::{BatchState, CancelHandle, ConversionFacade};
pub use facade::traits::i_conversion::{CallbackObserver, ConversionFacadeTrait, ConversionObserver, NoopObserver};
pub use models::conversion::{ConversionError, ConversionRecord, InvokeError};
pub use models::job::{ConversionOptions, LogVerbosity, RunSummary};
