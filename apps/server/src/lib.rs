//! Request-handling layer for the data-analysis endpoints: JSON bodies in,
//! JSON bodies out, with configuration and logging setup for the hosting
//! process. HTTP routing is left to whichever framework mounts these
//! handlers.

mod config;
mod error;
pub mod logging;
mod schema;
mod service;

pub use config::{DEFAULT_MAX_DATA_POINTS, ServiceConfig};
pub use error::{ErrorResponse, ServiceError};
pub use schema::{
    AnalysisType, CorrelationRequest, CorrelationResponse, DataAnalysisRequest,
    DataAnalysisResponse,
};
pub use service::AnalysisService;
