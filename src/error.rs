use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("composed transform is singular and cannot be inverted")]
    SingularTransform,

    #[error("transform pipeline is not prepared (no data or no layout yet)")]
    PipelineNotPrepared,
}
