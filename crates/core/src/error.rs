#[derive(Debug, thiserror::Error)]
pub enum CdssError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("translation error: {0}")]
    Translation(String),
    #[error("invalid text: {0}")]
    Text(#[from] tcm_types::TextError),
}

pub type CdssResult<T> = std::result::Result<T, CdssError>;
