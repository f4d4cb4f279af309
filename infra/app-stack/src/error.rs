use thiserror::Error;

pub type Result<T> = std::result::Result<T, StackError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("Domain alias '{0}' requested without a validated viewer certificate")]
    MissingCertificate(String),

    #[error("Build environment key '{0}' assembled twice")]
    EnvKeyCollision(String),

    #[error(transparent)]
    Synth(#[from] synth_graph::SynthError),
}
