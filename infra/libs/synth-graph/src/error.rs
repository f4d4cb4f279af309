use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthError {
    #[error("Duplicate stack name: {0}")]
    DuplicateStack(String),

    #[error("Duplicate logical id '{logical_id}' in stack '{stack}'")]
    DuplicateLogicalId { stack: String, logical_id: String },

    #[error("Duplicate output '{output}' in stack '{stack}'")]
    DuplicateOutput { stack: String, output: String },

    #[error("Dependency edge references unknown stack: {0}")]
    UnknownStack(String),

    #[error("Stack '{stack}' imports from unknown stack '{producer}'")]
    UnknownProducer { stack: String, producer: String },

    #[error("Stack '{stack}' imports output '{output}' that stack '{producer}' does not expose")]
    UnknownOutput {
        stack: String,
        producer: String,
        output: String,
    },

    #[error("Stack '{consumer}' imports from '{producer}' without a recorded dependency edge")]
    MissingDependencyEdge { consumer: String, producer: String },

    #[error(
        "Stack '{consumer}' ({consumer_region}) imports from '{producer}' ({producer_region}) \
         but cross-region references are disabled"
    )]
    CrossRegionDisabled {
        consumer: String,
        consumer_region: String,
        producer: String,
        producer_region: String,
    },

    #[error("Dependency cycle detected involving stack '{0}'")]
    DependencyCycle(String),

    #[error("Plan serialization failed: {0}")]
    Serialization(String),
}
