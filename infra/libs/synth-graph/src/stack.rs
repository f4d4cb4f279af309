/// Declarative stack model: typed resources, named outputs, cross-stack imports.
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::{Result, SynthError};

/// Reference to an attribute of a resource declared in the same stack.
///
/// Rendered as a `${LogicalId.Attribute}` token inside resource properties and
/// outputs; resolution happens in the external orchestrator, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    logical_id: String,
    attribute: String,
}

impl Attr {
    pub fn new(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    pub fn token(&self) -> String {
        format!("${{{}.{}}}", self.logical_id, self.attribute)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Reference to a named output of another stack.
///
/// Imports are recorded structurally on the consuming stack so synthesis can
/// verify the producer exists, exposes the output, and is ordered first via an
/// explicit dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRef {
    pub stack: String,
    pub output: String,
}

impl OutputRef {
    pub fn new(stack: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            output: output.into(),
        }
    }

    pub fn token(&self) -> String {
        format!("${{{}.Outputs.{}}}", self.stack, self.output)
    }
}

/// A single declared cloud resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub logical_id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub properties: Value,
    /// In-stack ordering constraints (logical ids).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(
        logical_id: impl Into<String>,
        resource_type: impl Into<String>,
        properties: Value,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
        }
    }

    /// Add an in-stack ordering constraint on another resource.
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Attribute reference to this resource.
    pub fn attr(&self, attribute: impl Into<String>) -> Attr {
        Attr::new(self.logical_id.clone(), attribute)
    }
}

/// Named string output exposed by a stack for cross-stack consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    pub name: String,
    pub value: String,
}

/// One unit of deployment: an ordered set of resources in a single region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stack {
    name: String,
    region: String,
    resources: Vec<Resource>,
    outputs: Vec<Output>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    imports: Vec<OutputRef>,
}

impl Stack {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            resources: Vec::new(),
            outputs: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Declare a resource. Logical ids must be unique within the stack.
    pub fn add_resource(&mut self, resource: Resource) -> Result<Attr> {
        if self.resources.iter().any(|r| r.logical_id == resource.logical_id) {
            return Err(SynthError::DuplicateLogicalId {
                stack: self.name.clone(),
                logical_id: resource.logical_id,
            });
        }
        tracing::debug!(
            stack = %self.name,
            logical_id = %resource.logical_id,
            resource_type = %resource.resource_type,
            "declared resource"
        );
        let handle = resource.attr("Id");
        self.resources.push(resource);
        Ok(handle)
    }

    /// Expose a named output for other stacks to import.
    pub fn add_output(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.outputs.iter().any(|o| o.name == name) {
            return Err(SynthError::DuplicateOutput {
                stack: self.name.clone(),
                output: name,
            });
        }
        self.outputs.push(Output {
            name,
            value: value.into(),
        });
        Ok(())
    }

    /// Consume another stack's output. Records the import for synthesis-time
    /// validation and returns the token to embed in resource properties.
    pub fn import(&mut self, output_ref: OutputRef) -> String {
        let token = output_ref.token();
        if !self.imports.contains(&output_ref) {
            self.imports.push(output_ref);
        }
        token
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn imports(&self) -> &[OutputRef] {
        &self.imports
    }
}
