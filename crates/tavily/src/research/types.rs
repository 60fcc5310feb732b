use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CitationFormat {
    #[default]
    Numbered,
    Mla,
    Apa,
    Chicago,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResearchModel {
    #[default]
    Mini,
    Pro,
    Auto,
}

/// JSON-schema style description of a structured report, forwarded to the API as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl OutputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property<S: Into<String>>(mut self, name: S, schema: Value) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    pub fn with_required<S: Into<String>>(mut self, name: S) -> Self {
        self.required.push(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResearchRequest {
    pub citation_format: CitationFormat,
    pub input: String,
    pub model: ResearchModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
    pub stream: bool,
}

impl ResearchRequest {
    pub fn new<S: Into<String>>(input: S) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: ResearchModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_citation_format(mut self, citation_format: CitationFormat) -> Self {
        self.citation_format = citation_format;
        self
    }

    pub fn with_output_schema(mut self, output_schema: OutputSchema) -> Self {
        self.output_schema = Some(output_schema);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, deserialize_with = "null_as_default")]
    pub favicon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub queries: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolCalls {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_call: Vec<ToolCall>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Delta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default)]
    pub tool_calls: Option<ToolCalls>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Choice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub delta: Delta,
}

/// Payload of a single research stream event.
// https://docs.tavily.com/documentation/api-reference/endpoint/research-streaming
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamResearchEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object: String,
}

impl StreamResearchEvent {
    /// All sources across every choice, in arrival order.
    pub fn sources(&self) -> Vec<Source> {
        let n = self.choices.iter().map(|c| c.delta.sources.len()).sum();
        let mut sources = Vec::with_capacity(n);
        for choice in &self.choices {
            sources.extend(choice.delta.sources.iter().cloned());
        }
        sources
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchProgress {
    pub name: String,
    pub arguments: String,
    pub queries: Option<Vec<String>>,
}

impl ResearchProgress {
    pub fn done() -> Self {
        Self {
            name: "Done".to_string(),
            arguments: "Research Completed".to_string(),
            queries: None,
        }
    }
}

impl From<&ToolCall> for ResearchProgress {
    fn from(tool_call: &ToolCall) -> Self {
        Self {
            name: tool_call.name.clone(),
            arguments: tool_call.arguments.clone(),
            queries: tool_call.queries.clone(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
