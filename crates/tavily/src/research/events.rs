use super::types::StreamResearchEvent;

pub const DONE_EVENT: &str = "done";
pub const SOURCES_EVENT: &str = "sources";

/// A server-sent event from the research stream, keyed by its `event:` type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchEvent {
    Done,
    Sources(StreamResearchEvent),
    Content(StreamResearchEvent),
}

impl ResearchEvent {
    /// Returns `Ok(None)` for events without data, which carry nothing to act on.
    pub fn parse(event_type: &str, data: &str) -> Result<Option<Self>, serde_json::Error> {
        if data.is_empty() {
            return Ok(None);
        }

        let event = match event_type {
            DONE_EVENT => ResearchEvent::Done,
            SOURCES_EVENT => ResearchEvent::Sources(serde_json::from_str(data)?),
            _ => ResearchEvent::Content(serde_json::from_str(data)?),
        };
        Ok(Some(event))
    }
}
