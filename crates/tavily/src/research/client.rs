use std::ops::ControlFlow;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use super::events::ResearchEvent;
use super::options::StreamResearchOptions;
use super::types::{ResearchProgress, ResearchRequest, StreamResearchEvent};
use crate::config::TavilyConfig;
use crate::errors::{ConfigError, ResearchError, ResearchResult};

const TOOL_CALL_TYPE: &str = "tool_call";

pub struct TavilyClient {
    client: Client,
    config: TavilyConfig,
}

impl TavilyClient {
    pub fn new(config: TavilyConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(TavilyConfig::from_env()?)
    }

    pub fn config(&self) -> &TavilyConfig {
        &self.config
    }

    async fn post(&self, request: &ResearchRequest) -> ResearchResult<Response> {
        let url = self.config.research_url();
        debug!(%url, model = %request.model, "sending research request");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ResearchError::Status { status, body })
        }
    }

    /// Run a research request and stream its events until the server reports completion.
    ///
    /// Content fragments are concatenated into the returned report. Research steps and
    /// sources are forwarded to the hooks registered on `options`; an error from a hook
    /// stops the stream and is returned as [`ResearchError::Hook`]. Any error discards
    /// the partially assembled report.
    pub async fn stream_research(
        &self,
        mut request: ResearchRequest,
        mut options: StreamResearchOptions,
    ) -> ResearchResult<String> {
        if request.input.is_empty() {
            return Err(ResearchError::InputRequired);
        }
        request.stream = true;

        // The response body is owned by the event stream and dropped on every return below.
        let mut events = self.post(&request).await?.bytes_stream().eventsource();
        let mut body = String::new();

        while let Some(event) = events.next().await {
            if options.is_cancelled() {
                warn!("aborting research stream, shutdown in progress");
                return Err(ResearchError::ShuttingDown);
            }

            let event = event?;
            debug!(event_type = %event.event, "received research event");

            let Some(event) = ResearchEvent::parse(&event.event, &event.data)? else {
                continue;
            };
            if handle_event(event, &mut body, &mut options)?.is_break() {
                break;
            }
        }

        Ok(body)
    }
}

fn handle_event(
    event: ResearchEvent,
    body: &mut String,
    options: &mut StreamResearchOptions,
) -> ResearchResult<ControlFlow<()>> {
    match event {
        ResearchEvent::Done => {
            options
                .report_progress(ResearchProgress::done())
                .map_err(ResearchError::Hook)?;
            Ok(ControlFlow::Break(()))
        }
        ResearchEvent::Sources(event) => {
            if options.has_source_hook() {
                options
                    .report_sources(event.sources())
                    .map_err(ResearchError::Hook)?;
            }
            Ok(ControlFlow::Continue(()))
        }
        ResearchEvent::Content(event) => {
            handle_content(event, body, options)?;
            Ok(ControlFlow::Continue(()))
        }
    }
}

fn handle_content(
    event: StreamResearchEvent,
    body: &mut String,
    options: &mut StreamResearchOptions,
) -> ResearchResult<()> {
    for choice in event.choices {
        let delta = choice.delta;
        if !delta.content.is_empty() {
            body.push_str(&delta.content);
            continue;
        }

        let Some(tool_calls) = delta.tool_calls else {
            continue;
        };
        if tool_calls.kind != TOOL_CALL_TYPE {
            continue;
        }
        for tool_call in &tool_calls.tool_call {
            info!("[{}] {}", tool_call.name, tool_call.arguments);
            options
                .report_progress(ResearchProgress::from(tool_call))
                .map_err(ResearchError::Hook)?;
        }
    }
    Ok(())
}
