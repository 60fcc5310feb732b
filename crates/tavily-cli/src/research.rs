use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bat::PrettyPrinter;
use console::style;
use tavily::{
    CitationFormat, OutputSchema, ResearchModel, ResearchProgress, ResearchRequest, Source,
    StreamResearchOptions,
};

pub fn build_request(
    input: String,
    model: ResearchModel,
    citation_format: CitationFormat,
) -> ResearchRequest {
    ResearchRequest::new(input)
        .with_model(model)
        .with_citation_format(citation_format)
}

pub fn load_output_schema(path: &Path) -> Result<OutputSchema> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read output schema {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid output schema in {}", path.display()))
}

/// Hooks that print research progress and sources to the terminal as they stream in.
pub fn console_options() -> StreamResearchOptions {
    StreamResearchOptions::new()
        .with_progress_hook(|progress| {
            println!("{}", format_progress(&progress));
            Ok(())
        })
        .with_source_hook(|sources| {
            for line in format_sources(&sources) {
                println!("{}", line);
            }
            Ok(())
        })
}

fn format_progress(progress: &ResearchProgress) -> String {
    let mut line = format!(
        "{} {}",
        style(format!("[{}]", progress.name)).cyan().bold(),
        progress.arguments
    );
    if let Some(queries) = progress.queries.as_ref().filter(|q| !q.is_empty()) {
        for query in queries {
            line.push_str(&format!("\n    {} {}", style("?").dim(), query));
        }
    }
    line
}

fn format_sources(sources: &[Source]) -> Vec<String> {
    sources
        .iter()
        .map(|source| {
            let title = if source.title.is_empty() {
                &source.url
            } else {
                &source.title
            };
            format!("{} {} {}", style("•").green(), title, style(&source.url).dim())
        })
        .collect()
}

pub fn render(report: &str) -> Result<()> {
    PrettyPrinter::new()
        .input_from_bytes(report.as_bytes())
        .language("markdown")
        .print()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_request() {
        let request = build_request(
            "Why is the sky blue?".to_string(),
            ResearchModel::Pro,
            CitationFormat::Mla,
        );
        assert_eq!(request.input, "Why is the sky blue?");
        assert_eq!(request.model, ResearchModel::Pro);
        assert_eq!(request.citation_format, CitationFormat::Mla);
        assert!(request.output_schema.is_none());
    }

    #[test]
    fn test_load_output_schema() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{
                "properties": {{
                    "company": {{"type": "string", "description": "The company name"}},
                    "key_metrics": {{"type": "array", "items": {{"type": "string"}}}}
                }},
                "required": ["company"]
            }}"#
        )?;

        let schema = load_output_schema(file.path())?;
        assert_eq!(schema.required, vec!["company".to_string()]);
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.properties["key_metrics"]["items"]["type"], "string");
        Ok(())
    }

    #[test]
    fn test_load_output_schema_invalid_json() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "not json")?;

        let err = load_output_schema(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid output schema"));
        Ok(())
    }

    #[test]
    fn test_format_progress_with_queries() {
        let progress = ResearchProgress {
            name: "WebSearch".to_string(),
            arguments: "Searching the web".to_string(),
            queries: Some(vec!["rust sse".to_string(), "tavily api".to_string()]),
        };
        let line = strip_ansi_codes(&format_progress(&progress)).to_string();
        assert_eq!(
            line,
            "[WebSearch] Searching the web\n    ? rust sse\n    ? tavily api"
        );

        let done = strip_ansi_codes(&format_progress(&ResearchProgress::done())).to_string();
        assert_eq!(done, "[Done] Research Completed");
    }

    #[test]
    fn test_format_sources_falls_back_to_url() {
        let sources = vec![
            Source {
                favicon: String::new(),
                title: "Rust Book".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
            },
            Source {
                favicon: String::new(),
                title: String::new(),
                url: "https://example.com".to_string(),
            },
        ];
        let lines: Vec<String> = format_sources(&sources)
            .iter()
            .map(|l| strip_ansi_codes(l).to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "• Rust Book https://doc.rust-lang.org/book/".to_string(),
                "• https://example.com https://example.com".to_string(),
            ]
        );
    }
}
