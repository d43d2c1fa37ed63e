//! Prompt text for the decision step and for handing evidence downstream.

use wrouter::{EvidencePack, RecordStatus};
use wtooling::CapabilityCatalog;

pub const EVIDENCE_HEADER: &str = "EVIDENCE FROM TOOL STEWARD:";

const EVIDENCE_INSTRUCTIONS: [&str; 4] = [
    "INSTRUCTIONS FOR EVIDENCE:",
    "1. Use the evidence above to answer the user's question.",
    "2. Cite each fact you use with its [sID] marker at the end of the sentence, e.g. \"Rust 1.80 stabilized LazyLock [s1].\"",
    "3. If the evidence is insufficient, say what remains unknown instead of guessing.",
];

/// Decision prompt asking the model for a single JSON object.
pub fn render_steward_prompt(query: &str, catalog: &CapabilityCatalog) -> String {
    format!(
        r#"You are the Tool Steward for an AI Council.
Decide whether external tools are needed to answer the user's question and, if so, which calls to make.

User Question: {query}

{catalog}
INSTRUCTIONS:
1. Read the question carefully.
2. Pick only the tools from the list above that materially help answer it.
3. Reply with one JSON object and nothing else.

FORMAT (JSON ONLY):
{{
  "action": "use_tools" | "no_tools",
  "reason": "Why you made this decision",
  "calls": [
    {{
      "name": "tool.name",
      "arguments": {{ "arg": "value" }},
      "purpose": "Why this call is needed",
      "priority": "high" | "normal" | "low"
    }}
  ]
}}

Return action "no_tools" when the question needs no outside information, such as small talk or pure reasoning.
"#,
        catalog = catalog.render_prompt()
    )
}

/// Citation-annotated evidence block for deliberation prompts.
///
/// Returns an empty string when no tool calls were recorded, so callers can
/// append it unconditionally.
pub fn render_evidence_section(pack: &EvidencePack) -> String {
    if pack.tools_used.is_empty() {
        return String::new();
    }

    let mut lines = vec![EVIDENCE_HEADER.to_string()];
    for record in &pack.tools_used {
        lines.push(match record.status {
            RecordStatus::Executed => format!("- {}: {}", record.tool_name, record.output_summary),
            status => format!(
                "- {} ({}): {}",
                record.tool_name,
                status.as_str(),
                record.output_summary
            ),
        });
    }

    if !pack.key_facts.is_empty() {
        lines.push(String::new());
        lines.push("KEY FACTS:".to_string());
        lines.extend(pack.key_facts.iter().map(|fact| {
            format!(
                "- {} [{}] (confidence: {:.2})",
                fact.fact,
                citation_marker(&fact.source_id),
                fact.confidence_score
            )
        }));
    }

    lines.push(String::new());
    lines.extend(EVIDENCE_INSTRUCTIONS.iter().map(ToString::to_string));
    lines.join("\n")
}

/// The deliberation prompt: the question followed by any gathered evidence.
pub fn render_deliberation_prompt(query: &str, pack: &EvidencePack) -> String {
    let evidence = render_evidence_section(pack);
    if evidence.is_empty() {
        query.to_string()
    } else {
        format!("{query}\n\n{evidence}")
    }
}

fn citation_marker(source_id: &str) -> String {
    let id = source_id.trim();
    if id.starts_with(['s', 'S']) {
        id.to_ascii_lowercase()
    } else {
        format!("s{id}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};
    use wcommon::MetadataMap;
    use wrouter::{ConfidenceBasis, KeyFact, UsageRecord};
    use wtooling::ToolDefinition;

    use super::*;

    fn record(tool_name: &str, status: RecordStatus, summary: &str) -> UsageRecord {
        UsageRecord {
            call_id: tool_name.into(),
            tool_name: tool_name.to_string(),
            arguments: Map::new(),
            status,
            output_summary: summary.to_string(),
            raw_truncated: None,
            sources: Vec::new(),
            meta: MetadataMap::new(),
        }
    }

    #[test]
    fn steward_prompt_embeds_query_and_catalog() {
        let catalog = CapabilityCatalog::builder()
            .register_sync_fn(
                ToolDefinition::new("web.search", "Search the web", json!({"query": "string"})),
                |_args, ctx| Ok(wtooling::ToolOutcome::success(&ctx, json!([]))),
            )
            .build();

        let prompt = render_steward_prompt("Who won the 2022 World Cup?", &catalog);
        assert!(prompt.contains("User Question: Who won the 2022 World Cup?"));
        assert!(prompt.contains("- web.search: Search the web"));
        assert!(prompt.contains("\"action\": \"use_tools\" | \"no_tools\""));
    }

    #[test]
    fn empty_packs_render_nothing() {
        let pack = EvidencePack::empty("run-1", "hello");
        assert_eq!(render_evidence_section(&pack), "");
        assert_eq!(render_deliberation_prompt("hello", &pack), "hello");
    }

    #[test]
    fn evidence_section_marks_status_and_citations() {
        let mut pack = EvidencePack::empty("run-1", "q");
        pack.tools_used.push(record(
            "web.search",
            RecordStatus::Executed,
            "Found 1 results: Rust [s1]",
        ));
        pack.tools_used.push(record(
            "web.fetch",
            RecordStatus::Rejected,
            "Call rejected: budget_exceeded",
        ));
        pack.key_facts.push(KeyFact::new("Rust is fast", "1", 0.8, ConfidenceBasis::Model));
        pack.key_facts.push(KeyFact::new("Rust is safe", "s2", 0.5, ConfidenceBasis::Heuristic));

        let section = render_evidence_section(&pack);
        assert!(section.starts_with(EVIDENCE_HEADER));
        assert!(section.contains("\n- web.search: Found 1 results: Rust [s1]"));
        assert!(section.contains("\n- web.fetch (rejected): Call rejected: budget_exceeded"));
        assert!(section.contains("\n- Rust is fast [s1] (confidence: 0.80)"));
        assert!(section.contains("\n- Rust is safe [s2] (confidence: 0.50)"));
        assert!(section.contains("INSTRUCTIONS FOR EVIDENCE:"));
    }

    #[test]
    fn evidence_section_layout_without_key_facts() {
        let mut pack = EvidencePack::empty("run-1", "q");
        pack.tools_used.push(record("calc.eval", RecordStatus::Failed, "Error: boom"));

        let section = render_evidence_section(&pack);
        let lines: Vec<&str> = section.lines().collect();
        assert_eq!(
            lines[..4],
            [
                EVIDENCE_HEADER,
                "- calc.eval (failed): Error: boom",
                "",
                "INSTRUCTIONS FOR EVIDENCE:",
            ]
        );
        assert_eq!(lines.len(), 3 + EVIDENCE_INSTRUCTIONS.len());
        assert!(!section.contains("KEY FACTS:"));
    }
}
