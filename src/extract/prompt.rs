//! Prompt construction for workflow extraction

/// Fixed instruction block sent ahead of every transcript.
const SYSTEM_PROMPT: &str = "You are an expert business process analyst. \
Your task is to analyze text and extract workflow steps in a structured format.

For each workflow step, identify:
1. Step name (concise title)
2. Description (what happens in this step)
3. Step type (task, decision, event, or gateway)
4. Next steps (which steps follow this one)

Return the workflow as a JSON array of steps.";

/// Build the full extraction prompt for a transcript.
///
/// The response shape is spelled out with a worked example because the model
/// has no enforced schema; the parser copes with whatever comes back anyway.
pub fn build_extraction_prompt(text: &str, context: Option<&str>) -> String {
    let context_line = match context {
        Some(c) => format!("\nAdditional context: {}\n", c),
        None => String::new(),
    };

    format!(
        r#"{system}

Analyze the following text and extract the workflow steps:

{text}
{context_line}
Return a JSON array of workflow steps with this structure:
[
  {{
    "step_id": "step_1",
    "name": "Step Name",
    "description": "What happens in this step",
    "step_type": "task",
    "next_steps": ["step_2"]
  }}
]"#,
        system = SYSTEM_PROMPT,
        text = text,
        context_line = context_line,
    )
}
