//! Prompt builder for the decision call and the final streaming call.

use crate::history::{recent_turns, render_history};
use crate::templates::{FINAL_INSTRUCTION, MAIN_PROMPT_TEMPLATE};
use crate::types::{BuiltPrompt, BuiltPromptMetadata, ConversationTurn, FunctionOutput};
use askrelay_core::clock::{format_time_of_day, format_timestamp};
use askrelay_core::{AppError, AppResult};
use chrono::DateTime;
use chrono_tz::Tz;
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build the routing prompt for a question.
///
/// This function:
/// 1. Bounds the history to the most recent turns
/// 2. Renders the history as `role: message` lines
/// 3. Renders the routing template with date, time and question
///
/// # Example
/// ```no_run
/// use askrelay_core::CivilClock;
/// use askrelay_prompt::{build_prompt, ConversationTurn};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let history = vec![ConversationTurn::new("user", "Hi")];
/// let built = build_prompt("What is zakat?", &history, &CivilClock::default().now())?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    question: &str,
    history: &[ConversationTurn],
    now: &DateTime<Tz>,
) -> AppResult<BuiltPrompt> {
    let recent = recent_turns(history);
    let generated_at = format_timestamp(now);

    tracing::debug!(
        history_turns = recent.len(),
        history_dropped = history.len() - recent.len(),
        "Building routing prompt"
    );

    let mut variables = HashMap::new();
    variables.insert("today", generated_at.clone());
    variables.insert("time", format_time_of_day(now));
    variables.insert("conversationContext", render_history(recent));
    variables.insert("question", question.to_string());

    let text = render_template(MAIN_PROMPT_TEMPLATE, &variables)?;

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            generated_at,
            history_turns: recent.len(),
            history_dropped: history.len() - recent.len(),
        },
    })
}

/// Build the prompt for the final streaming call.
///
/// The main prompt is followed by each tool output and a closing
/// instruction.
pub fn build_final_prompt(main_prompt: &str, outputs: &[FunctionOutput]) -> String {
    let mut prompt = String::from(main_prompt);
    for output in outputs {
        prompt.push_str("\n\nFunction ");
        prompt.push_str(&output.name);
        prompt.push_str(" returned:\n");
        prompt.push_str(&output.output);
    }
    prompt.push_str(FINAL_INSTRUCTION);
    prompt
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<&str, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap()
    }

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question", "<b>Hello</b> & world".to_string());

        let result = render_template("Question: {{question}}", &vars).unwrap();
        assert_eq!(result, "Question: <b>Hello</b> & world");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let vars = HashMap::new();
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &vars).unwrap();
        assert_eq!(result, "Question: ");
    }

    #[test]
    fn test_build_prompt_embeds_time_and_question() {
        let built = build_prompt("Is it raining in Penang?", &[], &fixed_now()).unwrap();

        assert!(built
            .text
            .contains("📅 Today's Date: 2025-03-07 09:05:01 UTC"));
        assert!(built.text.contains("📅 Current Time: 09:05:01 UTC"));
        assert!(built
            .text
            .contains("User Question: Is it raining in Penang?"));
        assert!(!built.text.contains("Previous conversation context"));
        assert_eq!(built.metadata.generated_at, "2025-03-07 09:05:01 UTC");
        assert_eq!(built.metadata.history_turns, 0);
    }

    #[test]
    fn test_build_prompt_includes_routing_rules() {
        let built = build_prompt("hi", &[], &fixed_now()).unwrap();
        assert!(built.text.contains("\"get_general_response\""));
        assert!(built.text.contains("\"get_quran_response\""));
        assert!(built.text.contains("Simple conversation → respond directly"));
    }

    #[test]
    fn test_build_prompt_keeps_last_ten_turns() {
        let history: Vec<ConversationTurn> = (0..12)
            .map(|i| ConversationTurn::new(if i % 2 == 0 { "user" } else { "model" }, format!("turn-{:02}", i)))
            .collect();

        let built = build_prompt("next?", &history, &fixed_now()).unwrap();

        assert!(!built.text.contains("turn-00"));
        assert!(!built.text.contains("turn-01"));
        let positions: Vec<usize> = (2..12)
            .map(|i| built.text.find(&format!("turn-{:02}", i)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(built.text.contains("user: turn-02\nmodel: turn-03\n"));
        assert_eq!(built.metadata.history_turns, 10);
        assert_eq!(built.metadata.history_dropped, 2);
    }

    #[test]
    fn test_question_with_braces_is_not_a_template() {
        let built = build_prompt("what does {{x}} mean?", &[], &fixed_now()).unwrap();
        assert!(built.text.contains("User Question: what does {{x}} mean?"));
    }

    #[test]
    fn test_build_final_prompt() {
        let outputs = vec![
            FunctionOutput {
                name: "get_general_response".to_string(),
                output: "{\"success\": true}".to_string(),
            },
            FunctionOutput {
                name: "get_quran_response".to_string(),
                output: "{\"success\": false}".to_string(),
            },
        ];

        let prompt = build_final_prompt("MAIN", &outputs);
        assert_eq!(
            prompt,
            format!(
                "MAIN\n\nFunction get_general_response returned:\n{{\"success\": true}}\n\nFunction get_quran_response returned:\n{{\"success\": false}}{}",
                FINAL_INSTRUCTION
            )
        );
    }
}
