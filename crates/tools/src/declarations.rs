//! Function declarations offered to the model on the decision call.

use crate::types::ToolName;
use askrelay_llm::ToolDeclaration;
use serde_json::json;

/// Declarations for every tool, with today's date embedded in the
/// descriptions.
pub fn function_declarations(today: &str) -> Vec<ToolDeclaration> {
    ToolName::ALL
        .iter()
        .map(|tool| declaration(*tool, today))
        .collect()
}

fn declaration(tool: ToolName, today: &str) -> ToolDeclaration {
    let (description, query_description) = match tool {
        ToolName::GeneralResponse => (
            format!(
                "This function is used to get a general response to a question or any topic using Google Search. \
                 It provides current, up-to-date information from the web. \
                 Use this for general knowledge, current events, technology questions, or any non-Islamic topics. \
                 Today's date is {}.",
                today
            ),
            "The question or topic to search for using Google Search",
        ),
        ToolName::QuranResponse => (
            format!(
                "Handle Quran-related queries using specialized search on quran.com. \
                 This function provides comprehensive Islamic guidance with Quranic verses, reasoning, proper citations, and links to quran.com. \
                 Use this ONLY when users ask about Islam, Quran, Islamic teachings, Sunnah, Islamic guidance, religious questions, \
                 Islamic law, Islamic ethics, Islamic history, Prophet Muhammad (PBUH), Islamic practices (prayer, fasting, hajj, zakat), \
                 Islamic beliefs, or anything related to Islamic knowledge. \
                 This will search specifically on quran.com and provide verses with proper Surah:Ayah citations, interpretations, and direct links. \
                 Today's date is {}.",
                today
            ),
            "The Islamic/Quranic question or topic to search for \
             (e.g., 'What does Quran say about patience?', 'Islamic guidance on charity', \
             'Ayat about forgiveness', 'Prayer in Islam', 'Islamic concept of justice')",
        ),
    };

    ToolDeclaration {
        name: tool.as_str().to_string(),
        description,
        parameters: json!({
            "type": "OBJECT",
            "properties": {
                "query": {
                    "type": "STRING",
                    "description": query_description
                }
            },
            "required": ["query"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declares_both_tools() {
        let declarations = function_declarations("2025-03-07 09:05:01 +08");
        let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["get_general_response", "get_quran_response"]);
    }

    #[test]
    fn test_descriptions_carry_date() {
        for declaration in function_declarations("2025-03-07 09:05:01 +08") {
            assert!(declaration
                .description
                .ends_with("Today's date is 2025-03-07 09:05:01 +08."));
        }
    }

    #[test]
    fn test_query_is_required_string() {
        for declaration in function_declarations("today") {
            assert_eq!(declaration.parameters["type"], "OBJECT");
            assert_eq!(
                declaration.parameters["properties"]["query"]["type"],
                "STRING"
            );
            assert_eq!(declaration.parameters["required"], json!(["query"]));
        }
    }
}
