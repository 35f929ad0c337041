// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System instruction assembly: persona plus retrieved context.

use folio_config::model::AssistantConfig;
use folio_core::FolioError;
use tracing::info;

/// Builds the augmented system instruction for one user turn: the persona
/// followed by usage guidance and the retrieved context block.
pub fn build_system_prompt(persona: &str, context: &str) -> String {
    format!(
        "{persona}\n\
         Use the following context to answer the user's question. \
         If the answer is not in the context, politely say you don't know \
         but suggest using the contact form. Keep answers concise and friendly.\n\
         \n\
         Context:\n\
         {context}"
    )
}

/// Loads the persona following config priority: file > inline > default.
pub async fn load_persona(config: &AssistantConfig) -> Result<String, FolioError> {
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim().to_string();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded persona from file");
                    return Ok(trimmed);
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read persona file, falling back"
                );
            }
        }
    }

    if let Some(ref prompt) = config.system_prompt
        && !prompt.is_empty()
    {
        return Ok(prompt.clone());
    }

    Ok(format!(
        "You are a helpful assistant for {}'s portfolio website.",
        config.owner_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_persona_and_context() {
        let prompt = build_system_prompt("You are a helper.", "Name: X\nSkill: Y");
        assert!(prompt.starts_with("You are a helper."));
        assert!(prompt.contains("Context:\nName: X\nSkill: Y"));
    }

    #[tokio::test]
    async fn persona_defaults_to_owner_name() {
        let config = AssistantConfig {
            owner_name: "Yeamin".into(),
            ..Default::default()
        };
        let persona = load_persona(&config).await.unwrap();
        assert!(persona.contains("Yeamin"));
    }

    #[tokio::test]
    async fn inline_persona_wins_over_default() {
        let config = AssistantConfig {
            system_prompt: Some("Custom persona.".into()),
            ..Default::default()
        };
        assert_eq!(load_persona(&config).await.unwrap(), "Custom persona.");
    }

    #[tokio::test]
    async fn missing_persona_file_falls_back_to_inline() {
        let config = AssistantConfig {
            system_prompt_file: Some("/nonexistent/persona.md".into()),
            system_prompt: Some("Inline persona.".into()),
            ..Default::default()
        };
        assert_eq!(load_persona(&config).await.unwrap(), "Inline persona.");
    }
}
