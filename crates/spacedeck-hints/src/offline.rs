//! Canned hints used when no text-generation service is configured.

use async_trait::async_trait;

use spacedeck_core::traits::{HintProvider, HintRequest};

/// Returns fixed template text without any network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl HintProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn hint(&self, request: &HintRequest) -> anyhow::Result<String> {
        Ok(match request {
            HintRequest::WordExample { word, translation } => format!(
                "Example sentences for \"{word}\":\n\
                 1. I like the {word}. - Eu gosto do/da {translation}.\n\
                 2. The {word} is beautiful. - O/A {translation} é bonito/a.\n\n\
                 (Set GEMINI_API_KEY for AI-generated examples)"
            ),
            HintRequest::SentenceTip { .. } => "Dica: Preste atenção na ordem das palavras em inglês \
                 - geralmente é Sujeito + Verbo + Objeto. Compare com a tradução em português \
                 para ver as diferenças.\n\n\
                 (Configure GEMINI_API_KEY para dicas personalizadas com IA)"
                .to_string(),
        })
    }
}
