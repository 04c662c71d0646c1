//! Supported models and their decoding settings.

use serde::{Deserialize, Serialize};

/// Model used when a request names none.
pub const DEFAULT_MODEL: &str = "gpt2";

/// How prompts are framed for a model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// Base models continue plain text.
    Completion,
    /// Instruction-tuned models expect a user turn followed by an assistant turn.
    Chat,
}

/// Catalog entry for a supported model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub style: PromptStyle,
}

/// Every model offered to clients.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo { id: "gpt2", name: "GPT-2 (default, fast)", style: PromptStyle::Completion },
    ModelInfo { id: "distilgpt2", name: "DistilGPT-2 (faster)", style: PromptStyle::Completion },
    ModelInfo {
        id: "EleutherAI/gpt-neo-125M",
        name: "GPT-Neo 125M (better quality)",
        style: PromptStyle::Completion,
    },
    ModelInfo {
        id: "microsoft/Phi-3-mini-4k-instruct",
        name: "Microsoft Phi-3 Mini (high quality)",
        style: PromptStyle::Chat,
    },
];

/// Catalog entry for `model_id`, if it is a known model.
pub fn find_model(model_id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|model| model.id == model_id)
}

/// Prompt framing for `model_id`.
///
/// Unknown models use plain completion unless their name says they are
/// instruction-tuned.
pub fn prompt_style(model_id: &str) -> PromptStyle {
    match find_model(model_id) {
        Some(model) => model.style,
        None if model_id.to_lowercase().contains("instruct") => PromptStyle::Chat,
        None => PromptStyle::Completion,
    }
}

/// Decoding parameters, held constant across the calls of one composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Sample from the distribution rather than decoding greedily.
    pub do_sample: bool,
    pub temperature: f32,
    /// Nucleus threshold.
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self { do_sample: true, temperature: 0.8, top_p: 0.9, top_k: 50, repetition_penalty: 1.1 }
    }
}

impl SamplingParams {
    /// Settings for a model family: chat models run slightly cooler.
    pub fn for_style(style: PromptStyle) -> Self {
        match style {
            PromptStyle::Completion => Self::default(),
            PromptStyle::Chat => Self { temperature: 0.7, ..Self::default() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(find_model("gpt2").unwrap().name, "GPT-2 (default, fast)");
        assert!(find_model("gpt-5").is_none());
        assert!(find_model(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn test_prompt_style() {
        assert_eq!(prompt_style("gpt2"), PromptStyle::Completion);
        assert_eq!(prompt_style("microsoft/Phi-3-mini-4k-instruct"), PromptStyle::Chat);
        assert_eq!(prompt_style("mistral-7b-Instruct"), PromptStyle::Chat);
        assert_eq!(prompt_style("llama3"), PromptStyle::Completion);
    }

    #[test]
    fn test_sampling_for_style() {
        let completion = SamplingParams::for_style(PromptStyle::Completion);
        let chat = SamplingParams::for_style(PromptStyle::Chat);

        assert!(completion.do_sample);
        assert!((completion.temperature - 0.8).abs() < f32::EPSILON);
        assert!((chat.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(chat.top_k, 50);
    }

    #[test]
    fn test_catalog_serializes_without_style() {
        let json = serde_json::to_value(MODELS).unwrap();
        assert_eq!(json[0], serde_json::json!({"id": "gpt2", "name": "GPT-2 (default, fast)"}));
        assert_eq!(json.as_array().unwrap().len(), 4);
    }
}
