use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What kind of writing help is being asked for. Selects the system preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    #[default]
    PlotIdea,
    CharacterDevelopment,
    Dialogue,
    SettingDescription,
    Conflict,
    Rewrite,
    General,
}

impl Purpose {
    pub const ALL: [Purpose; 7] = [
        Purpose::PlotIdea,
        Purpose::CharacterDevelopment,
        Purpose::Dialogue,
        Purpose::SettingDescription,
        Purpose::Conflict,
        Purpose::Rewrite,
        Purpose::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::PlotIdea => "plot-idea",
            Purpose::CharacterDevelopment => "character-development",
            Purpose::Dialogue => "dialogue",
            Purpose::SettingDescription => "setting-description",
            Purpose::Conflict => "conflict",
            Purpose::Rewrite => "rewrite",
            Purpose::General => "general",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Purpose::PlotIdea => "Plot Ideas",
            Purpose::CharacterDevelopment => "Character Development",
            Purpose::Dialogue => "Dialogue",
            Purpose::SettingDescription => "Setting Description",
            Purpose::Conflict => "Conflict & Tension",
            Purpose::Rewrite => "Rewrite & Improve",
            Purpose::General => "General Help",
        }
    }

    /// System prompt sent to the provider ahead of the user's text.
    pub fn preamble(self) -> &'static str {
        match self {
            Purpose::PlotIdea => {
                "You are a creative writing assistant. Generate three unique and creative plot \
ideas or plot twists. Be specific, original, and provide enough detail to spark inspiration."
            }
            Purpose::CharacterDevelopment => {
                "You are a character development expert. Suggest detailed character development \
opportunities or backstory elements. Focus on creating complex, believable characters with depth."
            }
            Purpose::Dialogue => {
                "You are a dialogue expert. Write realistic, engaging, and character-appropriate \
dialogue. Ensure the dialogue reveals character and advances the narrative."
            }
            Purpose::SettingDescription => {
                "You are a setting description specialist. Create vivid, immersive descriptions \
that engage multiple senses and establish atmosphere, mood, and context."
            }
            Purpose::Conflict => {
                "You are a narrative conflict expert. Suggest compelling conflicts or obstacles \
that create tension, challenge characters, and drive plot development."
            }
            Purpose::Rewrite => {
                "You are an editing assistant. Rewrite the provided text to improve quality, \
clarity, and impact while maintaining the original meaning and voice."
            }
            Purpose::General => {
                "You are a helpful writing assistant. Provide thoughtful, creative, and useful \
responses to help with writing projects."
            }
        }
    }

    /// Lead-in the assistant panel puts in front of the writer's context.
    pub fn lead_in(self) -> &'static str {
        match self {
            Purpose::PlotIdea => "Suggest plot ideas for the following:",
            Purpose::CharacterDevelopment => "Help me develop this character:",
            Purpose::Dialogue => "Write dialogue for this situation:",
            Purpose::SettingDescription => "Describe this setting:",
            Purpose::Conflict => "Suggest conflicts for this story:",
            Purpose::Rewrite => "Rewrite the following text:",
            Purpose::General => "Help me with the following:",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised purposes fall back to [`Purpose::General`].
impl FromStr for Purpose {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Purpose::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .unwrap_or(Purpose::General))
    }
}

/// User message for a purpose: the lead-in, a blank line, then the context verbatim.
pub fn compose_request(purpose: Purpose, context: &str) -> String {
    format!("{}\n\n{}", purpose.lead_in(), context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_and_falls_back_to_general() {
        assert_eq!("plot-idea".parse::<Purpose>().unwrap(), Purpose::PlotIdea);
        assert_eq!(
            "setting-description".parse::<Purpose>().unwrap(),
            Purpose::SettingDescription
        );
        assert_eq!("limerick".parse::<Purpose>().unwrap(), Purpose::General);
    }

    #[test]
    fn wire_names_match_serde() {
        for purpose in Purpose::ALL {
            let json = serde_json::to_string(&purpose).unwrap();
            assert_eq!(json, format!("\"{}\"", purpose.as_str()));
        }
    }

    #[test]
    fn every_purpose_has_a_distinct_preamble() {
        let mut seen: Vec<&str> = Purpose::ALL.iter().map(|p| p.preamble()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Purpose::ALL.len());
    }

    #[test]
    fn compose_keeps_context_verbatim() {
        let msg = compose_request(Purpose::Dialogue, "  two spies\nmeet ");
        assert!(msg.ends_with("\n\n  two spies\nmeet "));
    }
}
