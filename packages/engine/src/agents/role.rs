// packages/engine/src/agents/role.rs
//! The four brainstorm roles and their static prompts

use crate::utils::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extra abilities an agent may be wired with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May call the image backend through the `generate_image` tool
    ImageGeneration,
}

/// Team roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    CommunityRepresentative,
    Developer,
    MarketingLead,
    Designer,
}

const COMMUNITY_INSTRUCTIONS: &[&str] = &[
    "Propose memecoin ideas focusing on community appeal and viral potential",
    "Evaluate proposals based on community engagement potential",
    "Help reach consensus on the final selection",
];

const DEVELOPER_INSTRUCTIONS: &[&str] = &[
    "1. Extract the Final Name, Final Ticker, Final Description from the Final Round discussion.",
    "2. Get the token image URL from the designer's output (look for 'Generated Token Image URL:').",
    "3. After successfully deploying it, respond with a confirmation message for the token deployment and its details",
];

const MARKETING_INSTRUCTIONS: &[&str] = &[
    "Propose memecoin ideas focusing on marketing potential",
    "Evaluate proposals based on viral appeal and brand strength",
    "Help reach consensus on the final selection",
    "Format your responses clearly and concisely.",
];

const DESIGNER_INSTRUCTIONS: &[&str] = &[
    "1. Generate a token image using DALL-E that represents the theme of the final memecoin idea",
    "2. Output the URL exactly as: 'Generated Token Image URL: <url>'",
];

const COMMUNITY_SYSTEM_PROMPT: &str = "You represent the voice of the community. Your core \
responsibilities are understanding the sentiments of the memecoin community from the viral \
trendy memecoins and accordingly construct your meme coin ideas. Format your responses clearly \
and concisely.";

const DEVELOPER_SYSTEM_PROMPT: &str = "You are the technical expert of the team. Your core \
responsibilities are:
1. Carefully extract these parameters from the discussions:
- Final Name, Final Ticker, and Final Description from the Final Round
- Token image URL from the designer's output (format: 'Generated Token Image URL: <url>')";

const MARKETING_SYSTEM_PROMPT: &str = "You are the marketing strategist of the team and your \
core responsibilities are to mindfully judge the memecoin ideas and improve the ideas based on \
viral appeals of the idea to the memecoin market.";

const DESIGNER_SYSTEM_PROMPT: &str = "You are responsible for creating the token image based on \
the finalized memecoin idea. Your tasks are:
1. Carefully read the Final Round discussion to extract the exact Final Name, Final Ticker, and Final Description
2. Generate an image using DALL-E that perfectly represents these final parameters
3. Output the image URL in this exact format: 'Generated Token Image URL: <url>'
Ensure the image aligns perfectly with the final consensus reached by the team.";

impl AgentRole {
    /// Every role, in configuration order
    pub const ALL: [AgentRole; 4] = [
        AgentRole::CommunityRepresentative,
        AgentRole::Developer,
        AgentRole::MarketingLead,
        AgentRole::Designer,
    ];

    /// Display name, also used as the author of this agent's turns
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::CommunityRepresentative => "Community Representative",
            AgentRole::Developer => "Developer",
            AgentRole::MarketingLead => "Marketing Lead",
            AgentRole::Designer => "Designer",
        }
    }

    /// Short role label included in the system message
    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::CommunityRepresentative => "community representative",
            AgentRole::Developer => "developer",
            AgentRole::MarketingLead => "marketing lead",
            AgentRole::Designer => "designer",
        }
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            AgentRole::CommunityRepresentative => COMMUNITY_INSTRUCTIONS,
            AgentRole::Developer => DEVELOPER_INSTRUCTIONS,
            AgentRole::MarketingLead => MARKETING_INSTRUCTIONS,
            AgentRole::Designer => DESIGNER_INSTRUCTIONS,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AgentRole::CommunityRepresentative => COMMUNITY_SYSTEM_PROMPT,
            AgentRole::Developer => DEVELOPER_SYSTEM_PROMPT,
            AgentRole::MarketingLead => MARKETING_SYSTEM_PROMPT,
            AgentRole::Designer => DESIGNER_SYSTEM_PROMPT,
        }
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            AgentRole::Designer => &[Capability::ImageGeneration],
            AgentRole::CommunityRepresentative
            | AgentRole::Developer
            | AgentRole::MarketingLead => &[],
        }
    }

    /// Machine-friendly metric label
    pub fn slug(&self) -> &'static str {
        match self {
            AgentRole::CommunityRepresentative => "community_representative",
            AgentRole::Developer => "developer",
            AgentRole::MarketingLead => "marketing_lead",
            AgentRole::Designer => "designer",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentRole {
    type Err = EngineError;

    /// Accepts display names and slugs, ignoring case
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();

        AgentRole::ALL
            .into_iter()
            .find(|role| {
                role.name().eq_ignore_ascii_case(wanted) || role.slug().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| EngineError::InvalidArgument(format!("unknown agent role: {}", s)))
    }
}
