// SPDX-License-Identifier: MIT

//! YAML schema types for campaign definitions
//!
//! These mirror the campaign file one to one. [`crate::campaign::CampaignLoader`]
//! turns them into validated [`crate::campaign::Campaign`]s.

use serde::{Deserialize, Serialize};

/// Top-level campaign definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CampaignDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub running_state: RunningState,
    #[serde(default)]
    pub surveys: Vec<SurveyDefinition>,
}

/// Whether a campaign accepts submissions
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunningState {
    #[default]
    Running,
    Stopped,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SurveyDefinition {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<SurveyItemDefinition>,
}

/// A survey entry: `prompt: {...}` or `repeatable_set: {...}`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "snake_case")]
pub enum SurveyItemDefinition {
    Prompt(PromptDefinition),
    RepeatableSet(RepeatableSetDefinition),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RepeatableSetDefinition {
    pub id: String,
    pub prompts: Vec<PromptDefinition>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PromptDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub prompt_type: PromptTypeName,
    pub text: String,
    /// Display condition over earlier prompts
    pub condition: Option<String>,
    pub unit: Option<String>,
    pub explanation_text: Option<String>,
    #[serde(default)]
    pub skippable: bool,
    pub skip_label: Option<String>,
    pub display_label: Option<String>,
    #[serde(default)]
    pub properties: PropertiesDefinition,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptTypeName {
    Timestamp,
    Number,
    Text,
}

/// Type-specific settings. For text prompts `min`/`max` bound the length.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PropertiesDefinition {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub whole_number: Option<bool>,
}

impl PropertiesDefinition {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.whole_number.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_campaign() {
        let yaml = r#"
id: sleep-study
name: Sleep study
surveys:
  - id: morning
    title: Morning survey
    items:
      - prompt:
          id: wake_time
          type: timestamp
          text: When did you wake up?
      - prompt:
          id: hours
          type: number
          text: How many hours did you sleep?
          unit: hours
          skippable: true
          skip_label: Rather not say
          properties:
            min: 0
            max: 24
      - repeatable_set:
          id: naps
          prompts:
            - id: nap_length
              type: number
              text: How long was the nap?
              condition: hours < 6
              properties:
                whole_number: true
"#;
        let def: CampaignDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "sleep-study");
        assert_eq!(def.running_state, RunningState::Running);
        assert!(def.description.is_none());

        let survey = &def.surveys[0];
        assert_eq!(survey.items.len(), 3);

        match &survey.items[1] {
            SurveyItemDefinition::Prompt(prompt) => {
                assert_eq!(prompt.prompt_type, PromptTypeName::Number);
                assert!(prompt.skippable);
                assert_eq!(prompt.properties.max, Some(24.0));
                assert_eq!(prompt.unit.as_deref(), Some("hours"));
            }
            SurveyItemDefinition::RepeatableSet(_) => panic!("Expected Prompt, got RepeatableSet"),
        }

        match &survey.items[2] {
            SurveyItemDefinition::RepeatableSet(set) => {
                assert_eq!(set.id, "naps");
                assert_eq!(set.prompts[0].condition.as_deref(), Some("hours < 6"));
                assert_eq!(set.prompts[0].properties.whole_number, Some(true));
            }
            SurveyItemDefinition::Prompt(_) => panic!("Expected RepeatableSet, got Prompt"),
        }
    }

    #[test]
    fn test_running_state() {
        let yaml = "id: c\nname: C\nrunning_state: stopped\n";
        let def: CampaignDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.running_state, RunningState::Stopped);
        assert!(def.surveys.is_empty());
    }

    #[test]
    fn test_unknown_prompt_type() {
        let yaml = r#"
id: c
name: C
surveys:
  - id: s
    title: S
    items:
      - prompt:
          id: p
          type: photo
          text: Take a photo
"#;
        assert!(serde_yaml::from_str::<CampaignDefinition>(yaml).is_err());
    }
}
