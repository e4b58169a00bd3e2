// SPDX-License-Identifier: MIT

//! Campaign loader - YAML loading and compilation
//!
//! Loading a campaign parses every display condition once and checks it
//! against the prompts it references, so a loaded campaign never carries an
//! illegal condition.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::condition::{is_identifier, ConditionCache};
use super::definition::{
    CampaignDefinition, PromptDefinition, PromptTypeName, PropertiesDefinition, SurveyDefinition,
    SurveyItemDefinition,
};
use super::prompt::{DisplayCondition, NumberPrompt, Prompt, PromptKind, TextPrompt, TimestampPrompt};
use super::survey::{RepeatableSet, Survey, SurveyItem};
use super::Campaign;
use crate::error::{CampaignError, DomainError};

/// Loads and compiles campaign definitions
#[derive(Debug, Clone, Default)]
pub struct CampaignLoader {
    cache: ConditionCache,
}

impl CampaignLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share a condition cache between loaders
    pub fn with_cache(cache: ConditionCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ConditionCache {
        &self.cache
    }

    /// Load and compile a campaign from a YAML file
    pub fn load_campaign<P: AsRef<Path>>(&self, path: P) -> Result<Campaign, CampaignError> {
        let path = path.as_ref();
        log::info!("Loading campaign from {}", path.display());
        let content = fs::read_to_string(path)?;
        let def = Self::parse_yaml(&content)?;
        self.compile(&def)
    }

    /// Parse a campaign definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<CampaignDefinition, CampaignError> {
        let def: CampaignDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Validate a definition and build the campaign
    pub fn compile(&self, def: &CampaignDefinition) -> Result<Campaign, CampaignError> {
        let mut survey_ids = HashSet::new();
        let mut surveys = Vec::with_capacity(def.surveys.len());

        for survey_def in &def.surveys {
            if !survey_ids.insert(survey_def.id.as_str()) {
                return Err(CampaignError::config(format!(
                    "Duplicate survey id '{}' in campaign '{}'",
                    survey_def.id, def.id
                )));
            }
            surveys.push(Arc::new(self.compile_survey(survey_def)?));
        }

        log::info!(
            "Compiled campaign '{}' with {} surveys ({} distinct conditions cached)",
            def.id,
            surveys.len(),
            self.cache.len()
        );

        Ok(Campaign::new(
            def.id.clone(),
            def.name.clone(),
            def.description.clone(),
            def.running_state,
            surveys,
        ))
    }

    fn compile_survey(&self, def: &SurveyDefinition) -> Result<Survey, CampaignError> {
        // Prompts compiled so far; conditions may only reference these
        let mut preceding: HashMap<String, Arc<Prompt>> = HashMap::new();
        let mut set_ids = HashSet::new();
        let mut items = Vec::with_capacity(def.items.len());

        for (index, item) in def.items.iter().enumerate() {
            match item {
                SurveyItemDefinition::Prompt(prompt_def) => {
                    let prompt = self.compile_prompt(prompt_def, index, None, &preceding)?;
                    let prompt = Arc::new(prompt);
                    preceding.insert(prompt.id().to_string(), Arc::clone(&prompt));
                    items.push(SurveyItem::Prompt(prompt));
                }
                SurveyItemDefinition::RepeatableSet(set_def) => {
                    if !set_ids.insert(set_def.id.as_str()) {
                        return Err(CampaignError::config(format!(
                            "Duplicate repeatable set id '{}' in survey '{}'",
                            set_def.id, def.id
                        )));
                    }
                    let mut prompts = Vec::with_capacity(set_def.prompts.len());
                    for (set_index, prompt_def) in set_def.prompts.iter().enumerate() {
                        let prompt = self.compile_prompt(
                            prompt_def,
                            set_index,
                            Some(&set_def.id),
                            &preceding,
                        )?;
                        let prompt = Arc::new(prompt);
                        preceding.insert(prompt.id().to_string(), Arc::clone(&prompt));
                        prompts.push(prompt);
                    }
                    items.push(SurveyItem::RepeatableSet(RepeatableSet::new(
                        set_def.id.clone(),
                        prompts,
                    )));
                }
            }
        }

        log::debug!(
            "Compiled survey '{}' with {} prompts",
            def.id,
            preceding.len()
        );

        Ok(Survey::new(
            def.id.clone(),
            def.title.clone(),
            def.description.clone(),
            items,
        ))
    }

    fn compile_prompt(
        &self,
        def: &PromptDefinition,
        index: usize,
        repeatable_set: Option<&str>,
        preceding: &HashMap<String, Arc<Prompt>>,
    ) -> Result<Prompt, CampaignError> {
        if !is_identifier(&def.id) {
            return Err(DomainError::invalid_properties(
                &def.id,
                "prompt ids must be letters, digits or '_' and not start with a digit",
            )
            .into());
        }
        if preceding.contains_key(&def.id) {
            return Err(DomainError::DuplicatePrompt {
                prompt_id: def.id.clone(),
            }
            .into());
        }

        let kind = build_kind(&def.id, def.prompt_type, &def.properties)?;
        kind.check_properties(&def.id)?;

        let mut prompt = Prompt::new(def.id.clone(), def.text.clone(), kind)
            .with_skippable(def.skippable)
            .with_index(index);

        match (&def.skip_label, def.skippable) {
            (Some(label), true) => prompt = prompt.with_skip_label(label.clone()),
            (Some(_), false) => {
                return Err(DomainError::invalid_properties(
                    &def.id,
                    "skip_label is only allowed on skippable prompts",
                )
                .into())
            }
            (None, _) => {}
        }
        if let Some(unit) = &def.unit {
            prompt = prompt.with_unit(unit.clone());
        }
        if let Some(explanation_text) = &def.explanation_text {
            prompt = prompt.with_explanation_text(explanation_text.clone());
        }
        if let Some(display_label) = &def.display_label {
            prompt = prompt.with_display_label(display_label.clone());
        }
        if let Some(set_id) = repeatable_set {
            prompt = prompt.in_repeatable_set(set_id);
        }
        if let Some(condition) = &def.condition {
            prompt = prompt.with_condition(self.compile_condition(&def.id, condition, preceding)?);
        }

        Ok(prompt)
    }

    fn compile_condition(
        &self,
        prompt_id: &str,
        condition: &str,
        preceding: &HashMap<String, Arc<Prompt>>,
    ) -> Result<DisplayCondition, CampaignError> {
        let expression = self
            .cache
            .get_or_parse(condition)
            .map_err(|e| CampaignError::condition(prompt_id, e))?;

        for pair in expression.pairs() {
            let referenced = preceding.get(&pair.prompt_id).ok_or_else(|| {
                DomainError::InvalidReference {
                    prompt_id: prompt_id.to_string(),
                    referenced: pair.prompt_id.clone(),
                }
            })?;

            // Reported against the prompt whose condition is wrong
            referenced
                .validate_condition_value_pair(pair)
                .map_err(|e| match e {
                    DomainError::IllegalCondition { pair, reason, .. } => {
                        DomainError::IllegalCondition {
                            prompt_id: prompt_id.to_string(),
                            pair,
                            reason,
                        }
                    }
                    other => other,
                })?;
        }

        Ok(DisplayCondition::new(condition, expression))
    }
}

fn build_kind(
    prompt_id: &str,
    prompt_type: PromptTypeName,
    properties: &PropertiesDefinition,
) -> Result<PromptKind, DomainError> {
    match prompt_type {
        PromptTypeName::Timestamp => {
            if !properties.is_empty() {
                return Err(DomainError::invalid_properties(
                    prompt_id,
                    "timestamp prompts take no properties",
                ));
            }
            Ok(PromptKind::Timestamp(TimestampPrompt))
        }
        PromptTypeName::Number => Ok(PromptKind::Number(NumberPrompt::new(
            properties.min,
            properties.max,
            properties.whole_number.unwrap_or(false),
        ))),
        PromptTypeName::Text => {
            if properties.whole_number.is_some() {
                return Err(DomainError::invalid_properties(
                    prompt_id,
                    "whole_number only applies to number prompts",
                ));
            }
            Ok(PromptKind::Text(TextPrompt::new(
                length_bound(prompt_id, "min", properties.min)?,
                length_bound(prompt_id, "max", properties.max)?,
            )))
        }
    }
}

fn length_bound(
    prompt_id: &str,
    name: &str,
    bound: Option<f64>,
) -> Result<Option<usize>, DomainError> {
    match bound {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(Some(n as usize)),
        Some(n) => Err(DomainError::invalid_properties(
            prompt_id,
            format!("{} length must be a non-negative whole number, got {}", name, n),
        )),
    }
}
