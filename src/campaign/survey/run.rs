// SPDX-License-Identifier: MIT

//! Survey run - walks a survey's prompts for one submission

use serde::Serialize;
use std::sync::Arc;

use super::{ResponseContext, Survey, SurveyItem};
use crate::campaign::prompt::Prompt;
use crate::campaign::response::{NoResponse, PromptResponse, RawValue};
use crate::campaign::{Campaign, RunningState};
use crate::error::CampaignError;

/// Where the run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// At a top-level item
    Item(usize),
    /// At a prompt inside the repeatable set at `item`
    InSet {
        item: usize,
        prompt: usize,
        iteration: u32,
    },
    Done,
}

/// Every response collected during a finished run, in the order they were
/// recorded
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub campaign_id: String,
    pub survey_id: String,
    pub responses: Vec<PromptResponse>,
}

/// Drives one submission of a survey.
///
/// Call [`SurveyRun::next_prompt`] to get the prompt to show, then
/// [`SurveyRun::answer`] it. Prompts whose condition is false are recorded as
/// `NOT_DISPLAYED` and never returned.
#[derive(Debug)]
pub struct SurveyRun {
    campaign_id: String,
    survey: Arc<Survey>,
    position: Position,
    pending: Option<Arc<Prompt>>,
    context: ResponseContext,
    responses: Vec<PromptResponse>,
}

impl SurveyRun {
    /// Start a run of `survey_id`. Stopped campaigns accept no submissions.
    pub fn start(campaign: &Campaign, survey_id: &str) -> Result<Self, CampaignError> {
        if campaign.running_state() == RunningState::Stopped {
            return Err(CampaignError::CampaignStopped(campaign.id().to_string()));
        }

        let survey = campaign
            .survey(survey_id)
            .cloned()
            .ok_or_else(|| CampaignError::SurveyNotFound(survey_id.to_string()))?;

        log::info!(
            "Starting survey '{}' of campaign '{}'",
            survey.id(),
            campaign.id()
        );

        Ok(Self {
            campaign_id: campaign.id().to_string(),
            survey,
            position: Position::Item(0),
            pending: None,
            context: ResponseContext::new(),
            responses: Vec::new(),
        })
    }

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    /// Responses visible to conditions
    pub fn context(&self) -> &ResponseContext {
        &self.context
    }

    /// All responses recorded so far
    pub fn responses(&self) -> &[PromptResponse] {
        &self.responses
    }

    /// Current iteration of the repeatable set being walked, if any
    pub fn iteration(&self) -> Option<u32> {
        match self.position {
            Position::InSet { iteration, .. } => Some(iteration),
            _ => None,
        }
    }

    /// The next prompt to show, or `None` once the survey is complete.
    ///
    /// Calling this again without answering returns the same prompt.
    pub fn next_prompt(&mut self) -> Result<Option<Arc<Prompt>>, CampaignError> {
        if let Some(prompt) = &self.pending {
            return Ok(Some(Arc::clone(prompt)));
        }

        let survey = Arc::clone(&self.survey);
        loop {
            let prompt = match self.position {
                Position::Done => return Ok(None),
                Position::Item(item) => match survey.items().get(item) {
                    None => {
                        self.position = Position::Done;
                        continue;
                    }
                    Some(SurveyItem::Prompt(prompt)) => Arc::clone(prompt),
                    Some(SurveyItem::RepeatableSet(_)) => {
                        self.position = Position::InSet {
                            item,
                            prompt: 0,
                            iteration: 0,
                        };
                        continue;
                    }
                },
                Position::InSet { item, prompt, .. } => match set_prompt(&survey, item, prompt) {
                    Some(prompt) => prompt,
                    None => {
                        self.position = Position::Item(item + 1);
                        continue;
                    }
                },
            };

            if prompt.is_shown(&self.context) {
                self.pending = Some(Arc::clone(&prompt));
                return Ok(Some(prompt));
            }
            self.record_not_displayed(&prompt)?;
        }
    }

    /// Answer the prompt last returned by [`SurveyRun::next_prompt`].
    ///
    /// An invalid value leaves the prompt pending.
    pub fn answer(&mut self, value: impl Into<RawValue>) -> Result<PromptResponse, CampaignError> {
        let prompt = self
            .pending
            .clone()
            .ok_or_else(|| CampaignError::run("no prompt is awaiting an answer"))?;

        let response = prompt
            .create_response(self.iteration().map(i64::from), value)
            .map_err(|e| {
                log::warn!("Rejected answer for prompt '{}': {}", prompt.id(), e);
                e
            })?;
        self.pending = None;
        log::debug!("Answered prompt '{}'", prompt.id());
        self.store(response.clone());
        self.advance();
        Ok(response)
    }

    /// Start the next iteration of the current repeatable set.
    ///
    /// Prompts left in the current iteration must all be hidden; they are
    /// recorded as `NOT_DISPLAYED`.
    pub fn repeat(&mut self) -> Result<u32, CampaignError> {
        let Position::InSet { item, iteration, .. } = self.position else {
            return Err(CampaignError::run("the run is not inside a repeatable set"));
        };
        if let Some(prompt) = &self.pending {
            return Err(CampaignError::run(format!(
                "prompt '{}' has not been answered",
                prompt.id()
            )));
        }

        let survey = Arc::clone(&self.survey);
        while let Position::InSet { prompt, .. } = self.position {
            let Some(prompt) = set_prompt(&survey, item, prompt) else {
                break;
            };
            if prompt.is_shown(&self.context) {
                return Err(CampaignError::run(format!(
                    "prompt '{}' has not been answered",
                    prompt.id()
                )));
            }
            self.record_not_displayed(&prompt)?;
        }

        let next = iteration + 1;
        self.position = Position::InSet {
            item,
            prompt: 0,
            iteration: next,
        };
        log::info!(
            "Starting iteration {} of repeatable set in survey '{}'",
            next,
            self.survey.id()
        );
        Ok(next)
    }

    /// Complete the run. Every displayed prompt must have been answered.
    pub fn finish(mut self) -> Result<Submission, CampaignError> {
        if let Some(prompt) = self.next_prompt()? {
            return Err(CampaignError::run(format!(
                "prompt '{}' has not been answered",
                prompt.id()
            )));
        }

        log::info!(
            "Finished survey '{}' with {} responses",
            self.survey.id(),
            self.responses.len()
        );

        Ok(Submission {
            campaign_id: self.campaign_id,
            survey_id: self.survey.id().to_string(),
            responses: self.responses,
        })
    }

    fn record_not_displayed(&mut self, prompt: &Arc<Prompt>) -> Result<(), CampaignError> {
        log::debug!("Prompt '{}' not displayed", prompt.id());
        let response = prompt.create_response(
            self.iteration().map(i64::from),
            NoResponse::NotDisplayed,
        )?;
        self.store(response);
        self.advance();
        Ok(())
    }

    fn store(&mut self, response: PromptResponse) {
        self.context.insert(response.clone());
        self.responses.push(response);
    }

    fn advance(&mut self) {
        self.position = match self.position {
            Position::Item(item) => Position::Item(item + 1),
            Position::InSet {
                item,
                prompt,
                iteration,
            } => Position::InSet {
                item,
                prompt: prompt + 1,
                iteration,
            },
            Position::Done => Position::Done,
        };
    }
}

fn set_prompt(survey: &Survey, item: usize, index: usize) -> Option<Arc<Prompt>> {
    match survey.items().get(item)? {
        SurveyItem::RepeatableSet(set) => set.prompts().get(index).cloned(),
        SurveyItem::Prompt(_) => None,
    }
}
