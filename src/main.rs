use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::{json, Value};

use campaign_rs::campaign::prompt::Prompt;
use campaign_rs::campaign::response::RawValue;
use campaign_rs::campaign::survey::{ResponseContext, Survey, SurveyItem};
use campaign_rs::campaign::{Campaign, CampaignLoader};
use campaign_rs::error::CampaignError;

use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Campaign file (falls back to CAMPAIGN_FILE)
    #[arg(short, long, global = true)]
    file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a campaign and print a summary of its surveys
    Check,
    /// Decide whether a prompt is shown given earlier answers
    Evaluate {
        #[arg(short, long)]
        survey: String,

        #[arg(short, long)]
        prompt: String,

        /// JSON object of prompt id to answer
        #[arg(short, long, default_value = "{}")]
        answers: String,

        /// Iteration used for answers to repeatable set prompts
        #[arg(short, long, default_value_t = 0)]
        iteration: i64,
    },
    /// Normalize a single answer for a prompt
    Validate {
        #[arg(short, long)]
        survey: String,

        #[arg(short, long)]
        prompt: String,

        /// The raw answer; parsed as JSON when possible, otherwise taken as text
        #[arg(short, long)]
        value: String,

        #[arg(short, long)]
        iteration: Option<i64>,
    },
    /// Print the response schema of every prompt in a survey
    Schema {
        #[arg(short, long)]
        survey: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let file = args
        .file
        .or_else(|| std::env::var("CAMPAIGN_FILE").ok())
        .ok_or_else(|| CampaignError::config("No campaign file given; pass --file or set CAMPAIGN_FILE"))?;

    let campaign = CampaignLoader::new()
        .load_campaign(&file)
        .with_context(|| format!("Failed to load campaign from {}", file))?;

    match args.command {
        Commands::Check => print_summary(&campaign),
        Commands::Evaluate {
            survey,
            prompt,
            answers,
            iteration,
        } => {
            let survey = find_survey(&campaign, &survey)?;
            let target = find_prompt(survey, &prompt)?;

            let answers: Value =
                serde_json::from_str(&answers).context("Answers must be a JSON object")?;
            let Value::Object(answers) = answers else {
                bail!("Answers must be a JSON object");
            };

            let mut context = ResponseContext::new();
            for (prompt_id, value) in answers {
                let answered = find_prompt(survey, &prompt_id)?;
                let iteration = answered.repeatable_set().map(|_| iteration);
                let response = answered
                    .create_response(iteration, RawValue::from(value))
                    .with_context(|| format!("Invalid answer for prompt '{}'", prompt_id))?;
                context.insert(response);
            }

            let shown = target.is_shown(&context);
            log::info!("Prompt '{}' shown: {}", target.id(), shown);
            println!("{}", if shown { "shown" } else { "hidden" });
        }
        Commands::Validate {
            survey,
            prompt,
            value,
            iteration,
        } => {
            let survey = find_survey(&campaign, &survey)?;
            let target = find_prompt(survey, &prompt)?;

            let raw = match serde_json::from_str::<Value>(&value) {
                Ok(parsed) => RawValue::from(parsed),
                Err(_) => RawValue::Text(value),
            };
            let response = target.create_response(iteration, raw)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Schema { survey } => {
            let survey = find_survey(&campaign, &survey)?;
            let schemas: Vec<Value> = survey
                .prompts()
                .map(|prompt| {
                    json!({
                        "prompt_id": prompt.id(),
                        "type": prompt.kind().type_name(),
                        "response": prompt.response_schema(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }

    Ok(())
}

fn find_survey<'a>(campaign: &'a Campaign, survey_id: &str) -> Result<&'a Arc<Survey>, CampaignError> {
    campaign
        .survey(survey_id)
        .ok_or_else(|| CampaignError::SurveyNotFound(survey_id.to_string()))
}

fn find_prompt<'a>(survey: &'a Survey, prompt_id: &str) -> Result<&'a Arc<Prompt>, CampaignError> {
    survey
        .prompt(prompt_id)
        .ok_or_else(|| CampaignError::PromptNotFound {
            survey_id: survey.id().to_string(),
            prompt_id: prompt_id.to_string(),
        })
}

fn print_summary(campaign: &Campaign) {
    println!(
        "Campaign '{}' ({}) is {:?}",
        campaign.name(),
        campaign.id(),
        campaign.running_state()
    );
    for survey in campaign.surveys() {
        println!("  Survey '{}': {}", survey.id(), survey.title());
        for item in survey.items() {
            match item {
                SurveyItem::Prompt(prompt) => print_prompt(prompt, "    "),
                SurveyItem::RepeatableSet(set) => {
                    println!("    Repeatable set '{}'", set.id());
                    for prompt in set.prompts() {
                        print_prompt(prompt, "      ");
                    }
                }
            }
        }
    }
}

fn print_prompt(prompt: &Prompt, indent: &str) {
    match prompt.condition() {
        Some(condition) => println!(
            "{}{} [{}] when {}",
            indent,
            prompt.id(),
            prompt.kind().type_name(),
            condition.expression()
        ),
        None => println!("{}{} [{}]", indent, prompt.id(), prompt.kind().type_name()),
    }
}
