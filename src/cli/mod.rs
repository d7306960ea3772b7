// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, builds the stage collaborators, and prints each stage's
// artifact as JSON on stdout. All decisions live in Layer 2.
//
//   1. `evaluate` — accept or reject the trained model
//   2. `push`     — upload the trained model
//   3. `promote`  — evaluate, then push when accepted

pub mod commands;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use commands::{Commands, EvaluateArgs, PromoteArgs, PushArgs};
use crate::application::{evaluate_use_case::ModelEvaluation, push_use_case::ModelPusher};
use crate::domain::{
    artifacts::{EvaluationArtifact, PusherArtifact, TrainerArtifact},
    config::EvaluationConfig,
};
use crate::ml::classifier::BurnModelLoader;

#[derive(Parser, Debug)]
#[command(
    name = "model-gate",
    version,
    about = "Evaluate a trained tweet classifier against the promoted model and push it when accepted."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Evaluate(args) => {
                let artifact = run_evaluate(args, args.trainer_artifact()?)?;
                print_json(&artifact)
            }
            Commands::Push(args) => {
                let artifact = run_push(args)?;
                print_json(&artifact)
            }
            Commands::Promote(args) => run_promote(args),
        }
    }
}

fn run_evaluate(args: &EvaluateArgs, trainer: TrainerArtifact) -> Result<EvaluationArtifact> {
    let config = EvaluationConfig::from(args);
    let loader = BurnModelLoader::new(config.batch_size);
    let stage  = ModelEvaluation::new(
        config,
        trainer,
        args.transformation_artifact()?,
        args.storage.build()?,
        loader,
    );
    Ok(stage.initiate()?)
}

fn run_push(args: &PushArgs) -> Result<PusherArtifact> {
    let stage = ModelPusher::new(args.into(), args.storage.build()?);
    Ok(stage.initiate()?)
}

fn run_promote(args: &PromoteArgs) -> Result<()> {
    #[derive(Serialize)]
    struct PromoteReport {
        evaluation: EvaluationArtifact,
        pusher:     Option<PusherArtifact>,
    }

    // The uploaded file is the evaluated one
    let trainer     = args.evaluate.trainer_artifact()?;
    let push_config = args.pusher_config(&trainer)?;

    let evaluation = run_evaluate(&args.evaluate, trainer)?;
    let pusher = if evaluation.is_model_accepted {
        let stage = ModelPusher::new(push_config, args.evaluate.storage.build()?);
        Some(stage.initiate()?)
    } else {
        tracing::info!("Trained model not accepted, skipping push");
        None
    };
    print_json(&PromoteReport { evaluation, pusher })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
