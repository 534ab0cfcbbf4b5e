//! Fixture driver.
//!
//! Runs a list of tasks end to end: every task is enumerated and the whole
//! artifact name set is checked for collisions before anything is written.
//! Each task then loads and splits its dataset once and works through its
//! variants in order. The first error stops the run.

use crate::boosting::{Learner, TrainingAdapter};
use crate::config::core::FixtureConfig;
use crate::config::task::Task;
use crate::core::error::{FixtureError, Result};
use crate::dataset::loader::DatasetLoader;
use crate::dataset::split::split;
use crate::io::artifact::ArtifactWriter;
use crate::variant::enumerator::{check_unique, enumerate, Evaluation, ModelSource, Variant};
use crate::variant::naming::ArtifactName;
use std::collections::HashSet;

/// Artifacts written by one run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Model artifacts
    pub models: Vec<ArtifactName>,
    /// Prediction tables
    pub tables: Vec<ArtifactName>,
}

/// Orchestrates loading, training, evaluation and writing.
#[derive(Debug, Clone)]
pub struct FixtureDriver<L> {
    loader: DatasetLoader,
    adapter: TrainingAdapter<L>,
    writer: ArtifactWriter,
}

impl<L: Learner> FixtureDriver<L> {
    /// Assemble a driver from its parts.
    pub fn new(loader: DatasetLoader, adapter: TrainingAdapter<L>, writer: ArtifactWriter) -> Self {
        FixtureDriver {
            loader,
            adapter,
            writer,
        }
    }

    /// Build a driver over the directories of `config`.
    pub fn from_config(learner: L, config: &FixtureConfig) -> Self {
        Self::new(
            DatasetLoader::new(&config.data_dir),
            TrainingAdapter::new(learner),
            ArtifactWriter::from_config(config),
        )
    }

    /// The training adapter.
    pub fn adapter(&self) -> &TrainingAdapter<L> {
        &self.adapter
    }

    /// The artifact writer.
    pub fn writer(&self) -> &ArtifactWriter {
        &self.writer
    }

    /// Enumerate every task and check the combined artifact names.
    pub fn plan<'t>(&self, tasks: &'t [Task]) -> Result<Vec<(&'t Task, Vec<Variant>)>> {
        let plan = tasks
            .iter()
            .map(|task| enumerate(task).map(|variants| (task, variants)))
            .collect::<Result<Vec<_>>>()?;

        check_unique(plan.iter().flat_map(|(_, variants)| variants.iter()))?;
        self.check_external_models(plan.iter().flat_map(|(_, variants)| variants.iter()))?;
        Ok(plan)
    }

    /// Every loaded model must be written earlier in the run or already
    /// exist on disk.
    fn check_external_models<'v, I>(&self, variants: I) -> Result<()>
    where
        I: IntoIterator<Item = &'v Variant>,
    {
        let mut written = HashSet::new();
        for variant in variants {
            match &variant.source {
                ModelSource::Train if variant.writes_model() => {
                    written.insert(&variant.model_name);
                }
                ModelSource::External(name) if !written.contains(name) => {
                    let path = self.writer.model_path(name);
                    if !path.is_file() {
                        return Err(FixtureError::serialization(format!(
                            "{} needs model {}, not trained earlier in this run nor found at {}",
                            variant.prediction_name,
                            name,
                            path.display()
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Run all tasks in order.
    pub fn run(&self, tasks: &[Task]) -> Result<RunSummary> {
        let plan = self.plan(tasks)?;
        let mut summary = RunSummary::default();

        for (task, variants) in plan {
            log::info!("Task {} ({} variants)", task.name(), variants.len());
            if let Err(err) = self.run_task(task, &variants, &mut summary) {
                log::error!("Task {} failed [{}]: {}", task.name(), err.category(), err);
                return Err(err);
            }
        }

        log::info!(
            "Wrote {} models and {} prediction tables",
            summary.models.len(),
            summary.tables.len()
        );
        Ok(summary)
    }

    fn run_task(&self, task: &Task, variants: &[Variant], summary: &mut RunSummary) -> Result<()> {
        let table = self.loader.load(task.source(), task.categorical())?;
        let (features, target) = split(&table, task)?;

        let mut current: Option<(ArtifactName, L::Model)> = None;

        for variant in variants {
            match (&variant.source, variant.evaluation) {
                (ModelSource::Train, Evaluation::Full) => {
                    let model = self.adapter.fit(variant, &features, &target)?;
                    self.writer.write_model(&model, &variant.model_name)?;
                    summary.models.push(variant.model_name.clone());
                    current = Some((variant.model_name.clone(), model));
                }
                (ModelSource::Train, Evaluation::Truncated(_)) => {}
                (ModelSource::External(name), _) => {
                    let bytes = self.writer.read_model(name)?;
                    current = Some((name.clone(), self.adapter.load(&bytes)?));
                }
            }

            let model = match &current {
                Some((name, model)) if *name == variant.model_name => model,
                _ => {
                    return Err(FixtureError::training(format!(
                        "{} is evaluated before model {} was trained",
                        variant.prediction_name, variant.model_name
                    )))
                }
            };

            let predictions = self.adapter.evaluate(model, &features, variant)?;
            self.writer.write_predictions(&predictions, &variant.prediction_name)?;
            summary.tables.push(variant.prediction_name.clone());
        }

        Ok(())
    }
}

/// Validate `config` and run its tasks with `learner`.
pub fn generate<L: Learner>(learner: L, config: &FixtureConfig) -> Result<RunSummary> {
    config.validate()?;
    FixtureDriver::from_config(learner, config).run(&config.tasks)
}
