//! The immutable stage registry.

use std::collections::HashMap;

use korkyra_core::error::ExperienceError;
use korkyra_core::ids::StageId;
use serde::Deserialize;

use crate::stage::Stage;

/// Serde shape of an authored YAML stage file.
#[derive(Debug, Deserialize)]
struct StageFile {
    start: StageId,
    stages: Vec<Stage>,
}

/// Immutable mapping from stage id to stage definition, constructed once
/// at startup and never mutated.
#[derive(Debug)]
pub struct StageRegistry {
    start: StageId,
    stages: HashMap<StageId, Stage>,
}

impl StageRegistry {
    /// Builds a registry and validates its structure: at least one stage,
    /// no duplicate ids, a registered start stage, and no action effect
    /// targeting an unregistered stage.
    ///
    /// # Errors
    ///
    /// Returns `ExperienceError::InvalidRegistry` for structural problems
    /// and `ExperienceError::UnknownStage` for a dangling action target.
    pub fn new(start: StageId, stages: Vec<Stage>) -> Result<Self, ExperienceError> {
        if stages.is_empty() {
            return Err(ExperienceError::InvalidRegistry(
                "a registry needs at least one stage".to_owned(),
            ));
        }

        let mut map = HashMap::with_capacity(stages.len());
        for stage in stages {
            let id = stage.id.clone();
            if map.insert(id.clone(), stage).is_some() {
                return Err(ExperienceError::InvalidRegistry(format!(
                    "duplicate stage id: {id}"
                )));
            }
        }

        if !map.contains_key(&start) {
            return Err(ExperienceError::InvalidRegistry(format!(
                "start stage is not registered: {start}"
            )));
        }

        for stage in map.values() {
            for action in &stage.actions {
                if let Some(target) = action.effect.target() {
                    if !map.contains_key(target) {
                        return Err(ExperienceError::UnknownStage(target.clone()));
                    }
                }
            }
        }

        Ok(Self { start, stages: map })
    }

    /// Parses an authored YAML stage file and validates it like
    /// [`StageRegistry::new`].
    ///
    /// # Errors
    ///
    /// Returns `ExperienceError::InvalidRegistry` if the document does not
    /// parse, plus all the validation errors of `new`.
    pub fn from_yaml(source: &str) -> Result<Self, ExperienceError> {
        let file: StageFile = serde_yaml::from_str(source)
            .map_err(|e| ExperienceError::InvalidRegistry(format!("stage file parse error: {e}")))?;
        Self::new(file.start, file.stages)
    }

    /// Looks up a stage by id.
    #[must_use]
    pub fn get(&self, id: &StageId) -> Option<&Stage> {
        self.stages.get(id)
    }

    /// Whether the registry contains the given id.
    #[must_use]
    pub fn contains(&self, id: &StageId) -> bool {
        self.stages.contains_key(id)
    }

    /// The designated initial stage.
    #[must_use]
    pub fn start_stage(&self) -> &StageId {
        &self.start
    }

    /// Number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the registry is empty. Always false for a validated
    /// registry; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Iterates over the registered stage ids in arbitrary order.
    pub fn stage_ids(&self) -> impl Iterator<Item = &StageId> {
        self.stages.keys()
    }
}
