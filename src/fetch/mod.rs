//! Fetch orchestration over `(cifid, task category, active sub-task)`.
//!
//! The [`Orchestrator`] owns the demo state and a background worker
//! thread. Selection changes submit work; the host calls
//! [`poll`](Orchestrator::poll) each tick to apply completed fetches and
//! collect change notifications for the rendering adapters.
//!
//! Every cascade is tagged with a generation counter. A fetch still in
//! flight when the structure changes again is not aborted; its eventual
//! result carries a stale tag and is discarded at apply time, so
//! out-of-order resolution can never write old data over new.

pub mod upload;
pub(crate) mod worker;

use crate::client::Backend;
use crate::error::SpbError;
use crate::options::SliderOptions;
use crate::state::{DemoState, FetchKind, LoadingFlags, StateChange};
use crate::task::TaskCategory;

use self::worker::{FetchEvent, FetchRequest, FetchWorker};

/// Drives the structure/property/attention fetch cascade.
pub struct Orchestrator {
    state: DemoState,
    worker: FetchWorker,
    generation: u64,
    // Changes from construction, delivered on the first poll.
    pending: Vec<StateChange>,
}

impl Orchestrator {
    /// Spawn the fetch worker and kick off the initial cascade for the
    /// built-in default structure. The cascade's `LoadingChanged` is
    /// delivered by the first [`poll`](Self::poll).
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::ThreadSpawn`] if the worker thread cannot be
    /// created.
    pub fn new(backend: Box<dyn Backend>) -> Result<Self, SpbError> {
        let worker =
            FetchWorker::spawn(backend).map_err(SpbError::ThreadSpawn)?;
        let mut orchestrator = Self {
            state: DemoState::default(),
            worker,
            generation: 0,
            pending: Vec::new(),
        };
        orchestrator.pending = orchestrator.start_cascade(None);
        Ok(orchestrator)
    }

    /// Current demo state.
    #[must_use]
    pub fn state(&self) -> &DemoState {
        &self.state
    }

    /// Switch to a different structure identifier. Invalidates all three
    /// data categories and starts a fresh cascade.
    pub fn set_cifid(&mut self, cifid: &str) -> Vec<StateChange> {
        if cifid == self.state.cifid {
            return Vec::new();
        }
        self.state.cifid = cifid.to_owned();
        // Cached attention belongs to the previous structure.
        self.state.attns.clear();
        let mut changes = vec![StateChange::CifidChanged];
        changes.extend(self.start_cascade(None));
        changes
    }

    /// Switch task category: reset the active sub-task to the category's
    /// first entry and refetch property predictions.
    pub fn set_task_category(
        &mut self,
        category: TaskCategory,
    ) -> Vec<StateChange> {
        if category == self.state.task_category {
            return Vec::new();
        }
        self.state.task_category = category;
        let mut changes = vec![StateChange::CategoryChanged];

        self.state.loading.properties = true;
        changes.push(StateChange::LoadingChanged);
        self.worker.submit(FetchRequest::Properties {
            generation: self.generation,
            cifid: self.state.cifid.clone(),
            subtasks: owned_subtasks(category),
        });

        changes.extend(self.set_attn_task(category.first_subtask()));
        changes
    }

    /// Switch the active sub-task. Cached attention vectors are reused;
    /// only an unseen sub-task triggers a fetch.
    pub fn set_attn_task(&mut self, subtask: &str) -> Vec<StateChange> {
        if subtask == self.state.attn_task {
            return Vec::new();
        }
        if !self
            .state
            .task_category
            .subtasks()
            .contains(&subtask)
        {
            log::warn!(
                "ignoring unknown sub-task {subtask:?} for {}",
                self.state.task_category
            );
            return Vec::new();
        }

        self.state.attn_task = subtask.to_owned();
        let mut changes = vec![StateChange::SubtaskChanged];

        if self.state.attns.contains_key(subtask) {
            log::debug!("attention for {subtask} served from cache");
            changes.push(StateChange::AttentionData);
        } else {
            self.state.loading.attention = true;
            changes.push(StateChange::LoadingChanged);
            self.worker.submit(FetchRequest::Attention {
                generation: self.generation,
                cifid: self.state.cifid.clone(),
                subtask: subtask.to_owned(),
            });
        }
        changes
    }

    /// Move the attention sliders. Pure restyle; no fetch.
    pub fn set_sliders(
        &mut self,
        sliders: SliderOptions,
    ) -> Vec<StateChange> {
        if sliders == self.state.sliders {
            return Vec::new();
        }
        self.state.sliders = sliders;
        vec![StateChange::SlidersMoved]
    }

    /// Upload a user-supplied structure file. The extension is validated
    /// before any network traffic; on success the server-confirmed
    /// identifier becomes the new cifid and a full cascade replaces all
    /// fetched state atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::InvalidFileFormat`] for non-`.cif` names.
    /// Server-side failures are reported later through
    /// [`StateChange::FetchFailed`].
    pub fn upload(
        &mut self,
        file_name: &str,
        content: &str,
    ) -> Result<Vec<StateChange>, SpbError> {
        let cifid = upload::derive_cifid(file_name)?;
        Ok(self.start_cascade(Some((cifid, content.to_owned()))))
    }

    /// Apply all completed fetches, discarding stale generations, and
    /// return the resulting change notifications (preceded by any still
    /// undelivered from construction).
    pub fn poll(&mut self) -> Vec<StateChange> {
        let mut changes = std::mem::take(&mut self.pending);
        while let Some(event) = self.worker.try_recv() {
            self.apply_event(event, &mut changes);
        }
        changes
    }

    /// Raise all three flags and submit a full cascade. `upload` carries
    /// the derived identifier and file content for upload cascades.
    fn start_cascade(
        &mut self,
        upload: Option<(String, String)>,
    ) -> Vec<StateChange> {
        self.generation += 1;
        self.state.loading.structure = true;
        self.state.loading.properties = true;
        self.state.loading.attention = true;

        let (cifid, cif_str) = match upload {
            Some((cifid, content)) => (cifid, Some(content)),
            None => (self.state.cifid.clone(), None),
        };

        self.worker.submit(FetchRequest::Cascade {
            generation: self.generation,
            cifid,
            cif_str,
            subtasks: owned_subtasks(self.state.task_category),
            attn_task: self.state.attn_task.clone(),
        });
        vec![StateChange::LoadingChanged]
    }

    fn apply_event(
        &mut self,
        event: FetchEvent,
        changes: &mut Vec<StateChange>,
    ) {
        if event_generation(&event) != self.generation {
            log::debug!("discarding stale fetch result");
            return;
        }

        match event {
            FetchEvent::RegisterFailed { error, .. } => {
                log::warn!("structure registration failed: {error}");
                self.state.loading = LoadingFlags::default();
                changes.push(StateChange::FetchFailed {
                    kind: FetchKind::Register,
                    message: error.to_string(),
                });
                changes.push(StateChange::LoadingChanged);
            }
            FetchEvent::Structure { result, .. } => {
                self.state.loading.structure = false;
                match result {
                    Ok((structure, energy)) => {
                        self.state.structure = Some(structure);
                        self.state.energy = energy;
                        changes.push(StateChange::StructureData);
                    }
                    Err(error) => {
                        log::warn!("structure fetch failed: {error}");
                        changes.push(StateChange::FetchFailed {
                            kind: FetchKind::Structure,
                            message: error.to_string(),
                        });
                    }
                }
                changes.push(StateChange::LoadingChanged);
            }
            FetchEvent::Properties { result, .. } => {
                self.state.loading.properties = false;
                match result {
                    Ok(properties) => {
                        self.state.properties = properties;
                        changes.push(StateChange::PropertyData);
                    }
                    Err(error) => {
                        log::warn!("property fetch failed: {error}");
                        changes.push(StateChange::FetchFailed {
                            kind: FetchKind::Properties,
                            message: error.to_string(),
                        });
                    }
                }
                changes.push(StateChange::LoadingChanged);
            }
            FetchEvent::Attention {
                subtask, result, ..
            } => {
                self.state.loading.attention = false;
                match result {
                    Ok(attn) => {
                        let _ = self.state.attns.insert(subtask, attn);
                        changes.push(StateChange::AttentionData);
                    }
                    Err(error) => {
                        log::warn!(
                            "attention fetch for {subtask} failed: {error}"
                        );
                        changes.push(StateChange::FetchFailed {
                            kind: FetchKind::Attention,
                            message: error.to_string(),
                        });
                    }
                }
                changes.push(StateChange::LoadingChanged);
            }
            FetchEvent::UploadComplete {
                cifid,
                structure,
                energy,
                properties,
                attn_task,
                attn,
                ..
            } => {
                self.state.cifid = cifid.clone();
                self.state.structure = Some(structure);
                self.state.energy = energy;
                self.state.properties = properties;
                self.state.attns.clear();
                let _ = self.state.attns.insert(attn_task, attn);
                self.state.loading = LoadingFlags::default();
                changes.push(StateChange::UploadAccepted { cifid });
                changes.push(StateChange::CifidChanged);
                changes.push(StateChange::StructureData);
                changes.push(StateChange::PropertyData);
                changes.push(StateChange::AttentionData);
                changes.push(StateChange::LoadingChanged);
            }
            FetchEvent::UploadFailed { error, .. } => {
                log::warn!("upload cascade failed: {error}");
                self.state.loading = LoadingFlags::default();
                changes.push(StateChange::FetchFailed {
                    kind: FetchKind::Register,
                    message: error.to_string(),
                });
                changes.push(StateChange::LoadingChanged);
            }
        }
    }
}

fn owned_subtasks(category: TaskCategory) -> Vec<String> {
    category
        .subtasks()
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

fn event_generation(event: &FetchEvent) -> u64 {
    match event {
        FetchEvent::RegisterFailed { generation, .. }
        | FetchEvent::Structure { generation, .. }
        | FetchEvent::Properties { generation, .. }
        | FetchEvent::Attention { generation, .. }
        | FetchEvent::UploadComplete { generation, .. }
        | FetchEvent::UploadFailed { generation, .. } => *generation,
    }
}
