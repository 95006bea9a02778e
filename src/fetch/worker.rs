//! Background fetch worker.
//!
//! All HTTP against the inference API happens on a dedicated thread so
//! the host's event loop never blocks. Requests arrive over an mpsc
//! channel; every completed fetch is delivered back as a tagged event.
//! Results for one request are never coalesced or dropped here; stale
//! generations are filtered by the orchestrator at apply time.

use std::sync::mpsc;

use rustc_hash::FxHashMap;
use serde_json::json;

use crate::client::types::{
    AttnResponse, ModalResponse, PropertyResponse, RegisterResponse,
};
use crate::client::Backend;
use crate::error::SpbError;
use crate::grid::RawEnergyGrid;
use crate::structure::XyzStructure;
use crate::task::{ingest_value, query_param};

/// A unit of work for the fetch thread.
#[derive(Debug)]
pub(crate) enum FetchRequest {
    /// Register `cifid` (optionally with uploaded file content), then
    /// fetch geometry+energy, properties, and the active attention
    /// vector. Uploads are applied atomically; plain cascades piecewise.
    Cascade {
        generation: u64,
        cifid: String,
        cif_str: Option<String>,
        subtasks: Vec<String>,
        attn_task: String,
    },
    /// Refetch property predictions only (task category changed).
    Properties {
        generation: u64,
        cifid: String,
        subtasks: Vec<String>,
    },
    /// Fetch one sub-task's attention vector (active sub-task changed).
    Attention {
        generation: u64,
        cifid: String,
        subtask: String,
    },
    /// Stop the worker thread.
    Shutdown,
}

/// A completed fetch, tagged with the cascade generation it belongs to.
pub(crate) enum FetchEvent {
    /// The registration POST for a plain cascade failed; nothing else
    /// was fetched.
    RegisterFailed { generation: u64, error: SpbError },
    /// Geometry + energy result.
    Structure {
        generation: u64,
        result: Result<(XyzStructure, Option<RawEnergyGrid>), SpbError>,
    },
    /// Property prediction result for a full category.
    Properties {
        generation: u64,
        result: Result<FxHashMap<String, f64>, SpbError>,
    },
    /// Attention vector result for one sub-task.
    Attention {
        generation: u64,
        subtask: String,
        result: Result<Vec<f64>, SpbError>,
    },
    /// An upload cascade finished with every fetch successful.
    UploadComplete {
        generation: u64,
        cifid: String,
        structure: XyzStructure,
        energy: Option<RawEnergyGrid>,
        properties: FxHashMap<String, f64>,
        attn_task: String,
        attn: Vec<f64>,
    },
    /// An upload cascade failed somewhere; prior state must be kept.
    UploadFailed { generation: u64, error: SpbError },
}

/// Background thread owning the [`Backend`] and executing fetches.
pub(crate) struct FetchWorker {
    request_tx: mpsc::Sender<FetchRequest>,
    event_rx: mpsc::Receiver<FetchEvent>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl FetchWorker {
    /// Spawn the fetch thread around the given transport.
    pub fn spawn(
        backend: Box<dyn Backend>,
    ) -> Result<Self, std::io::Error> {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (event_tx, event_rx) = mpsc::channel::<FetchEvent>();

        let thread = std::thread::Builder::new()
            .name("fetch-worker".into())
            .spawn(move || {
                thread_loop(&*backend, &request_rx, &event_tx);
            })?;

        Ok(Self {
            request_tx,
            event_rx,
            thread: Some(thread),
        })
    }

    /// Submit a request (non-blocking send).
    pub fn submit(&self, request: FetchRequest) {
        let _ = self.request_tx.send(request);
    }

    /// Non-blocking check for one completed fetch.
    pub fn try_recv(&self) -> Option<FetchEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Shut down the thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(FetchRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn thread_loop(
    backend: &dyn Backend,
    request_rx: &mpsc::Receiver<FetchRequest>,
    event_tx: &mpsc::Sender<FetchEvent>,
) {
    while let Ok(request) = request_rx.recv() {
        match request {
            FetchRequest::Shutdown => break,
            FetchRequest::Cascade {
                generation,
                cifid,
                cif_str,
                subtasks,
                attn_task,
            } => {
                if let Some(content) = cif_str {
                    run_upload_cascade(
                        backend, event_tx, generation, &cifid, &content,
                        &subtasks, &attn_task,
                    );
                } else {
                    run_cascade(
                        backend, event_tx, generation, &cifid, &subtasks,
                        &attn_task,
                    );
                }
            }
            FetchRequest::Properties {
                generation,
                cifid,
                subtasks,
            } => {
                let result = fetch_properties(backend, &cifid, &subtasks);
                let _ = event_tx
                    .send(FetchEvent::Properties { generation, result });
            }
            FetchRequest::Attention {
                generation,
                cifid,
                subtask,
            } => {
                let result = fetch_attention(backend, &cifid, &subtask);
                let _ = event_tx.send(FetchEvent::Attention {
                    generation,
                    subtask,
                    result,
                });
            }
        }
    }
}

/// Plain cascade: register, then report the three fetches independently.
fn run_cascade(
    backend: &dyn Backend,
    event_tx: &mpsc::Sender<FetchEvent>,
    generation: u64,
    cifid: &str,
    subtasks: &[String],
    attn_task: &str,
) {
    if let Err(error) = register(backend, cifid, None) {
        let _ = event_tx
            .send(FetchEvent::RegisterFailed { generation, error });
        return;
    }
    log::debug!("registered {cifid}, starting fetch cascade");

    let _ = event_tx.send(FetchEvent::Structure {
        generation,
        result: fetch_modal(backend, cifid),
    });
    let _ = event_tx.send(FetchEvent::Properties {
        generation,
        result: fetch_properties(backend, cifid, subtasks),
    });
    let _ = event_tx.send(FetchEvent::Attention {
        generation,
        subtask: attn_task.to_owned(),
        result: fetch_attention(backend, cifid, attn_task),
    });
}

/// Upload cascade: register with file content, fetch everything, and
/// deliver one all-or-nothing event so prior state survives any failure.
fn run_upload_cascade(
    backend: &dyn Backend,
    event_tx: &mpsc::Sender<FetchEvent>,
    generation: u64,
    cifid: &str,
    content: &str,
    subtasks: &[String],
    attn_task: &str,
) {
    let outcome = (|| -> Result<_, SpbError> {
        let confirmed = register(backend, cifid, Some(content))?;
        let (structure, energy) = fetch_modal(backend, &confirmed)?;
        let properties = fetch_properties(backend, &confirmed, subtasks)?;
        let attn = fetch_attention(backend, &confirmed, attn_task)?;
        Ok((confirmed, structure, energy, properties, attn))
    })();

    let event = match outcome {
        Ok((cifid, structure, energy, properties, attn)) => {
            FetchEvent::UploadComplete {
                generation,
                cifid,
                structure,
                energy,
                properties,
                attn_task: attn_task.to_owned(),
                attn,
            }
        }
        Err(error) => FetchEvent::UploadFailed { generation, error },
    };
    let _ = event_tx.send(event);
}

/// `POST /cif`, returning the server-confirmed identifier.
fn register(
    backend: &dyn Backend,
    cifid: &str,
    cif_str: Option<&str>,
) -> Result<String, SpbError> {
    let body = match cif_str {
        Some(content) => json!({ "cifid": cifid, "cif_str": content }),
        None => json!({ "cifid": cifid }),
    };
    let value = backend.post("/cif", &body)?;
    let response: RegisterResponse = serde_json::from_value(value)?;
    Ok(response.cifid)
}

/// `GET /modal`: parsed geometry plus the raw energy grid.
fn fetch_modal(
    backend: &dyn Backend,
    cifid: &str,
) -> Result<(XyzStructure, Option<RawEnergyGrid>), SpbError> {
    let value = backend.get("/modal", &[("cifid", cifid)])?;
    let response: ModalResponse = serde_json::from_value(value)?;
    let structure = XyzStructure::parse(&response.xyz)?;
    Ok((structure, response.energy))
}

/// `GET /property` for every sub-task in the category. One failure fails
/// the whole set; partial maps are never delivered.
fn fetch_properties(
    backend: &dyn Backend,
    cifid: &str,
    subtasks: &[String],
) -> Result<FxHashMap<String, f64>, SpbError> {
    let mut properties = FxHashMap::default();
    for subtask in subtasks {
        let value = backend.get(
            "/property",
            &[("cifid", cifid), ("task", &query_param(subtask))],
        )?;
        let response: PropertyResponse = serde_json::from_value(value)?;
        let _ = properties.insert(
            subtask.clone(),
            ingest_value(subtask, response.value),
        );
    }
    Ok(properties)
}

/// `GET /attn` for one sub-task.
fn fetch_attention(
    backend: &dyn Backend,
    cifid: &str,
    subtask: &str,
) -> Result<Vec<f64>, SpbError> {
    let value = backend.get(
        "/attn",
        &[("cifid", cifid), ("task", &query_param(subtask))],
    )?;
    let response: AttnResponse = serde_json::from_value(value)?;
    Ok(response.attn)
}
