/*!
 * Emission
 * Batch envelope and downstream sinks for a shutdown batch
 */

use crate::core::errors::EmitResult;
use crate::events::ClientEvent;
use crate::identity;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Everything a transport needs to ship one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBatch {
    pub machine_id: String,
    pub app_id: String,
    pub version: String,
    pub platform: String,
    pub events: Arc<[ClientEvent]>,
}

impl EventBatch {
    /// Envelope stamped with the process-wide machine id
    pub fn new(app_id: impl Into<String>, events: Arc<[ClientEvent]>) -> Self {
        Self::with_machine_id(identity::machine_id(), app_id, events)
    }

    pub fn with_machine_id(
        machine_id: impl Into<String>,
        app_id: impl Into<String>,
        events: Arc<[ClientEvent]>,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            app_id: app_id.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: std::env::consts::OS.to_string(),
            events,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Downstream consumer of a finished batch
pub trait Emitter: Send + Sync {
    fn emit(&self, batch: &EventBatch) -> EmitResult<()>;
}

/// Discards every batch
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmitter;

impl Emitter for NullEmitter {
    fn emit(&self, batch: &EventBatch) -> EmitResult<()> {
        debug!(events = batch.len(), "batch discarded");
        Ok(())
    }
}

/// Writes each batch as one JSON document per line
pub struct WriterEmitter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Emitter for WriterEmitter<W> {
    fn emit(&self, batch: &EventBatch) -> EmitResult<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, batch)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!(events = batch.len(), "batch written");
        Ok(())
    }
}
