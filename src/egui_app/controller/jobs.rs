use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, Sender, TryRecvError},
};
use std::thread;

use crate::audio::AudioClip;
use crate::backend::{BackendClient, CatalogFetchError, SynthesisRequestError};
use crate::catalog::ModelEntry;
use crate::synthesis::{RequestId, RequestSequence, SynthesisRequest};

pub(crate) enum JobMessage {
    CatalogLoaded(CatalogLoadResult),
    SynthesisFinished(SynthesisJobResult),
}

#[derive(Debug)]
pub(crate) struct CatalogLoadResult {
    pub(crate) request_id: RequestId,
    pub(crate) user: String,
    pub(crate) result: Result<Vec<ModelEntry>, CatalogFetchError>,
}

#[derive(Debug)]
pub(crate) struct SynthesisJobResult {
    pub(crate) request_id: RequestId,
    pub(crate) result: Result<AudioClip, SynthesisRequestError>,
}

/// Worker bookkeeping: the result channel, catalog ids, and cancel flags.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    catalog_sequence: RequestSequence,
    pending_catalog: Option<RequestId>,
    catalog_cancel: Option<Arc<AtomicBool>>,
    synthesis_cancel: Option<Arc<AtomicBool>>,
    repaint: Option<egui::Context>,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            catalog_sequence: RequestSequence::default(),
            pending_catalog: None,
            catalog_cancel: None,
            synthesis_cancel: None,
            repaint: None,
        }
    }

    pub(super) fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(super) fn pending_catalog(&self) -> Option<RequestId> {
        self.pending_catalog
    }

    pub(super) fn clear_catalog_pending(&mut self) {
        self.pending_catalog = None;
        self.catalog_cancel = None;
    }

    /// Start loading the catalog for `user`, superseding any earlier load.
    pub(super) fn begin_catalog_load(&mut self, client: BackendClient, user: String) -> RequestId {
        if let Some(cancel) = self.catalog_cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
        let request_id = self.catalog_sequence.next_id();
        let cancel = Arc::new(AtomicBool::new(false));
        self.pending_catalog = Some(request_id);
        self.catalog_cancel = Some(Arc::clone(&cancel));
        let tx = self.message_tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let result = client.fetch_catalog_with_cancel(&user, &cancel);
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            let _ = tx.send(JobMessage::CatalogLoaded(CatalogLoadResult {
                request_id,
                user,
                result,
            }));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
        request_id
    }

    /// Send `request` on a worker thread, tagged with `request_id`.
    pub(super) fn begin_synthesis(
        &mut self,
        client: BackendClient,
        request_id: RequestId,
        request: SynthesisRequest,
    ) {
        if let Some(cancel) = self.synthesis_cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
        let cancel = Arc::new(AtomicBool::new(false));
        self.synthesis_cancel = Some(Arc::clone(&cancel));
        let tx = self.message_tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let result = client.synthesize(&request);
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            let _ = tx.send(JobMessage::SynthesisFinished(SynthesisJobResult {
                request_id,
                result,
            }));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    pub(super) fn clear_synthesis(&mut self) {
        self.synthesis_cancel = None;
    }

    /// Flag every outstanding worker so it posts nothing.
    pub(super) fn cancel_all(&mut self) {
        for cancel in [self.catalog_cancel.take(), self.synthesis_cancel.take()]
            .into_iter()
            .flatten()
        {
            cancel.store(true, Ordering::Relaxed);
        }
        self.pending_catalog = None;
    }

    #[cfg(test)]
    pub(super) fn inject(&self, message: JobMessage) {
        let _ = self.message_tx.send(message);
    }

    #[cfg(test)]
    pub(super) fn synthesis_cancel_flag(&self) -> Option<Arc<AtomicBool>> {
        self.synthesis_cancel.clone()
    }

    #[cfg(test)]
    pub(super) fn catalog_cancel_flag(&self) -> Option<Arc<AtomicBool>> {
        self.catalog_cancel.clone()
    }
}
