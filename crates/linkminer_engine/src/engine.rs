use std::sync::{mpsc, Arc};
use std::thread;

use linkminer_logging::{client_error, client_info, client_warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::{
    ChannelEventSink, ChannelHandle, ClientSettings, EngineError, EngineEvent, EventSink,
    IngestionChannel, PushTransport, RequestController, RequestId, SocketIoTransport,
};

enum EngineCommand {
    OpenChannel,
    CloseChannel,
    Submit { request_id: RequestId, query: String },
    Cancel { request_id: RequestId },
    Shutdown,
}

enum ChannelCommand {
    Open,
    Close,
}

/// Runs the request controller and the ingestion channel on a background
/// tokio runtime. Commands go in, [`EngineEvent`]s come out.
pub struct EngineHandle {
    cmd_tx: UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        Self::with_transport(settings, Arc::new(SocketIoTransport))
    }

    pub fn with_transport(
        settings: ClientSettings,
        transport: Arc<dyn PushTransport>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let controller =
            RequestController::new(settings.clone(), sink.clone()).map_err(EngineError::Client)?;

        let worker = thread::spawn(move || {
            runtime.block_on(run_worker(cmd_rx, controller, transport, settings, sink));
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn open_channel(&self) {
        self.send(EngineCommand::OpenChannel);
    }

    pub fn close_channel(&self) {
        self.send(EngineCommand::CloseChannel);
    }

    pub fn submit(&self, request_id: RequestId, query: impl Into<String>) {
        self.send(EngineCommand::Submit {
            request_id,
            query: query.into(),
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        self.send(EngineCommand::Cancel { request_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Closes the channel, cancels any running request and waits for the
    /// worker thread to finish.
    pub fn shutdown(mut self) {
        self.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                client_error!("Engine worker panicked during shutdown");
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            client_warn!("Engine worker is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        }
    }
}

async fn run_worker(
    mut cmd_rx: UnboundedReceiver<EngineCommand>,
    controller: RequestController,
    transport: Arc<dyn PushTransport>,
    settings: ClientSettings,
    sink: Arc<dyn EventSink>,
) {
    // Channel commands are serialized on their own task so a slow connect
    // never holds up a cancel.
    let (channel_tx, channel_rx) = unbounded_channel();
    let channel_task = tokio::spawn(run_channel(channel_rx, transport, settings, sink));

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::OpenChannel => {
                let _ = channel_tx.send(ChannelCommand::Open);
            }
            EngineCommand::CloseChannel => {
                let _ = channel_tx.send(ChannelCommand::Close);
            }
            EngineCommand::Submit { request_id, query } => {
                client_info!("Submitting scrape request {}", request_id);
                controller.submit(request_id, query);
            }
            EngineCommand::Cancel { request_id } => {
                if !controller.cancel_request(request_id) {
                    client_info!("Cancel for request {} ignored: not in flight", request_id);
                }
            }
            EngineCommand::Shutdown => break,
        }
    }

    controller.cancel();
    drop(channel_tx);
    if channel_task.await.is_err() {
        client_error!("Push channel task panicked");
    }
}

async fn run_channel(
    mut rx: UnboundedReceiver<ChannelCommand>,
    transport: Arc<dyn PushTransport>,
    settings: ClientSettings,
    sink: Arc<dyn EventSink>,
) {
    let mut handle: Option<ChannelHandle> = None;

    while let Some(command) = rx.recv().await {
        match command {
            ChannelCommand::Open => {
                if handle.is_some() {
                    client_warn!("Push channel already open");
                    continue;
                }
                if let Ok(opened) =
                    IngestionChannel::open(transport.as_ref(), &settings, sink.clone()).await
                {
                    handle = Some(opened);
                }
            }
            ChannelCommand::Close => {
                if let Some(open) = handle.take() {
                    close_channel(open).await;
                }
            }
        }
    }

    if let Some(open) = handle.take() {
        close_channel(open).await;
    }
}

async fn close_channel(handle: ChannelHandle) {
    match handle.close().await {
        Ok(()) => client_info!("Push channel closed"),
        Err(err) => client_warn!("Push channel closed uncleanly: {}", err),
    }
}
