use std::sync::{Arc, Mutex};

use linkminer_logging::{client_debug, client_error, client_info, client_warn};
use serde_json::Value;

use crate::{decode_record, ChannelError, ClientSettings, EngineEvent, EventSink};

/// Control and data signals a push transport can raise.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSignal {
    Connected,
    Record(Value),
    Disconnected,
    Error(String),
}

/// The one registration unit shared by every handler a transport installs.
///
/// All handlers forward through the same dispatch, so [`SignalDispatch::detach`]
/// unregisters them together. Once `detach` returns, no signal is forwarded
/// or logged.
#[derive(Clone)]
pub struct SignalDispatch {
    sink: Arc<Mutex<Option<Arc<dyn EventSink>>>>,
}

impl SignalDispatch {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Some(sink))),
        }
    }

    /// Handles one signal. Returns `false` when the dispatch is detached.
    pub fn deliver(&self, signal: ChannelSignal) -> bool {
        let Ok(guard) = self.sink.lock() else {
            return false;
        };
        let Some(sink) = guard.as_ref() else {
            return false;
        };

        match signal {
            ChannelSignal::Connected => {
                client_info!("Connected to push channel");
                sink.emit(EngineEvent::ChannelConnected);
            }
            ChannelSignal::Disconnected => {
                client_info!("Disconnected from push channel");
                sink.emit(EngineEvent::ChannelDisconnected);
            }
            ChannelSignal::Error(message) => {
                client_warn!("Push channel error: {}", message);
                sink.emit(EngineEvent::ChannelError(message));
            }
            ChannelSignal::Record(payload) => match decode_record(payload) {
                Ok(fields) => {
                    client_debug!("New record received ({} fields)", fields.len());
                    sink.emit(EngineEvent::RecordArrived(fields));
                }
                Err(err) => client_warn!("Skipping record: {}", err),
            },
        }
        true
    }

    pub fn detach(&self) {
        if let Ok(mut guard) = self.sink.lock() {
            guard.take();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sink
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
pub trait PushTransport: Send + Sync {
    /// Connects to the backend push channel, routing every signal through
    /// `dispatch`.
    async fn connect(
        &self,
        settings: &ClientSettings,
        dispatch: SignalDispatch,
    ) -> Result<Box<dyn PushConnection>, ChannelError>;
}

#[async_trait::async_trait]
pub trait PushConnection: Send + Sync {
    async fn disconnect(&self) -> Result<(), ChannelError>;
}

pub struct IngestionChannel;

impl IngestionChannel {
    /// Opens the push channel. Emits `ChannelConnecting` first and
    /// `ChannelClosed` if the connection cannot be established.
    pub async fn open(
        transport: &dyn PushTransport,
        settings: &ClientSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<ChannelHandle, ChannelError> {
        sink.emit(EngineEvent::ChannelConnecting);
        let dispatch = SignalDispatch::new(sink.clone());

        match transport.connect(settings, dispatch.clone()).await {
            Ok(connection) => Ok(ChannelHandle {
                dispatch,
                connection: Some(connection),
                sink,
            }),
            Err(err) => {
                dispatch.detach();
                client_error!("Could not open push channel to {}: {}", settings.backend_url, err);
                sink.emit(EngineEvent::ChannelClosed);
                Err(err)
            }
        }
    }
}

/// An open push channel. Dropping it without [`ChannelHandle::close`] detaches
/// the handlers at once and releases the connection on the current tokio
/// runtime, if there is one.
pub struct ChannelHandle {
    dispatch: SignalDispatch,
    connection: Option<Box<dyn PushConnection>>,
    sink: Arc<dyn EventSink>,
}

impl ChannelHandle {
    pub fn dispatch(&self) -> &SignalDispatch {
        &self.dispatch
    }

    /// Unregisters the handlers, then releases the connection.
    pub async fn close(mut self) -> Result<(), ChannelError> {
        self.dispatch.detach();
        let result = match self.connection.take() {
            Some(connection) => connection.disconnect().await,
            None => Ok(()),
        };
        self.sink.emit(EngineEvent::ChannelClosed);
        result
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.dispatch.detach();
        let Some(connection) = self.connection.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let sink = self.sink.clone();
                runtime.spawn(async move {
                    if let Err(err) = connection.disconnect().await {
                        client_warn!("Dropped push channel closed uncleanly: {}", err);
                    }
                    sink.emit(EngineEvent::ChannelClosed);
                });
            }
            Err(_) => client_warn!("Push channel dropped outside a runtime; connection left open"),
        }
    }
}
