#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use linkminer_engine::{
    ChannelError, ChannelSignal, ClientSettings, EngineEvent, EventSink, PushConnection,
    PushTransport, SignalDispatch,
};

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// In-process transport: the test drives signals through the captured
/// dispatch instead of a socket.
#[derive(Default)]
pub struct ScriptedTransport {
    pub fail_connect: bool,
    dispatch: Mutex<Option<SignalDispatch>>,
    pub connects: AtomicUsize,
    pub disconnects: Arc<AtomicUsize>,
    /// Whether the dispatch was still attached when `disconnect` ran.
    pub attached_at_disconnect: Arc<Mutex<Option<bool>>>,
}

impl ScriptedTransport {
    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.dispatch.lock().unwrap().is_some()
    }

    pub fn emit(&self, signal: ChannelSignal) -> bool {
        let dispatch = self.dispatch.lock().unwrap().clone();
        dispatch.map(|d| d.deliver(signal)).unwrap_or(false)
    }
}

struct ScriptedConnection {
    dispatch: SignalDispatch,
    disconnects: Arc<AtomicUsize>,
    attached_at_disconnect: Arc<Mutex<Option<bool>>>,
}

#[async_trait::async_trait]
impl PushTransport for ScriptedTransport {
    async fn connect(
        &self,
        _settings: &ClientSettings,
        dispatch: SignalDispatch,
    ) -> Result<Box<dyn PushConnection>, ChannelError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(ChannelError::Connect("connection refused".to_string()));
        }
        *self.dispatch.lock().unwrap() = Some(dispatch.clone());
        dispatch.deliver(ChannelSignal::Connected);
        Ok(Box::new(ScriptedConnection {
            dispatch,
            disconnects: self.disconnects.clone(),
            attached_at_disconnect: self.attached_at_disconnect.clone(),
        }))
    }
}

#[async_trait::async_trait]
impl PushConnection for ScriptedConnection {
    async fn disconnect(&self) -> Result<(), ChannelError> {
        *self.attached_at_disconnect.lock().unwrap() = Some(self.dispatch.is_attached());
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
