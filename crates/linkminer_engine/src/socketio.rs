use futures_util::FutureExt;
use linkminer_logging::client_debug;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::{Event, Payload};
use serde_json::Value;

use crate::{ChannelError, ChannelSignal, ClientSettings, PushConnection, PushTransport, SignalDispatch};

/// Event name carrying one record per emission.
pub const RECORD_EVENT: &str = "new_record";

/// Socket.IO push channel. Reconnection is disabled: a dropped connection
/// stays dropped until the channel is reopened.
#[derive(Debug, Default, Clone, Copy)]
pub struct SocketIoTransport;

struct SocketIoConnection {
    client: Client,
}

#[async_trait::async_trait]
impl PushTransport for SocketIoTransport {
    async fn connect(
        &self,
        settings: &ClientSettings,
        dispatch: SignalDispatch,
    ) -> Result<Box<dyn PushConnection>, ChannelError> {
        let on_connect = dispatch.clone();
        let on_record = dispatch.clone();
        let on_close = dispatch.clone();
        let on_error = dispatch;

        let builder = ClientBuilder::new(settings.backend_url.as_str())
            .namespace(settings.namespace.as_str())
            .reconnect(false)
            .on(Event::Connect, move |_payload: Payload, _socket: Client| {
                let dispatch = on_connect.clone();
                async move {
                    dispatch.deliver(ChannelSignal::Connected);
                }
                .boxed()
            })
            .on(RECORD_EVENT, move |payload: Payload, _socket: Client| {
                let dispatch = on_record.clone();
                async move {
                    dispatch.deliver(ChannelSignal::Record(first_value(payload)));
                }
                .boxed()
            })
            .on(Event::Close, move |_payload: Payload, _socket: Client| {
                let dispatch = on_close.clone();
                async move {
                    dispatch.deliver(ChannelSignal::Disconnected);
                }
                .boxed()
            })
            .on(Event::Error, move |payload: Payload, _socket: Client| {
                let dispatch = on_error.clone();
                async move {
                    dispatch.deliver(ChannelSignal::Error(describe(payload)));
                }
                .boxed()
            });

        client_debug!("Connecting push channel to {}", settings.backend_url);
        let client = tokio::time::timeout(settings.connect_timeout, builder.connect())
            .await
            .map_err(|_| ChannelError::ConnectTimeout(settings.connect_timeout))?
            .map_err(|err| ChannelError::Connect(err.to_string()))?;

        Ok(Box::new(SocketIoConnection { client }))
    }
}

#[async_trait::async_trait]
impl PushConnection for SocketIoConnection {
    async fn disconnect(&self) -> Result<(), ChannelError> {
        self.client
            .disconnect()
            .await
            .map_err(|err| ChannelError::Disconnect(err.to_string()))
    }
}

/// The record is the first event argument.
fn first_value(payload: Payload) -> Value {
    match payload {
        Payload::Text(values) => values.into_iter().next().unwrap_or(Value::Null),
        Payload::Binary(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        #[allow(unreachable_patterns)]
        _ => Value::Null,
    }
}

fn describe(payload: Payload) -> String {
    match payload {
        Payload::Text(values) => values
            .iter()
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => format!("{other:?}"),
    }
}
