//! In-process method channel
//!
//! Stands in for the host messenger: callers invoke methods by name and
//! await the reply, a serving task feeds each call to the
//! [`RequestDispatcher`] on its own task.

use crate::dispatcher::{MethodCall, MethodReply, RequestDispatcher};
use crate::error::ChannelError;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Name the host side registers the channel under
pub const CHANNEL_NAME: &str = "plugin.csdcorp.com/local_image_provider";

struct Envelope {
    call: MethodCall,
    reply: oneshot::Sender<MethodReply>,
}

/// Cloneable caller handle.
///
/// The serving task stops once every handle has been dropped and the
/// in-flight calls have been handed off.
#[derive(Clone)]
pub struct MethodChannel {
    sender: mpsc::Sender<Envelope>,
}

impl MethodChannel {
    /// Start serving `dispatcher` with room for `capacity` queued calls.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn serve(dispatcher: RequestDispatcher, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let dispatcher = Arc::new(dispatcher);
        let server = tokio::spawn(run(dispatcher, receiver));
        (Self { sender }, server)
    }

    pub fn name(&self) -> &'static str {
        CHANNEL_NAME
    }

    /// Invoke `method` and wait for its reply.
    ///
    /// The outer error reports transport failures; the reply itself carries
    /// method errors.
    pub async fn invoke_method(
        &self,
        method: impl Into<String>,
        arguments: Option<Value>,
    ) -> Result<MethodReply, ChannelError> {
        let (reply, response) = oneshot::channel();
        let envelope = Envelope {
            call: MethodCall::new(method, arguments),
            reply,
        };
        self.sender
            .send(envelope)
            .await
            .map_err(|_| ChannelError::Closed)?;
        response.await.map_err(|_| ChannelError::NoReply)
    }
}

async fn run(dispatcher: Arc<RequestDispatcher>, mut receiver: mpsc::Receiver<Envelope>) {
    debug!(channel = CHANNEL_NAME, "Method channel serving");
    while let Some(Envelope { call, reply }) = receiver.recv().await {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            let method = call.method.clone();
            let outcome = dispatcher.handle(call).await;
            if reply.send(outcome).is_err() {
                trace!(method = %method, "Caller went away before the reply");
            }
        });
    }
    debug!(channel = CHANNEL_NAME, "Method channel closed");
}
