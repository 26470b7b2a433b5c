//! Line-delimited JSON framing over any async byte stream.
//!
//! Each input line is one [`RequestFrame`]; each output line is one
//! [`ResponseFrame`]. Calls run concurrently, one task per frame, so responses
//! may be written in a different order than requests arrived; `id` pairs them.
//!
//! ```text
//! > {"id":1,"method":"/dummy.v1.Dummy/ComputeDouble","payload":{"value":21}}
//! < {"id":1,"payload":{"value":42}}
//! > {"id":2,"method":"/dummy.v1.Dummy/Nope"}
//! < {"id":2,"error":{"code":"unimplemented","message":"unknown method '/dummy.v1.Dummy/Nope'"}}
//! ```

use std::sync::Arc;
use std::time::Duration;

use apigroup::{CallContext, Cancellation, Status};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::server::Server;

/// Responses buffered between call tasks and the writer.
const RESPONSE_BUFFER: usize = 64;

/// One inbound call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestFrame {
    /// Caller-chosen correlation id, echoed on the response.
    pub id: u64,
    /// `/<service>/<Operation>`.
    pub method: String,
    /// The wire request. Absent means an empty message.
    #[serde(default = "empty_message")]
    pub payload: Value,
    /// Per-call deadline in milliseconds, overriding the server default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn empty_message() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The outcome of one call: exactly one of `payload` or `error` is set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResponseFrame {
    /// The request's id, or `None` when the request line could not be parsed.
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
}

impl ResponseFrame {
    fn from_result(id: Option<u64>, result: Result<Value, Status>) -> Self {
        match result {
            Ok(payload) => Self {
                id,
                payload: Some(payload),
                error: None,
            },
            Err(status) => Self {
                id,
                payload: None,
                error: Some(status),
            },
        }
    }
}

/// Knobs for [`serve`].
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    /// Deadline applied to frames that carry no `timeout_ms`.
    pub default_timeout: Option<Duration>,
    /// Fired to stop reading and cancel every in-flight call.
    pub shutdown: Cancellation,
}

/// Counters reported when [`serve`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    /// Well-formed frames dispatched.
    pub dispatched: u64,
    /// Lines that were not valid request frames.
    pub malformed: u64,
}

/// Serves `server` over a line-delimited JSON stream until `reader` reaches EOF
/// or `options.shutdown` fires, then waits for in-flight calls to finish.
///
/// A line that is not UTF-8 or not a request frame is answered with an
/// `InvalidArgument` frame carrying no id. A read error stops intake; calls
/// already running still complete and are written before the error is returned.
pub async fn serve<R, W>(
    server: Arc<Server>,
    mut reader: R,
    writer: W,
    options: ServeOptions,
) -> std::io::Result<ServeSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<ResponseFrame>(RESPONSE_BUFFER);
    let writer_task = tokio::spawn(write_frames(writer, rx));

    let mut summary = ServeSummary::default();
    let mut calls = JoinSet::new();
    let mut buf = Vec::new();

    // An input error stops reading but in-flight calls still drain below.
    let input = loop {
        buf.clear();
        let read = tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => read,
            () = options.shutdown.cancelled() => {
                info!("shutdown requested; no further frames accepted");
                break Ok(());
            }
        };
        match read {
            Ok(0) => {
                debug!("input closed");
                break Ok(());
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "input failed; draining in-flight calls");
                break Err(err);
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(err) => {
                reject(&tx, &mut summary, format!("request frame is not UTF-8: {err}")).await;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let frame = match serde_json::from_str::<RequestFrame>(line) {
            Ok(frame) => frame,
            Err(err) => {
                reject(&tx, &mut summary, format!("malformed request frame: {err}")).await;
                continue;
            }
        };

        summary.dispatched += 1;
        let mut ctx = CallContext::new().with_cancellation(options.shutdown.clone());
        if let Some(timeout) = frame
            .timeout_ms
            .map(Duration::from_millis)
            .or(options.default_timeout)
        {
            ctx = ctx.with_timeout(timeout);
        }

        let server = Arc::clone(&server);
        let tx = tx.clone();
        calls.spawn(async move {
            let result = server.dispatch(ctx, &frame.method, frame.payload).await;
            send(&tx, ResponseFrame::from_result(Some(frame.id), result)).await;
        });
    };

    while let Some(joined) = calls.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "call task ended abnormally");
        }
    }
    drop(tx);
    let written = writer_task.await.map_err(std::io::Error::other)?;

    info!(
        dispatched = summary.dispatched,
        malformed = summary.malformed,
        "stream closed"
    );
    input?;
    written?;
    Ok(summary)
}

async fn reject(tx: &mpsc::Sender<ResponseFrame>, summary: &mut ServeSummary, message: String) {
    summary.malformed += 1;
    warn!(reason = %message, "discarding malformed request frame");
    send(tx, ResponseFrame::from_result(None, Err(Status::invalid_argument(message)))).await;
}

async fn send(tx: &mpsc::Sender<ResponseFrame>, frame: ResponseFrame) {
    if tx.send(frame).await.is_err() {
        warn!("response writer has stopped; dropping response");
    }
}

async fn write_frames<W>(mut writer: W, mut rx: mpsc::Receiver<ResponseFrame>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        let mut line = serde_json::to_vec(&frame)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
