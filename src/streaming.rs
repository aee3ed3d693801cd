//! Streaming reconstruction.
//!
//! A streaming call fragments tool-call payloads across many partial frames,
//! out of any helpful order: name fragments may arrive before the id, and
//! argument fragments interleave across invocation indices. The
//! [`StreamAggregator`] turns that sequence into incremental [`StreamEvent`]s
//! with a deterministic, index-ordered tool-call snapshot and an at-most-once
//! `tool_call_started` notification per invocation.
//!
//! One background task per call owns the aggregator; it is the sole writer
//! to the accumulation state, so the state carries no lock. Events travel
//! over a capacity-1 `mpsc` channel: the producer blocks on send until the
//! consumer reads, so a slow consumer throttles network reads and no frame
//! is ever dropped. Channel close is the end-of-stream signal; transport
//! errors observed mid-stream are logged, never surfaced, and the stream
//! still ends with a well-formed terminal event.

use std::collections::{BTreeMap, BTreeSet};

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::types::{StreamEvent, ToolCall};

/// One parsed SSE frame.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Option<StreamDelta>,
    /// Non-empty on the frame that signals end-of-turn.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallDelta>,
}

/// One fragment of a tool invocation, keyed by its position index.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub call_type: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

/// Per-call state machine reassembling fragmented tool calls.
///
/// Single-threaded ownership: the spawned stream task is the only writer.
#[derive(Debug, Default)]
pub struct StreamAggregator {
    /// In-progress invocations by stream index. BTreeMap so snapshots come
    /// out in ascending index order with unpopulated indices skipped.
    calls: BTreeMap<u32, ToolCall>,
    /// Accumulated name as it stood before the current frame, per index.
    last_name: BTreeMap<u32, String>,
    /// Indices whose `tool_call_started` notification already fired.
    notified: BTreeSet<u32>,
}

impl StreamAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame, returning the events it produces in order.
    pub fn apply_chunk(&mut self, chunk: &StreamChunk) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let Some(choice) = chunk.choices.first() else {
            return events;
        };
        let done = choice
            .finish_reason
            .as_deref()
            .is_some_and(|reason| !reason.is_empty());

        if let Some(delta) = &choice.delta {
            for tc in &delta.tool_calls {
                if let Some(started) = self.apply_tool_call_delta(tc) {
                    events.push(started);
                }
            }

            if let Some(content) = &delta.content
                && !content.is_empty()
            {
                events.push(StreamEvent::Answer {
                    content: content.clone(),
                    done,
                    tool_calls: self.snapshot(),
                });
            }
        }

        // End-of-turn with accumulated calls: emit one extra frame carrying
        // the complete snapshot, in case the last content frame raced ahead
        // of tool-call assembly.
        if done && !self.calls.is_empty() {
            events.push(StreamEvent::Answer {
                content: String::new(),
                done: true,
                tool_calls: self.snapshot(),
            });
        }

        events
    }

    /// Fold one tool-call fragment into the state, possibly yielding the
    /// invocation's `tool_call_started` notification.
    ///
    /// The notification fires on the first frame where the accumulated name
    /// matches what it was before this frame (the frame after the name
    /// stopped growing), arguments grew this frame, and the id is known.
    /// That timing guarantees the id has arrived by the time consumers hear
    /// about the invocation, and it must not fire more than once.
    fn apply_tool_call_delta(&mut self, delta: &ToolCallDelta) -> Option<StreamEvent> {
        let index = delta.index;
        let call = self.calls.entry(index).or_default();

        if let Some(id) = &delta.id
            && !id.is_empty()
        {
            call.id = id.clone();
        }
        if let Some(kind) = &delta.call_type
            && !kind.is_empty()
        {
            call.call_type = kind.clone();
        }

        let mut args_updated = false;
        if let Some(function) = &delta.function {
            if let Some(name) = &function.name
                && !name.is_empty()
            {
                call.function.name.push_str(name);
            }
            if let Some(arguments) = &function.arguments
                && !arguments.is_empty()
            {
                call.function.arguments.push_str(arguments);
                args_updated = true;
            }
        }

        let current_name = call.function.name.clone();
        let call_id = call.id.clone();

        let notify = !current_name.is_empty()
            && self.last_name.get(&index).map(String::as_str) == Some(current_name.as_str())
            && args_updated
            && !self.notified.contains(&index)
            && !call_id.is_empty();

        self.last_name.insert(index, current_name.clone());

        if notify {
            self.notified.insert(index);
            Some(StreamEvent::ToolCallStarted {
                tool_name: current_name,
                tool_call_id: call_id,
            })
        } else {
            None
        }
    }

    /// Ordered snapshot of every invocation observed so far, ascending by
    /// index; `None` until the first fragment arrives.
    pub fn snapshot(&self) -> Option<Vec<ToolCall>> {
        if self.calls.is_empty() {
            None
        } else {
            Some(self.calls.values().cloned().collect())
        }
    }

    /// The unconditional end-of-sequence marker: empty content, done, and
    /// the current snapshot.
    pub fn final_event(&self) -> StreamEvent {
        StreamEvent::Answer {
            content: String::new(),
            done: true,
            tool_calls: self.snapshot(),
        }
    }
}

/// Drive one streaming response to completion on a background task.
///
/// The task ends when the backend closes the stream (normally or not) or
/// when the receiver is dropped. Either way the channel closes; on normal
/// paths the guaranteed terminal event goes out first.
pub(crate) fn spawn_stream_task(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    tokio::spawn(async move {
        let mut aggregator = StreamAggregator::new();
        let mut frames = response.bytes_stream().eventsource();

        while let Some(frame) = frames.next().await {
            match frame {
                Ok(event) => {
                    let data = event.data.trim();
                    if data == "[DONE]" {
                        break;
                    }
                    if data.is_empty() {
                        continue;
                    }
                    let chunk: StreamChunk = match serde_json::from_str(data) {
                        Ok(chunk) => chunk,
                        Err(err) => {
                            warn!(error = %err, "skipping malformed stream frame");
                            continue;
                        }
                    };
                    for event in aggregator.apply_chunk(&chunk) {
                        if tx.send(event).await.is_err() {
                            // Receiver dropped: treat as cancellation.
                            return;
                        }
                    }
                }
                Err(err) => {
                    // Logged, not surfaced; the channel still closes with a
                    // terminal event below.
                    error!(error = %err, "stream transport error");
                    break;
                }
            }
        }

        let _ = tx.send(aggregator.final_event()).await;
    });
}
