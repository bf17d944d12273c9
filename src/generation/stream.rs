//! Wire format of a generated podcast.
//!
//! The body starts with one JSON line describing the episode, terminated by
//! `\n`, followed by raw MPEG audio bytes until the end of the body. JSON
//! string escaping guarantees the header itself never contains a raw newline.

use bytes::{BufMut, Bytes, BytesMut};
use futures::{stream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    errors::{PoducateError, Result},
    generation::pipeline::{PipelineStage, PodcastResult},
    speech::{AudioStream, VoiceInfo},
};

/// First line of a podcast body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptHeader {
    pub title: String,
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceInfo>,
}

impl ScriptHeader {
    pub fn to_line(&self) -> Result<Bytes> {
        let mut line = BytesMut::from(serde_json::to_vec(self)?.as_slice());
        line.put_u8(b'\n');
        Ok(line.freeze())
    }
}

/// Turn a pipeline result into the podcast body stream.
pub fn podcast_body(result: PodcastResult) -> Result<impl Stream<Item = Result<Bytes>> + Send> {
    let header = ScriptHeader {
        title: result.title,
        script: result.script,
        voice: result.voice,
    }
    .to_line()?;

    let audio = bounded_audio(result.audio, result.deadline, result.request_id);
    Ok(stream::once(async move { Ok(header) }).chain(audio))
}

struct AudioState {
    audio: AudioStream,
    deadline: Instant,
    request_id: Uuid,
    bytes: usize,
    finished: bool,
}

/// Forward audio chunks until the upstream stream ends, fails, or the
/// deadline passes. A deadline or upstream error is yielded once as an `Err`
/// so the transport aborts the response instead of ending it cleanly.
fn bounded_audio(
    audio: AudioStream,
    deadline: Instant,
    request_id: Uuid,
) -> impl Stream<Item = Result<Bytes>> + Send {
    let state = AudioState {
        audio,
        deadline,
        request_id,
        bytes: 0,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        let next = tokio::select! {
            chunk = state.audio.next() => chunk,
            _ = sleep_until(state.deadline) => Some(Err(PoducateError::Timeout { stage: "streaming audio" })),
        };

        match next {
            Some(Ok(chunk)) => {
                state.bytes += chunk.len();
                Some((Ok(chunk), state))
            }
            Some(Err(err)) => {
                warn!(
                    request_id = %state.request_id,
                    bytes = state.bytes,
                    error = %err,
                    "Audio stream aborted"
                );
                state.finished = true;
                Some((Err(err), state))
            }
            None => {
                info!(
                    request_id = %state.request_id,
                    stage = %PipelineStage::Done,
                    bytes = state.bytes,
                    "Podcast stream finished"
                );
                None
            }
        }
    })
}

/// Split a complete podcast body into its header and audio bytes.
pub fn split_podcast_body(body: &[u8]) -> Result<(ScriptHeader, &[u8])> {
    let newline = body
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| PoducateError::invalid_input("podcast body has no header line"))?;

    let header = serde_json::from_slice(&body[..newline])?;
    Ok((header, &body[newline + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::time::Duration;

    fn result(audio: AudioStream, timeout: Duration) -> PodcastResult {
        PodcastResult {
            request_id: Uuid::new_v4(),
            title: "Generated Podcast: Lines".into(),
            script: "Line one.\nLine \"two\".".into(),
            voice: None,
            audio,
            deadline: Instant::now() + timeout,
        }
    }

    #[tokio::test]
    async fn test_body_starts_with_header_line() {
        let audio = stream::iter(vec![
            Ok(Bytes::from_static(b"\xff\xfb")),
            Ok(Bytes::from_static(b"\n\x00\x01")),
        ])
        .boxed();

        let body: Vec<Bytes> = podcast_body(result(audio, Duration::from_secs(5)))
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        let body = body.concat();

        let (header, audio) = split_podcast_body(&body).unwrap();
        assert_eq!(header.title, "Generated Podcast: Lines");
        assert_eq!(header.script, "Line one.\nLine \"two\".");
        assert_eq!(audio, b"\xff\xfb\n\x00\x01");
    }

    #[tokio::test]
    async fn test_upstream_error_ends_stream_with_error() {
        let audio = stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err(PoducateError::upstream("speech synthesis", None, "reset")),
            Ok(Bytes::from_static(b"never")),
        ])
        .boxed();

        let items: Vec<Result<Bytes>> = podcast_body(result(audio, Duration::from_secs(5)))
            .unwrap()
            .collect()
            .await;

        assert_eq!(items.len(), 3);
        assert!(items[1].is_ok());
        assert!(items[2].is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_stalled_audio() {
        let audio = stream::pending::<Result<Bytes>>().boxed();

        let items: Vec<Result<Bytes>> = podcast_body(result(audio, Duration::from_secs(1)))
            .unwrap()
            .collect()
            .await;

        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(PoducateError::Timeout { .. })));
    }

    #[test]
    fn test_split_without_header_fails() {
        assert!(split_podcast_body(b"no newline here").is_err());
    }
}
