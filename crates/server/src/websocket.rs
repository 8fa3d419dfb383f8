//! Chat WebSocket
//!
//! One socket per session: questions and microphone audio flow in; reveal
//! chunks, finalized answers, transcripts, and response audio flow out.
//! Inbound audio frames are base64 PCM16 at 16 kHz mono, decoded here and
//! pushed into the connection's capture source for the listener pipeline.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use coach_agent_chat::{ChatEvent, ChatSession};
use coach_agent_core::{AudioClip, AudioFrame, AudioSink, CoreError, SampleRate, TranscriptEvent};
use coach_agent_voice::{Listener, Speaker};

use crate::capture::ChannelSource;
use crate::coach::run_chat_turn;
use crate::state::AppState;

/// WebSocket message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Text question from the client
    Text {
        content: String,
        #[serde(default)]
        athlete_id: Option<String>,
    },
    /// Microphone audio frame (base64 PCM16, 16 kHz mono)
    Audio { data: String },
    /// Start a capture/transcription session
    StartListening,
    /// Stop the capture/transcription session
    StopListening,
    /// Session info, sent on connect
    SessionInfo { session_id: String },
    /// Growing prefix of the answer being revealed
    Chunk { text: String },
    /// Finalized answer
    Response { text: String },
    /// Synthesized answer audio (base64)
    ResponseAudio { data: String },
    /// Transcript event from the listener pipeline
    Transcript { text: String, is_final: bool },
    /// Listener state update
    Listening {
        active: bool,
        backend: Option<String>,
    },
    /// Error
    Error { message: String },
    /// Ping/Pong
    Ping,
    Pong,
}

type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Audio sink that ships synthesized clips to the client as base64 messages
struct WsAudioSink {
    sender: WsSender,
}

#[async_trait::async_trait]
impl AudioSink for WsAudioSink {
    async fn play(&self, clip: AudioClip) -> Result<(), CoreError> {
        let message = WsMessage::ResponseAudio {
            data: BASE64.encode(&clip.bytes),
        };
        send(&self.sender, &message)
            .await
            .map_err(|e| CoreError::Audio(e.to_string()))
    }
}

async fn send(sender: &WsSender, message: &WsMessage) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(message).map_err(axum::Error::new)?;
    sender.lock().await.send(Message::Text(payload)).await
}

/// Handle WebSocket upgrade for a session
pub async fn handle_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, StatusCode> {
    let session = state
        .store
        .get(session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, session, state)))
}

/// Handle one WebSocket connection
async fn handle_socket(socket: WebSocket, session: Arc<ChatSession>, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let sender: WsSender = Arc::new(Mutex::new(sender));

    let _ = send(
        &sender,
        &WsMessage::SessionInfo {
            session_id: session.id.to_string(),
        },
    )
    .await;

    // Forward this session's chat events to the client.
    let forward_task = {
        let sender = sender.clone();
        let mut events = state.store.subscribe();
        let session_id = session.id;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.session_id() == session_id => {
                        let Some(message) = outbound_message(event) else {
                            continue;
                        };
                        if send(&sender, &message).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Chat event subscriber lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    };

    // Per-connection voice plumbing: the capture source fed by inbound audio
    // messages, the listener over it, and the speaker playing back over this
    // socket.
    let voice_settings = state.get_config().voice.clone();
    let capture = Arc::new(ChannelSource::new());
    let listener = Arc::new(Listener::new(
        voice_settings.asr_relay.clone(),
        capture.clone(),
        None,
    ));
    let speaker = Arc::new(Speaker::new(
        &voice_settings,
        Some(Arc::new(WsAudioSink {
            sender: sender.clone(),
        })),
        None,
    ));

    // Forward transcript events to the client.
    let (transcript_tx, mut transcript_rx) = mpsc::channel::<TranscriptEvent>(16);
    let transcript_task = {
        let sender = sender.clone();
        tokio::spawn(async move {
            while let Some(event) = transcript_rx.recv().await {
                let message = WsMessage::Transcript {
                    text: event.text,
                    is_final: event.is_final,
                };
                if send(&sender, &message).await.is_err() {
                    break;
                }
            }
        })
    };

    let mut audio_sequence: u64 = 0;

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(payload) => {
                let inbound: WsMessage = match serde_json::from_str(&payload) {
                    Ok(inbound) => inbound,
                    Err(e) => {
                        let _ = send(
                            &sender,
                            &WsMessage::Error {
                                message: format!("Unrecognized message: {e}"),
                            },
                        )
                        .await;
                        continue;
                    }
                };

                match inbound {
                    WsMessage::Text {
                        content,
                        athlete_id,
                    } => {
                        if content.trim().is_empty() {
                            continue;
                        }
                        // Spawned so the socket keeps draining while the
                        // reveal runs; the session's send lock serializes
                        // overlapping questions.
                        let state = state.clone();
                        let session = session.clone();
                        let speaker = speaker.clone();
                        tokio::spawn(async move {
                            run_chat_turn(
                                &state,
                                &session,
                                &content,
                                athlete_id.as_deref(),
                                &speaker,
                            )
                            .await;
                        });
                    }
                    WsMessage::StartListening => {
                        listener.listen(transcript_tx.clone()).await;
                        let _ = send(
                            &sender,
                            &WsMessage::Listening {
                                active: listener.listening(),
                                backend: listener.backend().map(|b| format!("{b:?}")),
                            },
                        )
                        .await;
                    }
                    WsMessage::StopListening => {
                        listener.stop();
                        let _ = send(
                            &sender,
                            &WsMessage::Listening {
                                active: false,
                                backend: None,
                            },
                        )
                        .await;
                    }
                    WsMessage::Audio { data } => match BASE64.decode(&data) {
                        Ok(bytes) => {
                            let frame =
                                AudioFrame::from_pcm16(&bytes, SampleRate::Hz16000, audio_sequence);
                            audio_sequence += 1;
                            capture.push(frame).await;
                        }
                        Err(_) => {
                            tracing::debug!(session_id = %session.id, "Dropping undecodable audio frame");
                        }
                    },
                    WsMessage::Ping => {
                        let _ = send(&sender, &WsMessage::Pong).await;
                    }
                    // Server-to-client variants arriving inbound are ignored.
                    _ => {}
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    listener.stop();
    forward_task.abort();
    transcript_task.abort();
    tracing::debug!(session_id = %session.id, "WebSocket connection closed");
}

/// Map a chat event to its outbound message, if it has one
fn outbound_message(event: ChatEvent) -> Option<WsMessage> {
    match event {
        ChatEvent::RevealChunk { text, .. } => Some(WsMessage::Chunk { text }),
        ChatEvent::MessageFinalized { text, .. } => Some(WsMessage::Response { text }),
        ChatEvent::SessionCreated { .. }
        | ChatEvent::UserMessage { .. }
        | ChatEvent::RevealStarted { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_snake_case_tags() {
        let message = WsMessage::Transcript {
            text: "hi coach".into(),
            is_final: true,
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""type":"transcript""#));
        assert!(json.contains(r#""is_final":true"#));

        let parsed: WsMessage =
            serde_json::from_str(r#"{"type":"text","content":"how is my form"}"#).unwrap();
        match parsed {
            WsMessage::Text {
                content,
                athlete_id,
            } => {
                assert_eq!(content, "how is my form");
                assert!(athlete_id.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn chunk_events_map_to_chunk_messages() {
        let event = ChatEvent::RevealChunk {
            session_id: Uuid::new_v4(),
            index: 1,
            text: "Calm".into(),
        };
        match outbound_message(event) {
            Some(WsMessage::Chunk { text }) => assert_eq!(text, "Calm"),
            other => panic!("unexpected mapping: {other:?}"),
        }

        let event = ChatEvent::RevealStarted {
            session_id: Uuid::new_v4(),
            index: 1,
        };
        assert!(outbound_message(event).is_none());
    }
}
