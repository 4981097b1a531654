//! WebSocket upgrade handler and per-connection session loop.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use trolley_common::id::{prefix, prefixed_ulid};

use crate::auth::tokens::consume_ws_ticket;
use crate::error::ApiError;
use crate::AppState;

use super::groups::MEMBER_BUFFER;

/// Standard "going away" close code, sent when the server shuts down.
const CLOSE_GOING_AWAY: u16 = 1001;

#[derive(Debug, Deserialize)]
struct WsQuery {
    ticket: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/lists/{list_id}", get(ws_upgrade))
}

/// Authorization runs before the protocol upgrade, so failures surface as
/// plain HTTP statuses: 401 without a valid ticket, 404 for an unknown
/// list, 403 for a list the ticket's user cannot access.
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Path(list_id): Path<i64>,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let Some(ticket) = query.ticket else {
        return Err(ApiError::unauthorized("Missing ticket"));
    };

    // Tickets are single-use; a replayed ticket reads as expired.
    let ticket_data = consume_ws_ticket(state.kv.as_ref(), &ticket)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired ticket"))?;

    let list = state
        .store
        .get_list(list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("List not found"))?;

    if !list.can_access(&ticket_data.user_id) {
        return Err(ApiError::forbidden("You do not have access to this list"));
    }

    let user_id = ticket_data.user_id;
    Ok(ws.on_upgrade(move |socket| handle_connection(socket, state, list_id, user_id)))
}

async fn handle_connection(socket: WebSocket, state: AppState, list_id: i64, user_id: String) {
    let connection_id = prefixed_ulid(prefix::CONNECTION);

    let (events_tx, mut events_rx) = mpsc::channel(MEMBER_BUFFER);
    state.groups.join(list_id, &connection_id, events_tx);

    tracing::info!(
        %connection_id,
        list_id,
        user_id = %user_id,
        "list session established"
    );

    let mut shutdown_rx = state.shutdown.subscribe();
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // A mutation on this list was published.
            event = events_rx.recv() => {
                let Some(event) = event else { break };
                let json = serde_json::to_string(event.as_ref()).unwrap();
                if ws_tx.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }

            // Client frames. The feed is push-only, so anything other than
            // a close is ignored.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::debug!(?e, %connection_id, "ws read error");
                        break;
                    }
                }
            }

            // Server shutdown.
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow_and_update() {
                    let _ = send_close(&mut ws_tx, CLOSE_GOING_AWAY, "Server shutting down").await;
                    break;
                }
            }
        }
    }

    state.groups.leave(list_id, &connection_id);

    tracing::info!(
        %connection_id,
        list_id,
        user_id = %user_id,
        "list session ended"
    );
}

/// Send a WebSocket close frame with a code and reason.
async fn send_close(
    ws_tx: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    code: u16,
    reason: &str,
) -> Result<(), axum::Error> {
    let close_msg = Message::Close(Some(CloseFrame {
        code,
        reason: reason.to_string().into(),
    }));
    ws_tx.send(close_msg).await
}
