//! Peer link handlers.
//!
//! Both sides of a link run the same loop: a reader that applies every
//! `PeerRecord` line and a writer task that drains the link's channel. The
//! accepting side first sends its full snapshot; the dialing side reads
//! that snapshot and merges it before entering the loop.

use std::sync::Arc;

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
    task::JoinHandle,
};

use crate::{
    domain::{Board, ConnectionId, EditRecord},
    infrastructure::dto::{
        peer::{PeerRecord, PeerSnapshot, encode_line},
        websocket::EditMessage,
    },
    ui::state::AppState,
    usecase::PeerError,
};

type PeerLines = Lines<BufReader<OwnedReadHalf>>;

/// Spawn the accept loop for inbound peer links.
pub fn spawn_peer_listener(listener: TcpListener, state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    tracing::info!("Peer link accepted from {}", addr);
                    tokio::spawn(handle_inbound_peer(stream, addr.to_string(), state.clone()));
                }
                Err(e) => {
                    tracing::warn!("Failed to accept peer link: {}", e);
                }
            }
        }
    })
}

/// Spawn a single outbound dial to `addr`. There is no retry.
pub fn spawn_peer_dialer(addr: String, state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match dial_peer(&addr, state).await {
            Ok(()) => tracing::info!("Peer link to {} closed", addr),
            Err(e) => tracing::warn!("Peer link to {} ended: {}", addr, e),
        }
    })
}

async fn handle_inbound_peer(stream: TcpStream, addr: String, state: Arc<AppState>) {
    let peer_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .replicate_peer_usecase
        .attach_peer(peer_id, addr.clone(), tx)
        .await;

    match serve_inbound_peer(stream, rx, &state).await {
        Ok(()) => tracing::info!("Peer {} disconnected", addr),
        Err(e) => tracing::warn!("Peer link from {} ended: {}", addr, e),
    }

    state.replicate_peer_usecase.detach_peer(&peer_id).await;
}

async fn serve_inbound_peer(
    stream: TcpStream,
    rx: mpsc::UnboundedReceiver<String>,
    state: &AppState,
) -> Result<(), PeerError> {
    let (reader, mut writer) = stream.into_split();

    let snapshot: PeerSnapshot = state.replicate_peer_usecase.snapshot().await.to_flat();
    writer.write_all(encode_line(&snapshot)?.as_bytes()).await?;
    tracing::debug!("Sent snapshot of {} record(s) to peer", snapshot.len());

    run_peer_link(BufReader::new(reader).lines(), writer, rx, state).await
}

async fn dial_peer(addr: &str, state: Arc<AppState>) -> Result<(), PeerError> {
    let stream = TcpStream::connect(addr).await?;
    tracing::info!("Connected to peer {}", addr);

    let peer_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .replicate_peer_usecase
        .attach_peer(peer_id, addr.to_string(), tx)
        .await;

    let result = serve_outbound_peer(stream, rx, &state).await;
    state.replicate_peer_usecase.detach_peer(&peer_id).await;
    result
}

async fn serve_outbound_peer(
    stream: TcpStream,
    rx: mpsc::UnboundedReceiver<String>,
    state: &AppState,
) -> Result<(), PeerError> {
    let (reader, writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let line = lines.next_line().await?.ok_or(PeerError::Closed)?;
    let snapshot: PeerSnapshot = serde_json::from_str(&line)?;
    let merged = state
        .replicate_peer_usecase
        .merge_snapshot(Board::from_flat(snapshot))
        .await;
    tracing::info!("Merged {} record(s) from peer snapshot", merged);

    run_peer_link(lines, writer, rx, state).await
}

/// Run the writer task and the record reader until the link ends.
async fn run_peer_link(
    lines: PeerLines,
    writer: OwnedWriteHalf,
    rx: mpsc::UnboundedReceiver<String>,
    state: &AppState,
) -> Result<(), PeerError> {
    let writer_task = peer_writer_loop(rx, writer);
    let result = read_records(lines, state).await;
    writer_task.abort();
    result
}

fn peer_writer_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: OwnedWriteHalf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                tracing::debug!("Peer write failed: {}", e);
                break;
            }
        }
    })
}

/// Apply every record line. A malformed line ends the link.
async fn read_records(mut lines: PeerLines, state: &AppState) -> Result<(), PeerError> {
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let record = EditRecord::from(serde_json::from_str::<PeerRecord>(&line)?);
        let relay_json = serde_json::to_string(&EditMessage::from(&record))?;
        state
            .replicate_peer_usecase
            .apply_record(record, &relay_json)
            .await;
    }
    Ok(())
}
