//! Client connection handling

use std::io;
use std::net::SocketAddr;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use stash_common::framing::{FrameError, FrameReader, FrameWriter};
use stash_common::io::{read_request, send_error};
use stash_common::protocol::Response;

use crate::constants::ERR_GENERIC;
use crate::db::Database;
use crate::handlers::{self, HandlerContext};
use crate::sessions::SessionRegistry;
use crate::storage::StorageArea;

/// Parameters for handling a connection
pub struct ConnectionParams {
    pub peer_addr: SocketAddr,
    pub sessions: SessionRegistry,
    pub db: Database,
    pub storage: StorageArea,
    pub max_frame_length: u32,
}

/// Handle a client connection over TCP
pub async fn handle_connection(socket: TcpStream, params: ConnectionParams) -> io::Result<()> {
    socket.set_nodelay(true)?;
    handle_connection_inner(socket, params).await
}

/// Serve requests on any byte stream until the peer disconnects
///
/// The session is registered on entry and removed on every exit path, so a
/// signed-in username is freed as soon as its connection goes away.
pub async fn handle_connection_inner<S>(socket: S, params: ConnectionParams) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let ConnectionParams {
        peer_addr,
        sessions,
        db,
        storage,
        max_frame_length,
    } = params;

    let session_id = sessions.register(peer_addr).await;
    debug!(peer = %peer_addr, session = session_id, "connected");

    let ctx = HandlerContext {
        session_id,
        peer_addr,
        sessions: &sessions,
        db: &db,
        storage: &storage,
    };
    let result = serve_requests(socket, &ctx, max_frame_length).await;

    if let Some(session) = sessions.remove(session_id).await {
        let now = Utc::now();
        let connected_secs = (now - session.connected_at).num_seconds();
        if let Some(username) = session.username {
            let signed_in_secs = session
                .signed_in_at
                .map_or(0, |at| (now - at).num_seconds());
            info!(
                peer = %peer_addr,
                user = %username,
                signed_in_secs,
                "signed-in user disconnected"
            );
        }
        debug!(peer = %peer_addr, session = session_id, connected_secs, "disconnected");
    }

    result
}

/// Read frames, dispatch them and write replies, one request at a time
async fn serve_requests<S>(
    socket: S,
    ctx: &HandlerContext<'_>,
    max_frame_length: u32,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let peer_addr = ctx.peer_addr;
    let (reader, writer) = tokio::io::split(socket);
    let mut frame_reader = FrameReader::new(BufReader::new(reader))
        .with_request_limits()
        .with_max_frame_length(max_frame_length);
    let mut frame_writer = FrameWriter::new(writer);

    loop {
        let frame = match read_request(&mut frame_reader).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(()),
            Err(FrameError::ConnectionClosed) => {
                debug!(peer = %peer_addr, "connection closed mid-frame");
                return Ok(());
            }
            Err(e) => {
                warn!(peer = %peer_addr, error = %e, "unreadable frame, closing connection");
                // Framing is lost; tell the client why before hanging up
                let _ = send_error(&mut frame_writer, Response::Error, ERR_GENERIC).await;
                return Err(e.into());
            }
        };

        if let Some(reply) = handlers::dispatch(frame, ctx).await {
            frame_writer.write_frame(&reply).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_common::framing::RawFrame;
    use stash_common::protocol::Request;
    use tempfile::TempDir;
    use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;

    use crate::db::init_db;

    struct TestServer {
        sessions: SessionRegistry,
        task: JoinHandle<io::Result<()>>,
        reader: FrameReader<ReadHalf<DuplexStream>>,
        writer: FrameWriter<WriteHalf<DuplexStream>>,
        _temp_dir: TempDir,
    }

    async fn start() -> TestServer {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("accounts.db")).await.unwrap();
        let sessions = SessionRegistry::new();
        let params = ConnectionParams {
            peer_addr: "127.0.0.1:40000".parse().unwrap(),
            sessions: sessions.clone(),
            db: Database::new(pool).with_fast_hashing(),
            storage: StorageArea::init(temp_dir.path()).unwrap(),
            max_frame_length: 1024,
        };

        let (client, server) = tokio::io::duplex(64 * 1024);
        let task = tokio::spawn(handle_connection_inner(server, params));
        let (reader, writer) = tokio::io::split(client);
        TestServer {
            sessions,
            task,
            reader: FrameReader::new(reader),
            writer: FrameWriter::new(writer),
            _temp_dir: temp_dir,
        }
    }

    impl TestServer {
        async fn request(&mut self, request: Request, payload: &[u8]) -> RawFrame {
            self.writer.write(request.opcode(), payload).await.unwrap();
            self.reader.read_frame().await.unwrap().unwrap()
        }
    }

    #[tokio::test]
    async fn test_requests_are_answered_in_order() {
        let mut server = start().await;

        let reply = server.request(Request::SignUp, b"alice;pw").await;
        assert_eq!(reply.opcode, Response::SignUpSuccess.opcode());
        let reply = server.request(Request::SignIn, b"alice;pw").await;
        assert_eq!(reply.opcode, Response::SignInSuccess.opcode());
        let reply = server.request(Request::GetData, b"").await;
        assert_eq!(reply.opcode, Response::GetDataSuccess.opcode());
    }

    #[tokio::test]
    async fn test_none_request_gets_no_reply() {
        let mut server = start().await;

        server.writer.write(Request::None.opcode(), b"").await.unwrap();
        // The next reply on the wire belongs to the request after it
        let reply = server.request(Request::SignOut, b"").await;
        assert_eq!(reply.opcode, Response::SignOutSuccess.opcode());
    }

    #[tokio::test]
    async fn test_disconnect_frees_username() {
        let mut server = start().await;
        server.request(Request::SignUp, b"alice;pw").await;
        server.request(Request::SignIn, b"alice;pw").await;
        assert!(server.sessions.is_signed_in("alice").await);

        let TestServer {
            sessions,
            task,
            reader,
            mut writer,
            _temp_dir,
        } = server;
        writer.get_mut().shutdown().await.unwrap();
        drop(writer);
        drop(reader);

        task.await.unwrap().unwrap();
        assert!(!sessions.is_signed_in("alice").await);
        assert_eq!(sessions.count().await, 0);
    }

    #[tokio::test]
    async fn test_oversized_frame_closes_connection_with_error() {
        let mut server = start().await;

        let declared: u32 = 4096;
        server
            .writer
            .get_mut()
            .write_all(&declared.to_be_bytes())
            .await
            .unwrap();

        let reply = server.reader.read_frame().await.unwrap().unwrap();
        assert_eq!(reply.opcode, Response::Error.opcode());
        assert_eq!(reply.payload, ERR_GENERIC.as_bytes());
        assert!(server.task.await.unwrap().is_err());
        assert!(server.reader.read_frame().await.unwrap().is_none());
    }
}
