//! Async client for the Stash protocol
//!
//! One request in flight at a time: each call writes a frame and waits for
//! the matching reply.

use std::io;

use thiserror::Error;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::framing::{FrameReader, FrameWriter};
use crate::io::{ReceivedResponse, read_response, send_request};
use crate::protocol::{
    Credentials, DownloadHeader, FolderRequest, PathRequest, PayloadError, Request, Response,
    StorageNode, UploadHeader,
};

/// Errors surfaced to client callers
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("server closed the connection")]
    Disconnected,

    /// The server answered with an error opcode
    #[error("{message}")]
    Server { response: Response, message: String },

    #[error("unexpected response {0:?}")]
    Unexpected(Response),

    #[error("malformed response payload: {0}")]
    Payload(#[from] PayloadError),
}

impl ClientError {
    /// Error message from the server, if this is a server-side rejection
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// A connected Stash client
pub struct Client {
    reader: FrameReader<BufReader<OwnedReadHalf>>,
    writer: FrameWriter<OwnedWriteHalf>,
}

impl Client {
    /// Connect to a server
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: FrameReader::new(BufReader::new(read_half)),
            writer: FrameWriter::new(write_half),
        })
    }

    /// Send a raw opcode and return whatever comes back
    pub async fn send_raw(
        &mut self,
        opcode: u32,
        payload: &[u8],
    ) -> Result<ReceivedResponse, ClientError> {
        self.writer
            .write(opcode, payload)
            .await
            .map_err(io::Error::from)?;
        self.receive().await
    }

    /// Wait for the next response frame
    pub async fn receive(&mut self) -> Result<ReceivedResponse, ClientError> {
        read_response(&mut self.reader)
            .await?
            .ok_or(ClientError::Disconnected)
    }

    /// Send a request and check the reply against its typed pair
    async fn call(&mut self, request: Request, payload: &[u8]) -> Result<Vec<u8>, ClientError> {
        send_request(&mut self.writer, request, payload).await?;
        let reply = self.receive().await?;

        if reply.response == request.success_response() {
            return Ok(reply.payload);
        }
        if reply.response.is_error() {
            return Err(ClientError::Server {
                response: reply.response,
                message: reply.text(),
            });
        }
        Err(ClientError::Unexpected(reply.response))
    }

    async fn call_for_tree(
        &mut self,
        request: Request,
        payload: &[u8],
    ) -> Result<StorageNode, ClientError> {
        let payload = self.call(request, payload).await?;
        Ok(StorageNode::from_json(&payload)?)
    }

    /// Sign in; returns the server's confirmation text
    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<String, ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let payload = self.call(Request::SignIn, &credentials.encode()).await?;
        Ok(String::from_utf8_lossy(&payload).into_owned())
    }

    /// Create an account; returns the server's confirmation text
    pub async fn sign_up(&mut self, username: &str, password: &str) -> Result<String, ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let payload = self.call(Request::SignUp, &credentials.encode()).await?;
        Ok(String::from_utf8_lossy(&payload).into_owned())
    }

    /// Sign out of the current session
    pub async fn sign_out(&mut self, username: &str) -> Result<String, ClientError> {
        let payload = self.call(Request::SignOut, username.as_bytes()).await?;
        Ok(String::from_utf8_lossy(&payload).into_owned())
    }

    /// Fetch the full storage tree
    pub async fn get_data(&mut self) -> Result<StorageNode, ClientError> {
        self.call_for_tree(Request::GetData, b"").await
    }

    /// Delete a file or folder; returns the new tree
    pub async fn delete(&mut self, path: &str) -> Result<StorageNode, ClientError> {
        let request = PathRequest {
            path: path.to_string(),
        };
        self.call_for_tree(Request::Delete, &request.encode()).await
    }

    /// Create a folder under `parent` (empty for the root); returns the new tree
    pub async fn add_folder(&mut self, parent: &str, name: &str) -> Result<StorageNode, ClientError> {
        let request = FolderRequest {
            parent: parent.to_string(),
            name: name.to_string(),
        };
        self.call_for_tree(Request::AddFolder, &request.encode())
            .await
    }

    /// Upload a file into `parent` (empty for the root); returns the new tree
    pub async fn add_file(
        &mut self,
        parent: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<StorageNode, ClientError> {
        let header = UploadHeader {
            parent: parent.to_string(),
            filename: filename.to_string(),
        };
        let payload = header.encode(data)?;
        self.call_for_tree(Request::AddFile, &payload).await
    }

    /// Download a file; returns its header and bytes
    pub async fn download(&mut self, path: &str) -> Result<(DownloadHeader, Vec<u8>), ClientError> {
        let request = PathRequest {
            path: path.to_string(),
        };
        let payload = self.call(Request::Download, &request.encode()).await?;
        let (header, data) = DownloadHeader::decode(&payload)?;
        Ok((header, data.to_vec()))
    }
}
