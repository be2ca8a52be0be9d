//! Protocol definitions for Stash
//!
//! Requests and responses are two closed sets of numeric opcodes. The
//! numeric values are part of the wire contract and must never be
//! reordered.
//!
//! Payloads come in three shapes depending on the opcode: delimited text
//! (`user;pass`, `parent;name`), JSON (`{"path": ...}` and the storage
//! tree), and a fixed-width text header followed by raw file bytes.

mod payload;
mod tree;

use strum::{AsRefStr, EnumIter, FromRepr};

pub use payload::{
    Credentials, DownloadHeader, FolderRequest, PathRequest, PayloadError, UploadHeader,
    decode_text, split_fields,
};
pub use tree::{NodeKind, StorageNode};

/// Requests sent from client to server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, AsRefStr, EnumIter)]
#[repr(u32)]
pub enum Request {
    /// No-op; logged by the server and never answered
    None = 0,
    /// `user;pass`
    SignIn = 1,
    /// `user;pass`
    SignUp = 2,
    /// `user` (only the session matters)
    SignOut = 3,
    /// Empty payload
    GetData = 4,
    /// `{"path": ...}`
    Delete = 5,
    /// `parent;name`
    AddFolder = 6,
    /// Reserved; always answered with `RenameFolderError`
    RenameFolder = 7,
    /// 256-byte `parent;filename` header + file bytes
    AddFile = 8,
    /// Reserved; always answered with `RenameFileError`
    RenameFile = 9,
    /// `{"path": ...}`
    Download = 10,
}

impl Request {
    /// Numeric opcode written to the wire
    pub fn opcode(self) -> u32 {
        self as u32
    }

    /// Look up a request by its numeric opcode
    pub fn from_opcode(opcode: u32) -> Option<Self> {
        Self::from_repr(opcode)
    }

    /// Whether the request is only valid on a signed-in session
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            Request::None | Request::SignIn | Request::SignUp | Request::SignOut
        )
    }

    /// Response opcode used when the request succeeds
    pub fn success_response(self) -> Response {
        match self {
            Request::None => Response::Success,
            Request::SignIn => Response::SignInSuccess,
            Request::SignUp => Response::SignUpSuccess,
            Request::SignOut => Response::SignOutSuccess,
            Request::GetData => Response::GetDataSuccess,
            Request::Delete => Response::DeleteSuccess,
            Request::AddFolder => Response::AddFolderSuccess,
            Request::RenameFolder => Response::RenameFolderSuccess,
            Request::AddFile => Response::AddFileSuccess,
            Request::RenameFile => Response::RenameFileSuccess,
            Request::Download => Response::DownloadSuccess,
        }
    }

    /// Response opcode used when the request fails
    pub fn error_response(self) -> Response {
        match self {
            Request::None => Response::Error,
            Request::SignIn => Response::SignInError,
            Request::SignUp => Response::SignUpError,
            Request::SignOut => Response::SignOutError,
            Request::GetData => Response::GetDataError,
            Request::Delete => Response::DeleteError,
            Request::AddFolder => Response::AddFolderError,
            Request::RenameFolder => Response::RenameFolderError,
            Request::AddFile => Response::AddFileError,
            Request::RenameFile => Response::RenameFileError,
            Request::Download => Response::DownloadError,
        }
    }
}

/// Responses sent from server to client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, AsRefStr, EnumIter)]
#[repr(u32)]
pub enum Response {
    None = 0,
    SignInSuccess = 1,
    SignInError = 2,
    SignUpSuccess = 3,
    SignUpError = 4,
    SignOutSuccess = 5,
    SignOutError = 6,
    GetDataSuccess = 7,
    GetDataError = 8,
    DeleteSuccess = 9,
    DeleteError = 10,
    AddFolderSuccess = 11,
    AddFolderError = 12,
    RenameFolderSuccess = 13,
    RenameFolderError = 14,
    AddFileSuccess = 15,
    AddFileError = 16,
    RenameFileSuccess = 17,
    RenameFileError = 18,
    DownloadSuccess = 19,
    DownloadError = 20,
    /// Generic success, for requests without a typed pair
    Success = 21,
    /// Generic error, used for unknown opcodes and framing failures
    Error = 22,
}

impl Response {
    /// Numeric opcode written to the wire
    pub fn opcode(self) -> u32 {
        self as u32
    }

    /// Look up a response by its numeric opcode
    pub fn from_opcode(opcode: u32) -> Option<Self> {
        Self::from_repr(opcode)
    }

    /// Whether the payload is a plain UTF-8 error message
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Response::SignInError
                | Response::SignUpError
                | Response::SignOutError
                | Response::GetDataError
                | Response::DeleteError
                | Response::AddFolderError
                | Response::RenameFolderError
                | Response::AddFileError
                | Response::RenameFileError
                | Response::DownloadError
                | Response::Error
        )
    }
}
