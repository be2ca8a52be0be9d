//! Input validation functions
//!
//! Shared between client and server: clients can pre-validate input, the
//! server enforces.

mod file_name;
mod file_path;
mod password;
mod username;

pub use file_name::{FileNameError, MAX_FILE_NAME_LENGTH, validate_file_name};
pub use file_path::{FilePathError, MAX_FILE_PATH_LENGTH, validate_file_path};
pub use password::{
    MAX_PASSWORD_LENGTH, PasswordError, validate_password, validate_password_input,
};
pub use username::{MAX_USERNAME_LENGTH, UsernameError, username_key, validate_username};
