pub mod email;
pub mod password;
pub mod spreadsheet;
pub mod token;

pub use email::validate_email;
pub use password::{hash_password, validate_password, verify_password};
pub use spreadsheet::{ImportAliases, ImportRow, normalize_rows};
pub use token::{generate_session_token, generate_transaction_code};
