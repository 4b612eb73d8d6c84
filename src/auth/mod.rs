pub mod password;
pub mod tokens;

pub use tokens::{Claims, TokenKind, TokenService};
