//! Authentication primitives - JWT and password handling

mod jwt;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use password::{
    generate_reset_token, hash_password, hash_reset_token, validate_password_strength,
    verify_password, PasswordService,
};
