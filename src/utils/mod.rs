pub mod ip;
pub mod url_validator;

pub use url_validator::validate_target_url;

/// 自定义短码最大长度
pub const MAX_SHORT_CODE_LENGTH: usize = 32;

/// 短码只允许字母、数字、`-`、`_`，长度 1..=32
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
