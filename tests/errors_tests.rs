use actix_web::http::StatusCode;
use linkpulse::errors::{LinkpulseError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let error = LinkpulseError::invalid_input("URL 为空");

        assert!(matches!(error, LinkpulseError::InvalidInput(_)));
        assert_eq!(error.code(), "E001");
        assert_eq!(error.http_status(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("Invalid Input"));
        assert!(error.to_string().contains("URL 为空"));
    }

    #[test]
    fn test_code_conflict_error() {
        let error = LinkpulseError::code_conflict("abc123 已存在");

        assert_eq!(error.code(), "E002");
        assert_eq!(error.http_status(), StatusCode::CONFLICT);
        assert!(error.to_string().contains("Code Conflict"));
    }

    #[test]
    fn test_not_found_error() {
        let error = LinkpulseError::not_found("短码不存在");

        assert_eq!(error.code(), "E003");
        assert_eq!(error.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "短码不存在");
    }

    #[test]
    fn test_expired_error() {
        let error = LinkpulseError::expired("已过期");

        assert_eq!(error.code(), "E004");
        assert_eq!(error.http_status(), StatusCode::GONE);
        assert!(error.to_string().contains("Link Expired"));
    }

    #[test]
    fn test_telemetry_delivery_error() {
        let error = LinkpulseError::telemetry_delivery("collector unreachable");

        assert_eq!(error.code(), "E005");
        assert_eq!(error.http_status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_config_error() {
        let error = LinkpulseError::config("bad port");

        assert_eq!(error.code(), "E006");
        assert_eq!(error.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().contains("Configuration Error"));
    }
}

#[cfg(test)]
mod error_trait_tests {
    use super::*;

    #[test]
    fn test_error_trait_and_source() {
        let error = LinkpulseError::not_found("x");
        let as_error: &dyn Error = &error;
        assert!(as_error.source().is_none());
    }

    #[test]
    fn test_format_simple_matches_display() {
        let error = LinkpulseError::expired("gone");
        assert_eq!(error.format_simple(), error.to_string());
        assert_eq!(error.format_simple(), "Link Expired: gone");
    }

    #[test]
    fn test_format_colored_contains_parts() {
        colored::control::set_override(false);
        let error = LinkpulseError::code_conflict("dup");
        let colored = error.format_colored();
        assert!(colored.contains("E002"));
        assert!(colored.contains("dup"));
    }

    #[test]
    fn test_result_alias_with_question_mark() {
        fn inner() -> Result<u32> {
            Err(LinkpulseError::invalid_input("nope"))
        }
        fn outer() -> Result<u32> {
            let value = inner()?;
            Ok(value + 1)
        }

        assert!(matches!(outer(), Err(LinkpulseError::InvalidInput(_))));
    }
}
