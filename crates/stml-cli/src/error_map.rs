use std::fmt::Display;

use stml_core::StmlError;

fn map_error(code: &'static str, error: impl Display) -> StmlError {
    StmlError::io(code, error.to_string())
}

pub(crate) fn emit_error(error: StmlError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    if let Some(span) = &error.span {
        println!("ERROR_LINE:{}", span.start.line);
    }
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> StmlError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> StmlError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_source_walk(error: walkdir::Error) -> StmlError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_source_scan(error: std::path::StripPrefixError) -> StmlError {
    map_error("CLI_SOURCE_SCAN", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;
    use stml_core::{SourceSpan, StmlErrorKind};

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(StmlError::malformed("ERR", "failed"));
        assert_eq!(code, 1);
        let code = emit_error(
            StmlError::violation("ERR", "failed").with_span(SourceSpan::line(2, 4)),
        );
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );
        let read_error = map_cli_source_read(std::io::Error::other("read"));
        assert_eq!(read_error.code, "CLI_SOURCE_READ");
        assert_eq!(read_error.kind, StmlErrorKind::Io);

        let strip_error = std::path::Path::new("/a")
            .strip_prefix("/b")
            .expect_err("strip prefix");
        assert_eq!(map_cli_source_scan(strip_error).code, "CLI_SOURCE_SCAN");

        let walk_error = walkdir::WalkDir::new("/definitely/missing/stml-dir")
            .into_iter()
            .find_map(Result::err)
            .expect("walk error");
        assert_eq!(map_cli_source_walk(walk_error).code, "CLI_SOURCE_SCAN");
    }
}
