use stml_core::StmlError;

use crate::Statement;

/// Parses one line of a statement file. Blank lines and `#` comments yield
/// `None`.
pub(crate) fn parse_statement(line: &str) -> Result<Option<Statement>, StmlError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (trimmed, ""),
    };
    let optional = |rest: &str| (!rest.is_empty()).then(|| rest.to_string());

    let statement = match keyword {
        "scope" => Statement::Scope(rest.to_string()),
        "get" => Statement::Get(rest.to_string()),
        "set" => {
            let (path, literal) = split_assignment(trimmed, rest)?;
            Statement::Set { path, literal }
        }
        "let" => {
            let (key, literal) = split_assignment(trimmed, rest)?;
            Statement::Let { key, literal }
        }
        "final" => Statement::Final(optional(rest)),
        "close" => Statement::Close(optional(rest)),
        "policy" => Statement::Policy(optional(rest)),
        other => {
            return Err(invalid(format!(
                "Unknown statement \"{}\" in line \"{}\".",
                other, trimmed
            )));
        }
    };
    Ok(Some(statement))
}

/// Splits `path = literal` at the first `=` outside quotes.
fn split_assignment(line: &str, rest: &str) -> Result<(String, String), StmlError> {
    let mut quote: Option<char> = None;
    for (offset, ch) in rest.char_indices() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == '=' => {
                let target = rest[..offset].trim();
                if target.is_empty() {
                    return Err(invalid(format!("Missing target in line \"{}\".", line)));
                }
                return Ok((target.to_string(), rest[offset + 1..].trim().to_string()));
            }
            None => {}
        }
    }
    Err(invalid(format!(
        "Expected \"<target> = <literal>\" in line \"{}\".",
        line
    )))
}

fn invalid(message: String) -> StmlError {
    StmlError::malformed("CLI_STATEMENT_INVALID", message)
}
