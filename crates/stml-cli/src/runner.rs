use stml_core::{parse_literal, SourceSpan, StmlError, StmlValue};
use stml_scope::{Lookup, StmlScope};

use crate::{parse_statement, LoadedDocument, Statement};

/// Runs every statement of `source` against a fresh engine and returns the
/// output lines of its queries.
pub(crate) fn run_document(source: &str) -> Result<Vec<String>, StmlError> {
    let mut engine = StmlScope::new();
    let mut out = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let span = SourceSpan::line(index + 1, line.chars().count());
        let Some(statement) = parse_statement(line).map_err(|error| error.with_span(span.clone()))?
        else {
            continue;
        };
        execute(&mut engine, statement, &mut out).map_err(|error| error.with_span(span))?;
    }

    engine.pop_anonymous()?;
    log::debug!("document finished with {} scope node(s)", engine.tree().len());
    Ok(out)
}

/// Runs each document with its own engine. Output lines are grouped under a
/// `DOCUMENT:` header.
pub(crate) fn run_documents(documents: &[LoadedDocument]) -> Result<Vec<String>, StmlError> {
    let mut out = Vec::new();
    for document in documents {
        log::debug!("running {}", document.name);
        let lines = run_document(&document.source).map_err(|mut error| {
            error.message = format!("{}: {}", document.name, error.message);
            error
        })?;
        out.push(format!("DOCUMENT:{}", document.name));
        out.extend(lines);
    }
    Ok(out)
}

pub(crate) fn emit_report(lines: &[String]) {
    println!("RESULT:OK");
    for line in lines {
        println!("{}", line);
    }
}

fn execute(
    engine: &mut StmlScope,
    statement: Statement,
    out: &mut Vec<String>,
) -> Result<(), StmlError> {
    match statement {
        Statement::Scope(path) => engine.create_named_scope(&path),
        Statement::Set { path, literal } => engine.assign(&path, parse_literal(&literal)?),
        Statement::Let { key, literal } => engine.assign_local(&key, parse_literal(&literal)?),
        Statement::Get(path) => {
            let scope = match engine.look_up(&path)? {
                Lookup::Value(value) => {
                    out.push(format!("VALUE:{}", value_json(value)));
                    return Ok(());
                }
                Lookup::NotFound => {
                    out.push(format!("NOT_FOUND:{}", path));
                    return Ok(());
                }
                Lookup::Scope(node) => node.id(),
            };
            out.push(format!("SCOPE:{}", engine.describe(scope)));
            Ok(())
        }
        Statement::Final(path) => engine.finalize(path.as_deref()),
        Statement::Close(path) => engine.close(path.as_deref()),
        Statement::Policy(path) => {
            let policy = engine.current_policy(path.as_deref())?;
            out.push(format!("POLICY:{}", policy));
            Ok(())
        }
    }
}

fn value_json(value: &StmlValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
