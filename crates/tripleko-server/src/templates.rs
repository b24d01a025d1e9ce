//! Template lookup.
//!
//! Templates are served as stored; rendering happens in the browser. A
//! missing template is an ordinary outcome (`Lookup::NotFound`), and the
//! router decides what that means for each route.

use std::io::ErrorKind;
use std::path::PathBuf;

use axum::http::StatusCode;
use tracing::warn;

/// Result of looking up a template by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    NotFound,
}

/// Templates stored as files in one directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Look up `name` (e.g. `board.html`, `state.js`).
    ///
    /// Only plain file names are accepted; anything that could leave the
    /// template directory is `NotFound`.
    pub async fn lookup(&self, name: &str) -> Lookup {
        if !is_plain_name(name) {
            return Lookup::NotFound;
        }
        match tokio::fs::read_to_string(self.dir.join(name)).await {
            Ok(content) => Lookup::Found(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Lookup::NotFound,
            Err(e) => {
                warn!("Template {name} unreadable: {e}");
                Lookup::NotFound
            }
        }
    }

    /// Page for an error status: `<code>.html` if present, otherwise a
    /// minimal built-in page.
    pub async fn error_page(&self, status: StatusCode) -> String {
        match self.lookup(&format!("{}.html", status.as_u16())).await {
            Lookup::Found(page) => page,
            Lookup::NotFound => builtin_error_page(status),
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

fn builtin_error_page(status: StatusCode) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html><head><title>{code} {reason}</title></head>\
         <body><h1>{code} {reason}</h1></body></html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, TemplateStore) {
        let dir = tempfile::TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let store = TemplateStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn finds_existing_template() {
        let (_dir, store) = store_with(&[("state.js", "export {};")]);
        assert_eq!(store.lookup("state.js").await, Lookup::Found("export {};".into()));
    }

    #[tokio::test]
    async fn missing_template_is_not_found() {
        let (_dir, store) = store_with(&[]);
        assert_eq!(store.lookup("nope.js").await, Lookup::NotFound);
    }

    #[tokio::test]
    async fn rejects_names_escaping_the_directory() {
        let (dir, store) = store_with(&[("index.html", "hi")]);
        std::fs::write(dir.path().join(".hidden"), "secret").unwrap();

        assert_eq!(store.lookup("../index.html").await, Lookup::NotFound);
        assert_eq!(store.lookup("sub/index.html").await, Lookup::NotFound);
        assert_eq!(store.lookup(".hidden").await, Lookup::NotFound);
        assert_eq!(store.lookup("").await, Lookup::NotFound);
    }

    #[tokio::test]
    async fn error_page_prefers_template() {
        let (_dir, store) = store_with(&[("404.html", "<p>lost</p>")]);
        assert_eq!(store.error_page(StatusCode::NOT_FOUND).await, "<p>lost</p>");

        let fallback = store.error_page(StatusCode::BAD_GATEWAY).await;
        assert!(fallback.contains("502 Bad Gateway"));
    }
}
