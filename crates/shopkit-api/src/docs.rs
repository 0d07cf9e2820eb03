//! The bundled API documentation.
//!
//! A fixed table of files compiled into the binary, built on first use and
//! never modified. Served under `/swagger/` when `server.enable_docs` is on.

use std::collections::HashMap;
use std::sync::LazyLock;

/// One bundled file.
#[derive(Debug, Clone, Copy)]
pub struct DocAsset {
    pub content_type: &'static str,
    pub body: &'static str,
}

/// File served for `/swagger/`.
pub const INDEX: &str = "index.html";

static ASSETS: LazyLock<HashMap<&'static str, DocAsset>> = LazyLock::new(|| {
    HashMap::from([
        (
            INDEX,
            DocAsset {
                content_type: "text/html; charset=utf-8",
                body: include_str!("../docs/index.html"),
            },
        ),
        (
            "openapi.yaml",
            DocAsset {
                content_type: "application/yaml",
                body: include_str!("../docs/openapi.yaml"),
            },
        ),
    ])
});

/// Looks up a bundled file by its path below `/swagger/`.
pub fn asset(path: &str) -> Option<DocAsset> {
    let path = path.trim_start_matches('/');
    let path = if path.is_empty() { INDEX } else { path };
    ASSETS.get(path).copied()
}

/// Paths of every bundled file, sorted.
pub fn paths() -> Vec<&'static str> {
    let mut paths: Vec<_> = ASSETS.keys().copied().collect();
    paths.sort_unstable();
    paths
}
