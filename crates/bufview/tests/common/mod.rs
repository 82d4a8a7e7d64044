#![allow(dead_code)]

use core::fmt::Write as _;

use bufview::{Buffer, ViewId};

pub const HEADERS: &str = "Content-Length: 42\r\nX-Retry: -3\r\nX-Ratio: 0.25e1\r\nX-Name: \"caf\u{e9}\"\r\n\r\nbody";

/// One line per view: `id start..position..end shifted=n`.
pub fn render_tree(buf: &Buffer<'_>) -> String {
    let mut out = String::new();
    let mut ids: Vec<ViewId> = buf.view_ids().collect();
    ids.sort();
    for (n, id) in ids.iter().enumerate() {
        let info = buf.info(*id).expect("live view");
        let parent = info
            .parent
            .and_then(|p| ids.iter().position(|i| *i == p))
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        writeln!(
            out,
            "view {n} parent={parent} {}..{}..{} shifted={}",
            info.start, info.position, info.end, info.shifted
        )
        .unwrap();
    }
    out
}
