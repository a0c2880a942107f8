//! ASCII-art rendering (§4.2 "Visual render").
//!
//! Each subtree renders to a `Box` — a set of text lines, its width, and
//! the column its root label is centered on — and boxes merge bottom-up
//! with `_` horizontal connectors and `/`/`\` diagonals, mirroring how a
//! pretty-printer would build up a tree diagram by hand.

use std::fmt::Display;

use crate::core::TreeCore;
use crate::node::ChildSlot;

/// Toggles for whether explicit-null, undefined (empty), and NIL-sentinel
/// positions are rendered (marked `N`, `U`, `S` respectively).
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualOptions {
    pub show_null: bool,
    pub show_undefined: bool,
    pub show_nil: bool,
}

struct Box_ {
    lines: Vec<String>,
    width: usize,
    middle: usize,
}

fn leaf_box(label: &str) -> Box_ {
    Box_ {
        lines: vec![label.to_string()],
        width: label.len(),
        middle: label.len() / 2,
    }
}

fn pad(s: &str, width: usize) -> String {
    let mut s = s.to_string();
    while s.len() < width {
        s.push(' ');
    }
    s
}

/// Merges a label with optional left/right subtree boxes into one box.
fn merge(label: &str, left: Option<Box_>, right: Option<Box_>) -> Box_ {
    match (left, right) {
        (None, None) => leaf_box(label),
        (Some(l), None) => {
            let gap = 1;
            let middle = l.width + gap + label.len() / 2;
            let width = l.width + gap + label.len();
            let connector = format!("{}{}", " ".repeat(l.middle), "/");
            let mut lines = vec![pad(&format!("{}{}", " ".repeat(l.width + gap), label), width)];
            lines.push(pad(&connector, width));
            for line in l.lines {
                lines.push(pad(&line, width));
            }
            Box_ { lines, width, middle }
        }
        (None, Some(r)) => {
            let gap = 1;
            let label_start = 0;
            let middle = label.len() / 2;
            let width = label.len() + gap + r.width;
            let mut lines = vec![pad(&format!("{}{}", " ".repeat(label_start), label), width)];
            lines.push(pad(&format!("{}{}", " ".repeat(label.len() + gap + r.middle), "\\"), width));
            for line in r.lines {
                lines.push(pad(&format!("{}{}", " ".repeat(label.len() + gap), line), width));
            }
            Box_ { lines, width, middle }
        }
        (Some(l), Some(r)) => {
            let gap = 1;
            let label_col = l.width + gap;
            let middle = label_col + label.len() / 2;
            let width = l.width + gap + label.len() + gap + r.width;

            let mut header = " ".repeat(label_col);
            header.push_str(label);
            let header = pad(&header, width);

            let mut connectors = " ".repeat(l.middle);
            connectors.push('/');
            while connectors.len() < label_col + label.len() {
                connectors.push('_');
            }
            connectors.push('\\');
            let connectors = pad(&connectors, width);

            let height = l.lines.len().max(r.lines.len());
            let mut body = Vec::with_capacity(height);
            for i in 0..height {
                let left_line = l.lines.get(i).map(String::as_str).unwrap_or("");
                let right_line = r.lines.get(i).map(String::as_str).unwrap_or("");
                let row = format!(
                    "{}{}{}",
                    pad(left_line, l.width),
                    " ".repeat(gap + label.len() + gap),
                    pad(right_line, r.width)
                );
                body.push(pad(&row, width));
            }

            let mut lines = vec![header, connectors];
            lines.extend(body);
            Box_ { lines, width, middle }
        }
    }
}

fn render_subtree<K: Display, V>(
    core: &TreeCore<K, V>,
    slot: ChildSlot,
    opts: VisualOptions,
) -> Option<Box_> {
    match slot {
        ChildSlot::Present(id) => {
            let node = core.node(id);
            let left = render_subtree(core, node.left, opts);
            let right = render_subtree(core, node.right, opts);
            Some(merge(&node.key.to_string(), left, right))
        }
        ChildSlot::ExplicitNull if opts.show_null => Some(leaf_box("N")),
        ChildSlot::Empty if opts.show_undefined => Some(leaf_box("U")),
        _ => None,
    }
}

pub(crate) fn render<K: Display, V>(core: &TreeCore<K, V>) -> String {
    render_with_options(core, VisualOptions::default())
}

pub(crate) fn render_with_options<K: Display, V>(core: &TreeCore<K, V>, opts: VisualOptions) -> String {
    match core.root_id() {
        None => String::from("(empty)"),
        Some(root) => render_subtree(core, ChildSlot::Present(root), opts)
            .map(|b| b.lines.join("\n"))
            .unwrap_or_default(),
    }
}
