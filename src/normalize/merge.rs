//! Pass 5: Fragmented-tag merging
//!
//! Word processors split one styled run into many elements whenever the
//! cursor paused:
//! ```html
//! <em>Hel</em><em>lo</em> <em>World</em>
//! ```
//! After merging we get `<em>Hello World</em>`.

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;

/// Inline tags whose fragments get merged, in processing order.
const MERGE_TAGS: &[&str] = &["em", "span"];

/// Merge runs of same-tag, same-class siblings.
///
/// Siblings belong to one run when they are directly adjacent or separated
/// only by whitespace text. The whitespace is kept inside the merged
/// element.
///
/// Returns the number of elements merged away.
pub fn merge_fragmented_tags(dom: &mut ArenaDom, root: ArenaNodeId) -> Result<usize> {
    let mut containers: Vec<ArenaNodeId> = Vec::new();
    for id in dom.descendants(root) {
        if MERGE_TAGS.iter().any(|tag| dom.tag_is(id, tag))
            && let Some(parent) = dom.parent(id)
            && !containers.contains(&parent)
        {
            containers.push(parent);
        }
    }

    let mut merged = 0;
    for container in containers {
        for tag in MERGE_TAGS {
            for run in sibling_runs(dom, container, tag) {
                merged += merge_run(dom, &run);
            }
        }
    }
    Ok(merged)
}

/// Maximal runs (length > 1) of mergeable `tag` children of `container`.
fn sibling_runs(dom: &ArenaDom, container: ArenaNodeId, tag: &str) -> Vec<Vec<ArenaNodeId>> {
    let mut runs = Vec::new();
    let mut current: Vec<ArenaNodeId> = Vec::new();

    for id in dom.element_children(container) {
        if !dom.tag_is(id, tag) {
            continue;
        }
        let joins = current
            .last()
            .is_some_and(|&last| class_of(dom, last) == class_of(dom, id) && follows(dom, last, id));
        if !joins {
            if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
        }
        current.push(id);
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

fn class_of(dom: &ArenaDom, id: ArenaNodeId) -> &str {
    dom.get_attr(id, "class").unwrap_or("")
}

/// `next` comes right after `prev`, or after one whitespace-only text node.
fn follows(dom: &ArenaDom, prev: ArenaNodeId, next: ArenaNodeId) -> bool {
    match dom.next_sibling(prev) {
        Some(id) if id == next => true,
        Some(id) => dom.is_blank_text(id) && dom.next_sibling(id) == Some(next),
        None => false,
    }
}

fn merge_run(dom: &mut ArenaDom, run: &[ArenaNodeId]) -> usize {
    let Some((&first, rest)) = run.split_first() else {
        return 0;
    };
    for &tag in rest {
        if let Some(gap) = dom.prev_sibling(tag)
            && gap != first
            && dom.is_blank_text(gap)
        {
            dom.append(first, gap);
        }
        dom.move_children(tag, first);
        dom.detach(tag);
    }
    rest.len()
}
