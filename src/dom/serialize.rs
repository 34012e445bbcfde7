//! HTML serialization for arena nodes.
//!
//! Arena nodes implement html5ever's [`Serialize`] so the output follows the
//! fragment serialization algorithm browsers use for `innerHTML`/`outerHTML`.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::{QualName, local_name};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A node handle html5ever can serialize.
pub struct SerializableNode<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => write_node(self.dom, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => write_children(self.dom, self.id, serializer),
        }
    }
}

fn write_children<S: Serializer>(dom: &ArenaDom, id: ArenaNodeId, serializer: &mut S) -> io::Result<()> {
    for child in dom.children(id) {
        write_node(dom, child, serializer)?;
    }
    Ok(())
}

fn write_node<S: Serializer>(dom: &ArenaDom, id: ArenaNodeId, serializer: &mut S) -> io::Result<()> {
    let Some(node) = dom.get(id) else {
        return Ok(());
    };

    match &node.data {
        ArenaNodeData::Element { name, attrs } => {
            serializer.start_elem(
                name.clone(),
                attrs.iter().map(|attr| (&attr.name, attr.value.as_str())),
            )?;
            // The parser drops one newline right after these start tags
            if drops_leading_newline(name)
                && dom
                    .children(id)
                    .next()
                    .and_then(|first| dom.text(first))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                serializer.write_text("\n")?;
            }
            write_children(dom, id, serializer)?;
            serializer.end_elem(name.clone())
        }
        ArenaNodeData::Text(text) => serializer.write_text(text),
        ArenaNodeData::Comment(text) => serializer.write_comment(text),
        ArenaNodeData::Doctype { name, .. } => serializer.write_doctype(name),
        ArenaNodeData::Document => write_children(dom, id, serializer),
    }
}

fn drops_leading_newline(name: &QualName) -> bool {
    matches!(
        name.local,
        local_name!("pre") | local_name!("textarea") | local_name!("listing")
    )
}

fn to_html(dom: &ArenaDom, id: ArenaNodeId, traversal_scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    if let Err(err) = serialize(&mut bytes, &SerializableNode::new(dom, id), opts) {
        log::warn!("HTML serialization failed: {err}");
    }
    String::from_utf8(bytes).unwrap_or_default()
}

/// Serialize a node including its own tags.
pub fn outer_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    to_html(dom, id, TraversalScope::IncludeNode)
}

/// Serialize the children of a node.
///
/// The node's own name is handed to the serializer so text inside raw text
/// elements (`<style>`, `<script>`, …) stays unescaped.
pub fn inner_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let parent = match dom.get(id).map(|node| &node.data) {
        Some(ArenaNodeData::Element { name, .. }) => Some(name.clone()),
        _ => None,
    };
    to_html(dom, id, TraversalScope::ChildrenOnly(parent))
}
