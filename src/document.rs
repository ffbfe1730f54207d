use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// Errors produced while turning bytes into a document tree (or back)
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The payload is not a well-formed document: bad JSON, an unknown `type`,
    /// or a known `type` with missing/mistyped fields
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The tree nests deeper than [`MAX_DEPTH`] node levels
    #[error("malformed document: nesting depth {depth} exceeds {max}")]
    TooDeep { depth: usize, max: usize },
}

/// Deepest tree, in node levels (a lone node is 1), that encodes and decodes.
///
/// Each container level costs the JSON parser two nesting levels (object and
/// `items` array) against serde_json's limit of 127, so 63 is the most that
/// parses whatever the shape of the bottom level.
pub const MAX_DEPTH: usize = 63;

/// Locally generated node identity.
///
/// Identifiers are never carried on the wire: every decode mints fresh ones,
/// so two decodes of the same bytes yield different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Mint a new, never-reused identifier
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::fresh()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The four node tags, as they appear in the `type` field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Page,
    Section,
    Text,
    Image,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Page => "page",
            NodeKind::Section => "section",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of the document tree.
///
/// The `type` discriminator is read first and selects the variant; the kind of
/// a node is therefore always the kind of its variant. Equality is structural
/// and ignores [`NodeId`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Page(Page),
    Section(Section),
    Text(Text),
    Image(Image),
}

/// A navigable unit of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(skip)]
    pub id: NodeId,
    pub title: String,
    /// Children in reading order
    pub items: Vec<Node>,
}

/// A grouping of nodes that is never navigated to on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(skip)]
    pub id: NodeId,
    pub title: String,
    pub items: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    #[serde(skip)]
    pub id: NodeId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(skip)]
    pub id: NodeId,
    pub title: String,
    pub src: Url,
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.items == other.items
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.items == other.items
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.src == other.src
    }
}

impl Page {
    pub fn new(title: impl Into<String>, items: Vec<Node>) -> Self {
        Self {
            id: NodeId::fresh(),
            title: title.into(),
            items,
        }
    }
}

impl Node {
    pub fn page(title: impl Into<String>, items: Vec<Node>) -> Self {
        Node::Page(Page::new(title, items))
    }

    pub fn section(title: impl Into<String>, items: Vec<Node>) -> Self {
        Node::Section(Section {
            id: NodeId::fresh(),
            title: title.into(),
            items,
        })
    }

    pub fn text(title: impl Into<String>) -> Self {
        Node::Text(Text {
            id: NodeId::fresh(),
            title: title.into(),
        })
    }

    pub fn image(title: impl Into<String>, src: Url) -> Self {
        Node::Image(Image {
            id: NodeId::fresh(),
            title: title.into(),
            src,
        })
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Page(page) => page.id,
            Node::Section(section) => section.id,
            Node::Text(text) => text.id,
            Node::Image(image) => image.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Page(_) => NodeKind::Page,
            Node::Section(_) => NodeKind::Section,
            Node::Text(_) => NodeKind::Text,
            Node::Image(_) => NodeKind::Image,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Node::Page(page) => &page.title,
            Node::Section(section) => &section.title,
            Node::Text(text) => &text.title,
            Node::Image(image) => &image.title,
        }
    }

    /// Children of a container node; empty for leaves
    pub fn items(&self) -> &[Node] {
        match self {
            Node::Page(page) => &page.items,
            Node::Section(section) => &section.items,
            Node::Text(_) | Node::Image(_) => &[],
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, Node::Page(_))
    }

    /// Number of node levels in the tree rooted here
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.items().iter().map(|child| (child, level + 1)));
        }
        deepest
    }
}

fn check_depth(node: &Node) -> Result<(), DocumentError> {
    let depth = node.depth();
    if depth > MAX_DEPTH {
        return Err(DocumentError::TooDeep {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

/// Decode a document tree from a JSON payload
pub fn decode(bytes: &[u8]) -> Result<Node, DocumentError> {
    let node = serde_json::from_slice(bytes)?;
    check_depth(&node)?;
    Ok(node)
}

/// Encode a document tree to a JSON payload. Node ids are not written.
///
/// Trees deeper than [`MAX_DEPTH`] are refused, so everything this writes
/// decodes again.
pub fn encode(node: &Node) -> Result<Vec<u8>, DocumentError> {
    check_depth(node)?;
    let bytes = serde_json::to_vec(node)?;
    Ok(bytes)
}
