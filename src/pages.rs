use crate::document::{Node, Page, Section};

/// Flatten a document tree into the ordered list of pages used for
/// sequential navigation.
///
/// Nested pages are lifted out of their parent: a page is emitted with its
/// nested pages stripped from `items`, followed by the extraction of each of
/// its items in order. Sections never appear themselves but contribute the
/// pages beneath them; text and image nodes contribute nothing.
///
/// Stripping reaches through sections, so a page held by a section inside
/// another page is shown once, as its own entry. A page keeps its id when it
/// is stripped.
pub fn pages(node: &Node) -> Vec<Page> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect(node: &Node, out: &mut Vec<Page>) {
    match node {
        Node::Page(page) => {
            out.push(stripped(page));
            for item in &page.items {
                collect(item, out);
            }
        }
        Node::Section(section) => {
            for item in &section.items {
                collect(item, out);
            }
        }
        Node::Text(_) | Node::Image(_) => {}
    }
}

/// Copy of `page` with every nested page removed from its content
fn stripped(page: &Page) -> Page {
    Page {
        id: page.id,
        title: page.title.clone(),
        items: without_pages(&page.items),
    }
}

fn without_pages(items: &[Node]) -> Vec<Node> {
    items
        .iter()
        .filter_map(|item| match item {
            Node::Page(_) => None,
            Node::Section(section) => Some(Node::Section(Section {
                id: section.id,
                title: section.title.clone(),
                items: without_pages(&section.items),
            })),
            Node::Text(_) | Node::Image(_) => Some(item.clone()),
        })
        .collect()
}
