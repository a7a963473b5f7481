// Tree construction: one pass over the token stream, driven by a single
// mutable insertion point. A simplified cousin of the WHATWG tree
// construction algorithm: ancestor-scoped end-tag matching, implied end
// tags for list/paragraph-style elements, void elements that never
// become the insertion point. There is no error path; unmatched end
// tags and unknown declarations are absorbed.

use super::tokenizer::{TagToken, Token, Tokenizer};
use crate::dom::{Dom, NodeId, NodeType};

/// Debug logging for tree construction
const DEBUG_TREE_BUILDER: bool = false;

fn tree_builder_log(msg: &str) {
    if DEBUG_TREE_BUILDER {
        eprintln!("[TREE_BUILDER] {}", msg);
    }
}

/// Tags that can never contain children; the insertion point does not
/// descend into them.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Open ancestors with these tags are auto-closed when a tag from
/// `GENERATE_IMPLIED_END_TAGS` opens.
pub const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// Opening one of these triggers the implied-end-tag walk. Same set as
/// above plus `dl`, which closes an open entry without being closable
/// itself.
pub const GENERATE_IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "dl",
];

pub struct HtmlParser {
    tokenizer: Tokenizer,
    /// Buffer folding a maximal run of character tokens into one text
    /// node.
    pending_text: String,
}

impl HtmlParser {
    pub fn new(input: &str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            pending_text: String::new(),
        }
    }

    fn flush_pending_text(&mut self, dom: &mut Dom, parent: NodeId) {
        if !self.pending_text.is_empty() {
            tree_builder_log(&format!("Flushing text: {:?}", self.pending_text));
            dom.create_text(&self.pending_text, Some(parent));
            self.pending_text.clear();
        }
    }

    pub fn parse(mut self) -> Dom {
        let mut dom = Dom::new();
        let root = dom.create_element("", vec![], None);
        let mut insertion_point = root;

        while let Some(token) = self.tokenizer.next() {
            tree_builder_log(&format!("Token: {:?}", token));
            match token {
                Token::Character(ch) => {
                    self.pending_text.push(ch);
                }
                Token::Doctype { .. } => {
                    // Structurally ignored; everything renders as html5.
                    self.flush_pending_text(&mut dom, insertion_point);
                }
                Token::Tag(tag) => {
                    self.flush_pending_text(&mut dom, insertion_point);
                    if tag.closing {
                        insertion_point = close_tag(&dom, insertion_point, &tag.name);
                    } else {
                        insertion_point = open_tag(&mut dom, insertion_point, tag);
                    }
                }
            }
        }
        self.flush_pending_text(&mut dom, insertion_point);

        dom
    }
}

/// Walk the ancestor chain for the first element matching `name`; the
/// insertion point moves to its parent. No match leaves it unchanged
/// (the end tag is silently dropped).
fn close_tag(dom: &Dom, insertion_point: NodeId, name: &str) -> NodeId {
    let mut current = Some(insertion_point);
    while let Some(id) = current {
        let node = &dom.nodes[id];
        if let NodeType::Element(el) = &node.node_type {
            if el.tag_name == name {
                if let Some(parent) = node.parent {
                    return parent;
                }
                break;
            }
        }
        current = node.parent;
    }
    tree_builder_log(&format!("Unmatched end tag dropped: {:?}", name));
    insertion_point
}

fn open_tag(dom: &mut Dom, mut insertion_point: NodeId, tag: TagToken) -> NodeId {
    if GENERATE_IMPLIED_END_TAGS.contains(&tag.name.as_str()) {
        // Auto-close the nearest open ancestor that takes an implied
        // end tag, if any.
        let mut current = Some(insertion_point);
        while let Some(id) = current {
            let node = &dom.nodes[id];
            if let NodeType::Element(el) = &node.node_type {
                if IMPLIED_END_TAGS.contains(&el.tag_name.as_str()) {
                    if let Some(parent) = node.parent {
                        insertion_point = parent;
                    }
                    break;
                }
            }
            current = node.parent;
        }
    }

    let id = dom.create_element(&tag.name, tag.attributes, Some(insertion_point));
    if VOID_TAGS.contains(&tag.name.as_str()) {
        insertion_point
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::collapse_whitespace;

    fn child_tags(dom: &Dom, id: NodeId) -> Vec<String> {
        dom.nodes[id]
            .children
            .iter()
            .map(|&c| match &dom.nodes[c].node_type {
                NodeType::Element(el) => format!("<{}>", el.tag_name),
                NodeType::Text(text) => format!("{:?}", text),
            })
            .collect()
    }

    fn parse(input: &str) -> Dom {
        HtmlParser::new(input).parse()
    }

    #[test]
    fn simple_paragraph() {
        let dom = parse("<p>a</p>");
        let root = dom.root();
        assert_eq!(dom.nodes[root].children.len(), 1);
        let p = dom.nodes[root].children[0];
        assert_eq!(dom.tag_name(p), "p");
        assert_eq!(dom.nodes[p].children.len(), 1);
        let text = dom.nodes[p].children[0];
        match &dom.nodes[text].node_type {
            NodeType::Text(raw) => assert_eq!(collapse_whitespace(raw), "a"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn implied_end_tag_makes_siblings() {
        let dom = parse("<p>one<p>two");
        let root = dom.root();
        assert_eq!(child_tags(&dom, root), vec!["<p>", "<p>"]);
        let second = dom.nodes[root].children[1];
        assert_eq!(child_tags(&dom, second), vec!["\"two\""]);
    }

    #[test]
    fn list_items_do_not_nest() {
        let dom = parse("<ul><li>a<li>b<li>c</ul>");
        let root = dom.root();
        let ul = dom.nodes[root].children[0];
        assert_eq!(child_tags(&dom, ul), vec!["<li>", "<li>", "<li>"]);
    }

    #[test]
    fn dl_closes_open_entries_but_not_itself() {
        let dom = parse("<dl><dt>term<dd>def</dl>");
        let root = dom.root();
        let dl = dom.nodes[root].children[0];
        assert_eq!(dom.tag_name(dl), "dl");
        assert_eq!(child_tags(&dom, dl), vec!["<dt>", "<dd>"]);
    }

    #[test]
    fn opening_dl_closes_an_open_paragraph() {
        let dom = parse("<p>intro<dl><dt>t</dl>");
        let root = dom.root();
        assert_eq!(child_tags(&dom, root), vec!["<p>", "<dl>"]);
    }

    #[test]
    fn void_tags_never_become_the_insertion_point() {
        let dom = parse("<p>a<br>b</p>");
        let root = dom.root();
        let p = dom.nodes[root].children[0];
        assert_eq!(child_tags(&dom, p), vec!["\"a\"", "<br>", "\"b\""]);
        let br = dom.nodes[p].children[1];
        assert!(dom.nodes[br].children.is_empty());
    }

    #[test]
    fn markup_after_img_attaches_to_enclosing_element() {
        let dom = parse("<p><img src=\"x\"><a>link</a></p>");
        let root = dom.root();
        let p = dom.nodes[root].children[0];
        assert_eq!(child_tags(&dom, p), vec!["<img>", "<a>"]);
        let img = dom.nodes[p].children[0];
        assert_eq!(dom.element(img).unwrap().attribute("src"), Some("x"));
    }

    #[test]
    fn duplicate_attribute_last_value_wins() {
        let dom = parse("<a href=\"1\" href=\"2\">x</a>");
        let root = dom.root();
        let a = dom.nodes[root].children[0];
        assert_eq!(dom.element(a).unwrap().attribute("href"), Some("2"));
    }

    #[test]
    fn unmatched_end_tag_is_dropped() {
        let dom = parse("<p>a</div>b");
        let root = dom.root();
        assert_eq!(child_tags(&dom, root), vec!["<p>"]);
        let p = dom.nodes[root].children[0];
        // The stray </div> closes nothing; "b" still lands inside <p>,
        // in a second text node because a tag token split the run.
        assert_eq!(child_tags(&dom, p), vec!["\"a\"", "\"b\""]);
    }

    #[test]
    fn end_tag_closes_through_inline_descendants() {
        let dom = parse("<p>a<b>c</p>after");
        let root = dom.root();
        // </p> climbs past the still-open <b> to close the paragraph.
        assert_eq!(child_tags(&dom, root), vec!["<p>", "\"after\""]);
    }

    #[test]
    fn text_nodes_keep_raw_whitespace() {
        let dom = parse("<p>a \n\t b</p>");
        let root = dom.root();
        let p = dom.nodes[root].children[0];
        let text = dom.nodes[p].children[0];
        match &dom.nodes[text].node_type {
            NodeType::Text(raw) => {
                assert_eq!(raw, "a \n\t b");
                assert_eq!(collapse_whitespace(raw), "a b");
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn doctype_is_structurally_ignored() {
        let dom = parse("<!DOCTYPE html><p>x</p>");
        let root = dom.root();
        assert_eq!(child_tags(&dom, root), vec!["<p>"]);
    }

    #[test]
    fn serializes_back_to_indented_markup() {
        let dom = parse("<p>hi <a href=\"#\">there</a></p>");
        assert_eq!(
            dom.to_markup(),
            "<p>\n  hi \n  <a href=\"#\">\n    there\n  </a>\n</p>"
        );
    }
}
