// Block generation: walk the document tree with an explicit LIFO stack
// (no recursion), group text into the block established by the nearest
// block-level ancestor, and inherit visual properties through a small
// per-node render context. A post-pass trims whitespace at block edges
// and drops empty runs and blocks.

use crate::dom::{collapse_whitespace, Dom, NodeId, NodeType};
use crate::parser::html::scanner::is_space_char;
use crate::style::{style_of, Color, Display, FontWeight, Style};

/// Inheritable properties carried down the tree; `None` means "not set
/// by any ancestor", letting the paint stage apply its defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RenderCtx {
    size: Option<f32>,
    color: Option<Color>,
    weight: Option<FontWeight>,
    underline: Option<bool>,
}

/// A contiguous span of normalized text with one resolved set of
/// inherited visual properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRun {
    pub text: String,
    pub size: Option<f32>,
    pub color: Option<Color>,
    pub weight: Option<FontWeight>,
    pub underline: bool,
    /// Element the owning text node hangs off; used for block
    /// continuity checks.
    pub owner: NodeId,
}

/// One block-level element and the runs that belong to it, before
/// line-wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub element: NodeId,
    pub style: Style,
    pub runs: Vec<RenderRun>,
}

impl Block {
    fn new(dom: &Dom, element: NodeId) -> Self {
        Self {
            element,
            style: *style_of(dom.tag_name(element)),
            runs: Vec::new(),
        }
    }
}

pub struct LayoutEngine;

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Produce the ordered block sequence for the subtree at `root`
    /// (conventionally the body element). Rerunning on an unmodified
    /// tree yields an identical sequence.
    pub fn generate_blocks(&self, dom: &Dom, root: NodeId) -> Vec<Block> {
        let mut blocks = vec![Block::new(dom, root)];
        let mut stack: Vec<(NodeId, RenderCtx)> = vec![(root, RenderCtx::default())];

        while let Some((id, ctx)) = stack.pop() {
            // Popping out of a closed subtree: restart accumulation in
            // a block rooted at this node's parent.
            let current_block = blocks.last().expect("seeded with one block").element;
            if !dom.has_ancestor(id, current_block) {
                if let Some(parent) = dom.nodes[id].parent {
                    blocks.push(Block::new(dom, parent));
                }
            }

            match &dom.nodes[id].node_type {
                NodeType::Element(el) => {
                    let style = style_of(&el.tag_name);
                    match style.display {
                        Display::None => continue,
                        Display::Block => blocks.push(Block {
                            element: id,
                            style: *style,
                            runs: Vec::new(),
                        }),
                        Display::Inline => {}
                    }

                    let mut child_ctx = ctx;
                    if let Some(size) = style.font_size {
                        child_ctx.size = Some(size);
                    }
                    if let Some(color) = style.color {
                        child_ctx.color = Some(color);
                    }
                    if let Some(decoration) = style.text_decoration {
                        child_ctx.underline = Some(decoration.contains("underline"));
                    }
                    if let Some(weight) = style.font_weight {
                        child_ctx.weight = Some(weight);
                    }

                    // Reverse push so children pop left-to-right.
                    for &child in dom.nodes[id].children.iter().rev() {
                        stack.push((child, child_ctx));
                    }
                }
                NodeType::Text(text) => {
                    let block = blocks.last_mut().expect("seeded with one block");
                    block.runs.push(RenderRun {
                        text: collapse_whitespace(text),
                        size: ctx.size,
                        color: ctx.color,
                        weight: ctx.weight,
                        underline: ctx.underline.unwrap_or(false),
                        owner: dom.nodes[id].parent.unwrap_or(id),
                    });
                }
            }
        }

        trim_blocks(&mut blocks);
        blocks
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip whitespace at block edges: leading whitespace goes wherever
/// the previous visible character was whitespace (or the block just
/// started), trailing whitespace is stripped from the back until a run
/// keeps text. Runs left empty and blocks left without runs are
/// dropped.
fn trim_blocks(blocks: &mut Vec<Block>) {
    for block in blocks.iter_mut() {
        let mut strip_leading = true;
        for run in block.runs.iter_mut() {
            if strip_leading {
                run.text = run.text.trim_start_matches(is_space_char).to_string();
            }
            match run.text.chars().last() {
                None => {} // empty run: previous state carries over
                Some(last) => strip_leading = is_space_char(last),
            }
        }

        for run in block.runs.iter_mut().rev() {
            run.text = run.text.trim_end_matches(is_space_char).to_string();
            if !run.text.is_empty() {
                break;
            }
        }

        block.runs.retain(|run| !run.text.is_empty());
    }

    blocks.retain(|block| !block.runs.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::tree_builder::HtmlParser;
    use crate::style::BLUE;

    fn layout(input: &str) -> (Dom, Vec<Block>) {
        let dom = HtmlParser::new(input).parse();
        let blocks = LayoutEngine::new().generate_blocks(&dom, dom.root());
        (dom, blocks)
    }

    fn texts(block: &Block) -> Vec<&str> {
        block.runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn single_paragraph_single_block() {
        let (dom, blocks) = layout("<p>hello world</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(dom.tag_name(blocks[0].element), "p");
        assert_eq!(texts(&blocks[0]), vec!["hello world"]);
    }

    #[test]
    fn block_trimming_keeps_one_block_with_clean_edges() {
        let (_, blocks) = layout("<p>  hi  <b>  there  </b>  </p>");
        assert_eq!(blocks.len(), 1);
        let joined: String = blocks[0].runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "hi there");
        assert!(blocks[0].runs.iter().all(|r| !r.text.is_empty()));
        assert_eq!(blocks[0].runs[1].weight, Some(FontWeight::Bold));
    }

    #[test]
    fn style_inheritance_reaches_nested_text() {
        let (_, blocks) = layout("<p><a>link</a></p>");
        assert_eq!(blocks.len(), 1);
        let run = &blocks[0].runs[0];
        assert_eq!(run.text, "link");
        assert_eq!(run.color, Some(BLUE));
        assert!(run.underline);
        // <p> set neither; nothing else leaks in.
        assert_eq!(run.size, None);
        assert_eq!(run.weight, None);
    }

    #[test]
    fn heading_size_inherits_into_inline_children() {
        let (_, blocks) = layout("<h1>big <a>link</a></h1>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].runs[0].size, Some(32.0));
        assert_eq!(blocks[0].runs[0].weight, Some(FontWeight::Bold));
        // The anchor inherits the heading size and adds its own color.
        assert_eq!(blocks[0].runs[1].size, Some(32.0));
        assert_eq!(blocks[0].runs[1].color, Some(BLUE));
    }

    #[test]
    fn display_none_skips_the_subtree() {
        let (_, blocks) = layout("<title>Pelican Facts</title><p>body</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(texts(&blocks[0]), vec!["body"]);
    }

    #[test]
    fn sibling_paragraphs_become_two_blocks() {
        let (dom, blocks) = layout("<p>one<p>two");
        assert_eq!(blocks.len(), 2);
        assert_eq!(dom.tag_name(blocks[0].element), "p");
        assert_eq!(texts(&blocks[0]), vec!["one"]);
        assert_eq!(texts(&blocks[1]), vec!["two"]);
    }

    #[test]
    fn text_after_closed_block_regroups_under_its_parent() {
        let (dom, blocks) = layout("<p>before<dl><dt>entry</dl>after");
        // <dl> implies </p>, so "after" belongs to the root, and the
        // continuity check opens a fresh block for it there.
        assert_eq!(blocks.len(), 3);
        assert_eq!(texts(&blocks[0]), vec!["before"]);
        assert_eq!(dom.tag_name(blocks[1].element), "dt");
        assert_eq!(texts(&blocks[1]), vec!["entry"]);
        assert_eq!(texts(&blocks[2]), vec!["after"]);
        assert_eq!(dom.tag_name(blocks[2].element), "");
    }

    #[test]
    fn whitespace_only_blocks_are_dropped() {
        let (_, blocks) = layout("<p>   \n\t </p><p>kept</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(texts(&blocks[0]), vec!["kept"]);
    }

    #[test]
    fn layout_is_idempotent() {
        let dom = HtmlParser::new("<h1>Title</h1><p>a <a>b</a> c</p><dl><dt>x<dd>y</dl>").parse();
        let engine = LayoutEngine::new();
        let first = engine.generate_blocks(&dom, dom.root());
        let second = engine.generate_blocks(&dom, dom.root());
        assert_eq!(first, second);
    }

    #[test]
    fn runs_record_their_owning_element() {
        let (dom, blocks) = layout("<p>plain <a>linked</a></p>");
        let p = blocks[0].element;
        assert_eq!(dom.tag_name(p), "p");
        assert_eq!(blocks[0].runs[0].owner, p);
        assert_eq!(dom.tag_name(blocks[0].runs[1].owner), "a");
    }
}
