//! Integration tests for the HTML tree builder.

use wren_dom::{NodeId, NodeTree, NodeType};
use wren_html::{IssueKind, Parser, format_tree, parse};

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &NodeTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(from)
        .find(|&id| tree.tag_name(id) == Some(tag))
}

/// Helper to describe the children of a node as tag names or quoted text.
fn child_summary(tree: &NodeTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&child| match &tree.get(child).expect("child exists").node_type {
            NodeType::Element(data) => data.tag_name.clone(),
            NodeType::Text(text) => format!("{text:?}"),
        })
        .collect()
}

/// Count text nodes anywhere in the tree.
fn text_node_count(tree: &NodeTree) -> usize {
    tree.descendants(NodeId::ROOT)
        .filter(|&id| tree.as_text(id).is_some())
        .count()
}

#[test]
fn test_plain_text_gets_html_body() {
    let tree = parse("Hello World");

    assert_eq!(tree.tag_name(NodeId::ROOT), Some("html"));
    assert_eq!(child_summary(&tree, NodeId::ROOT), vec!["body"]);
    let body = tree.body().expect("body exists");
    assert_eq!(child_summary(&tree, body), vec!["\"Hello World\""]);
}

#[test]
fn test_empty_and_whitespace_input() {
    for input in ["", "   ", "\n\t \n"] {
        let tree = parse(input);
        assert_eq!(tree.tag_name(NodeId::ROOT), Some("html"), "input {input:?}");
        assert!(tree.body().is_some());
        assert_eq!(text_node_count(&tree), 0, "input {input:?}");
    }
}

#[test]
fn test_whitespace_between_tags_is_dropped() {
    let tree = parse("<html>\n  <body>\n    <p> hi </p>\n  </body>\n</html>\n");
    assert_eq!(text_node_count(&tree), 1);
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p exists");
    assert_eq!(tree.text_content(p), " hi ");
}

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head><title>T</title></head><body>x</body></html>");

    assert_eq!(child_summary(&tree, NodeId::ROOT), vec!["head", "body"]);
    let head = find_element(&tree, NodeId::ROOT, "head").expect("head exists");
    assert_eq!(child_summary(&tree, head), vec!["title"]);
}

#[test]
fn test_head_tags_open_implicit_head() {
    let tree = parse("<title>Page</title><p>Body text");
    assert_eq!(child_summary(&tree, NodeId::ROOT), vec!["head", "body"]);
    let title = find_element(&tree, NodeId::ROOT, "title").expect("title exists");
    assert_eq!(tree.text_content(title), "Page");
    let body = tree.body().expect("body exists");
    assert_eq!(child_summary(&tree, body), vec!["p"]);
}

#[test]
fn test_comments_are_dropped() {
    let tree = parse("<!-- note --><p>a</p><!doctype html>");
    let body = tree.body().expect("body exists");
    assert_eq!(child_summary(&tree, body), vec!["p"]);
}

#[test]
fn test_div_closes_open_paragraph() {
    let tree = parse("<p>a<div>b</div>c</p>");
    let body = tree.body().expect("body exists");

    assert_eq!(child_summary(&tree, body), vec!["p", "div", "\"c\""]);
    let p = find_element(&tree, body, "p").expect("p exists");
    let div = find_element(&tree, body, "div").expect("div exists");
    assert_eq!(child_summary(&tree, p), vec!["\"a\""]);
    assert_eq!(child_summary(&tree, div), vec!["\"b\""]);
    assert_eq!(tree.parent(div), Some(body));
}

#[test]
fn test_list_items_close_each_other() {
    let tree = parse("<li>a<li>b");
    let body = tree.body().expect("body exists");

    assert_eq!(child_summary(&tree, body), vec!["li", "li"]);
    let items = tree.children(body);
    assert_eq!(tree.text_content(items[0]), "a");
    assert_eq!(tree.text_content(items[1]), "b");
}

#[test]
fn test_nested_list_item_inside_other_element_is_not_closed() {
    let tree = parse("<li>a<b>x<li>y</b></li>");
    let b = find_element(&tree, NodeId::ROOT, "b").expect("b exists");
    assert_eq!(child_summary(&tree, b), vec!["\"x\"", "li"]);
}

#[test]
fn test_paragraph_not_closed_by_inline_tags() {
    let tree = parse("<p>a<b>b</b><i>c</i></p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p exists");
    assert_eq!(child_summary(&tree, p), vec!["\"a\"", "b", "i"]);
}

#[test]
fn test_self_closing_tags_have_no_children() {
    let tree = parse("<p>one<br>two<img src=\"x\">three<br/>four</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p exists");

    assert_eq!(
        child_summary(&tree, p),
        vec!["\"one\"", "br", "\"two\"", "img", "\"three\"", "br", "\"four\""]
    );
    for id in tree.descendants(NodeId::ROOT) {
        if matches!(tree.tag_name(id), Some("br" | "img")) {
            assert!(tree.children(id).is_empty());
        }
    }
    let img = find_element(&tree, p, "img").expect("img exists");
    assert_eq!(tree.as_element(img).and_then(|e| e.attrs.get("src")), Some("x"));
}

#[test]
fn test_attributes_on_elements() {
    let tree = parse("<h1 CLASS='title' id=\"x\" disabled>Hi</h1>");
    let h1 = find_element(&tree, NodeId::ROOT, "h1").expect("h1 exists");
    let data = tree.as_element(h1).expect("h1 is an element");
    assert_eq!(data.attrs.get("class"), Some("title"));
    assert_eq!(data.attrs.get("id"), Some("x"));
    assert_eq!(data.attrs.get("disabled"), Some(""));
}

#[test]
fn test_tag_names_are_case_insensitive() {
    let tree = parse("<P>a<DIV>b</div>");
    let body = tree.body().expect("body exists");
    assert_eq!(child_summary(&tree, body), vec!["p", "div"]);
}

#[test]
fn test_closing_mismatched_inner_element_closes_target() {
    let tree = parse("<div><span>x</div>after");
    let body = tree.body().expect("body exists");
    // `</div>` closes both the stray span and the div.
    assert_eq!(child_summary(&tree, body), vec!["div", "\"after\""]);
}

#[test]
fn test_nested_same_tag_closes_both_levels() {
    let tree = parse("<div><div>x</div>y");
    let body = tree.body().expect("body exists");
    let outer = tree.children(body)[0];
    assert_eq!(child_summary(&tree, outer), vec!["div"]);
    assert_eq!(child_summary(&tree, body), vec!["div", "\"y\""]);
}

#[test]
fn test_close_after_doubled_close_ends_body() {
    // Both divs close at the first `</div>`, so the second one closes body
    // and `z` opens a fresh one.
    let tree = parse("<div><div>x</div>y</div>z");
    assert_eq!(child_summary(&tree, NodeId::ROOT), vec!["body", "body"]);
    let bodies = tree.children(NodeId::ROOT);
    assert_eq!(child_summary(&tree, bodies[0]), vec!["div", "\"y\""]);
    assert_eq!(child_summary(&tree, bodies[1]), vec!["\"z\""]);
}

#[test]
fn test_excess_closing_tags_are_ignored() {
    let (tree, issues) = Parser::new().run_with_issues("<html>a</html></html></html>".chars());
    assert_eq!(tree.tag_name(NodeId::ROOT), Some("html"));
    assert_eq!(
        issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::ExcessClosingTag)
            .count(),
        2
    );
}

#[test]
fn test_unclosed_elements_are_closed_at_end() {
    let tree = parse("<b><i>deep");
    let i = find_element(&tree, NodeId::ROOT, "i").expect("i exists");
    let ancestors: Vec<&str> = tree
        .ancestors(i)
        .filter_map(|id| tree.tag_name(id))
        .collect();
    assert_eq!(ancestors, vec!["b", "body", "html"]);
}

#[test]
fn test_text_keeps_character_references() {
    let tree = parse("a &amp; b");
    assert_eq!(tree.text_content(NodeId::ROOT), "a &amp; b");
}

#[test]
fn test_issues_record_implicit_and_auto_closed() {
    let (_, issues) = Parser::new().run_with_issues("<p>a<p>b".chars());
    let kinds: Vec<IssueKind> = issues.iter().map(|issue| issue.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::ImplicitTag,
            IssueKind::ImplicitTag,
            IssueKind::AutoClosed
        ]
    );
    assert_eq!(issues[2].offset, 7);
}

#[test]
fn test_parser_accepts_any_char_stream() {
    let chunks = ["<p>", "stream", "ed</p>"];
    let tree = Parser::new().run(chunks.iter().flat_map(|chunk| chunk.chars()));
    assert_eq!(tree.text_content(NodeId::ROOT), "streamed");
}

#[test]
fn test_format_tree() {
    let tree = parse("<p class=x>a b</p>");
    let outline = format_tree(&tree, NodeId::ROOT);
    assert_eq!(
        outline,
        "<html>\n  <body>\n    <p class=\"x\">\n      \"a\u{00B7}b\"\n"
    );
}
