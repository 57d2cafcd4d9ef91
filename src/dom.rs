//! Generic traversal over parsed document trees
//!
//! Two traversals cover everything the pipeline needs from a page:
//! [`find_all`] locates nodes by a caller-supplied predicate, decoupling
//! "what counts as the content block" from the traversal machinery, and
//! [`flatten`] dumps the raw text under a subtree. Both are depth-first
//! pre-order and deterministic: a node is visited before its children, and
//! children are visited in document order.

use ego_tree::NodeRef;
use scraper::Node;

/// Collect every node under `root` (root included) that satisfies
/// `predicate`, in depth-first pre-order
///
/// Each node's own match precedes its descendants' matches, which precede
/// its later siblings' matches.
pub fn find_all<'a, P>(root: NodeRef<'a, Node>, predicate: &P) -> Vec<NodeRef<'a, Node>>
where
    P: Fn(NodeRef<'a, Node>) -> bool,
{
    let mut matches = Vec::new();
    collect_matches(root, predicate, &mut matches);
    matches
}

fn collect_matches<'a, P>(
    node: NodeRef<'a, Node>,
    predicate: &P,
    matches: &mut Vec<NodeRef<'a, Node>>,
) where
    P: Fn(NodeRef<'a, Node>) -> bool,
{
    if predicate(node) {
        matches.push(node);
    }
    for child in node.children() {
        collect_matches(child, predicate, matches);
    }
}

/// Concatenate the textual payload of every non-element node under `root`,
/// in depth-first pre-order
///
/// Element nodes contribute no text themselves; only their descendants do.
/// Text and comment nodes carry payloads; structural nodes (document,
/// fragment, doctype) contribute nothing.
pub fn flatten(root: NodeRef<'_, Node>) -> String {
    let mut contents = String::new();
    append_text(root, &mut contents);
    contents
}

fn append_text(node: NodeRef<'_, Node>, contents: &mut String) {
    match node.value() {
        Node::Text(text) => contents.push_str(&text.text),
        Node::Comment(comment) => contents.push_str(&comment.comment),
        _ => {}
    }
    for child in node.children() {
        append_text(child, contents);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scraper::Html;

    fn element_named(name: &'static str) -> impl Fn(NodeRef<'_, Node>) -> bool {
        move |node: NodeRef<'_, Node>| node.value().as_element().is_some_and(|e| e.name() == name)
    }

    #[test]
    fn test_find_all_returns_only_matching_nodes() {
        let html = Html::parse_document("<div><p>a</p><span>b</span><p>c</p></div>");
        let matches = find_all(html.tree.root(), &element_named("p"));
        assert_eq!(matches.len(), 2);
        for node in &matches {
            assert_eq!(node.value().as_element().unwrap().name(), "p");
        }
    }

    #[test]
    fn test_find_all_preorder_parent_before_children() {
        let html = Html::parse_document("<div id=\"outer\"><div id=\"inner\"></div></div>");
        let matches = find_all(html.tree.root(), &element_named("div"));
        assert_eq!(matches.len(), 2);
        let ids: Vec<&str> = matches
            .iter()
            .map(|n| n.value().as_element().unwrap().attr("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["outer", "inner"]);
    }

    #[test]
    fn test_find_all_document_order_across_siblings() {
        let html = Html::parse_document(
            "<ul><li id=\"1\"><b></b></li><li id=\"2\"></li><li id=\"3\"></li></ul>",
        );
        let matches = find_all(html.tree.root(), &element_named("li"));
        let ids: Vec<&str> = matches
            .iter()
            .map(|n| n.value().as_element().unwrap().attr("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_find_all_root_tested_first() {
        let html = Html::parse_document("<p>x</p>");
        let matches = find_all(html.tree.root(), &|node: NodeRef<'_, Node>| {
            matches!(node.value(), Node::Document)
        });
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id(), html.tree.root().id());
    }

    #[test]
    fn test_find_all_no_matches_is_empty() {
        let html = Html::parse_document("<div></div>");
        let matches = find_all(html.tree.root(), &element_named("video"));
        assert!(matches.is_empty());
    }

    #[test]
    fn test_flatten_concatenates_text_in_order() {
        let html = Html::parse_document("<pre>Hello<b> cruel</b> World</pre>");
        let pre = find_all(html.tree.root(), &element_named("pre"))[0];
        assert_eq!(flatten(pre), "Hello cruel World");
    }

    #[test]
    fn test_flatten_elements_contribute_no_bytes() {
        let html = Html::parse_document("<pre><b></b><i></i></pre>");
        let pre = find_all(html.tree.root(), &element_named("pre"))[0];
        assert_eq!(flatten(pre), "");
    }

    #[test]
    fn test_flatten_nested_descendants() {
        let html = Html::parse_document("<pre>a<b>b<i>c</i>d</b>e</pre>");
        let pre = find_all(html.tree.root(), &element_named("pre"))[0];
        assert_eq!(flatten(pre), "abcde");
    }

    #[test]
    fn test_flatten_includes_comment_payload() {
        let html = Html::parse_document("<pre>a<!-- aside -->b</pre>");
        let pre = find_all(html.tree.root(), &element_named("pre"))[0];
        assert_eq!(flatten(pre), "a aside b");
    }

    #[test]
    fn test_flatten_single_text_node() {
        let html = Html::parse_document("<pre>Hello World</pre>");
        let pre = find_all(html.tree.root(), &element_named("pre"))[0];
        assert_eq!(flatten(pre), "Hello World");
    }
}
