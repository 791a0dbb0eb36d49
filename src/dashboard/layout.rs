//! Render tree
//!
//! The page is described as an immutable tree of `Node`s, rebuilt from the
//! current selection and panel on every dispatch and rendered to HTML. There
//! is no diffing: the output region is replaced wholesale.

use super::rules::{year_disabled, Panel};
use super::selection::{year_options, ReportType, SelectionState};
use crate::chart::render_svg;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Browser tab title
pub const PAGE_TITLE: &str = "Automobile Statistics Dashboard";

/// Heading shown at the top of the page
pub const HEADING: &str = "Automobile Sales Statistics Dashboard";

const VOID_TAGS: [&str; 3] = ["meta", "br", "input"];

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1120px; }
h1 { text-align: center; color: #503D36; font-size: 24px; }
.controls { display: flex; flex-direction: column; gap: 8px; padding: 3px; }
.controls select { width: 80%; padding: 3px; font-size: 20px; text-align-last: center; }
.chart-grid { padding: 10px; }
.chart-item { display: flex; gap: 10px; }
.message { margin: 20px; }
"#;

/// Connects to the session channel and patches the output region in place.
/// Without JavaScript the form falls back to a plain GET submit.
const SCRIPT: &str = r#"
(function () {
  if (!window.WebSocket) { return; }
  var form = document.getElementById('controls');
  var reportType = document.getElementById('dropdown-statistics');
  var year = document.getElementById('select-year');
  var output = document.getElementById('output-container');
  var scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  var ws = new WebSocket(scheme + location.host + '/ws');

  function send(type, value) {
    if (ws.readyState === WebSocket.OPEN) {
      ws.send(JSON.stringify({ type: type, value: value }));
    }
  }
  function reportValue() { return reportType.value === '' ? null : reportType.value; }
  function yearValue() { return year.value === '' ? null : parseInt(year.value, 10); }

  ws.onopen = function () {
    send('select_report_type', reportValue());
    send('select_year', yearValue());
  };
  ws.onmessage = function (event) {
    var msg = JSON.parse(event.data);
    if (msg.type === 'year_disabled') { year.disabled = msg.disabled; }
    else if (msg.type === 'panel') { output.innerHTML = msg.html; }
    else if (msg.type === 'error') { console.warn(msg.message); }
  };
  form.addEventListener('submit', function (event) {
    if (ws.readyState === WebSocket.OPEN) { event.preventDefault(); }
  });
  reportType.addEventListener('change', function () { send('select_report_type', reportValue()); });
  year.addEventListener('change', function () { send('select_year', yearValue()); });
})();
"#;

/// A node of the render tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Node>,
    },
    /// Text content, escaped on render
    Text(String),
    /// Trusted markup (generated SVG, inline style and script)
    Raw(String),
}

impl Node {
    /// Create an empty element
    pub fn el(tag: &'static str) -> Self {
        Node::Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Builder method: add an attribute
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    /// Builder method: add a boolean attribute when `on` is set
    pub fn flag(self, name: &'static str, on: bool) -> Self {
        if on {
            self.attr(name, "")
        } else {
            self
        }
    }

    /// Builder method: append a child
    pub fn child(mut self, node: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Builder method: append several children
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// Find the first element with the given `id` attribute
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        match self {
            Node::Element { attrs, children, .. } => {
                if attrs.iter().any(|(k, v)| *k == "id" && v == id) {
                    return Some(self);
                }
                children.iter().find_map(|c| c.find_by_id(id))
            }
            _ => None,
        }
    }

    /// Render to HTML
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&encode_text(text)),
            Node::Raw(markup) => out.push_str(markup),
            Node::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');

                if VOID_TAGS.contains(tag) {
                    return;
                }

                for child in children {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn option(value: &str, label: &str, selected: bool) -> Node {
    Node::el("option")
        .attr("value", value)
        .flag("selected", selected)
        .child(Node::text(label))
}

/// Report-type dropdown with its placeholder
pub fn report_type_dropdown(selected: Option<ReportType>) -> Node {
    Node::el("select")
        .attr("id", "dropdown-statistics")
        .attr("name", "report_type")
        .child(option("", "Select a report type", selected.is_none()))
        .children(
            ReportType::ALL
                .into_iter()
                .map(|r| option(r.value(), r.value(), selected == Some(r))),
        )
}

/// Year dropdown, 1980 through 2023
pub fn year_dropdown(selected: Option<i32>, disabled: bool) -> Node {
    Node::el("select")
        .attr("id", "select-year")
        .attr("name", "year")
        .flag("disabled", disabled)
        .child(option("", "Select year", selected.is_none()))
        .children(year_options().map(|y| {
            let value = y.to_string();
            option(&value, &value, selected == Some(y))
        }))
}

/// Children of the output region for a panel
pub fn panel_nodes(panel: &Panel) -> Vec<Node> {
    match panel {
        Panel::Message { text } => vec![Node::el("div")
            .attr("class", "message")
            .child(Node::text(text.as_str()))],
        Panel::Charts { rows } => rows
            .iter()
            .map(|row| {
                Node::el("div").attr("class", "chart-item").children(row.iter().map(|spec| {
                    Node::el("div")
                        .attr("class", "chart")
                        .child(Node::Raw(render_svg(spec)))
                }))
            })
            .collect(),
    }
}

/// The output region, filled with a panel
pub fn output_region(panel: &Panel) -> Node {
    Node::el("div")
        .attr("id", "output-container")
        .attr("class", "chart-grid")
        .children(panel_nodes(panel))
}

/// HTML of the output region's children, as pushed to live sessions
pub fn panel_html(panel: &Panel) -> String {
    panel_nodes(panel).iter().map(Node::render).collect()
}

/// The full page for a selection
pub fn page(state: &SelectionState, panel: &Panel) -> Node {
    let controls = Node::el("form")
        .attr("id", "controls")
        .attr("class", "controls")
        .attr("method", "get")
        .attr("action", "/")
        .child(
            Node::el("label")
                .attr("for", "dropdown-statistics")
                .child(Node::text("Select Statistics:")),
        )
        .child(report_type_dropdown(state.report_type))
        .child(year_dropdown(state.year, year_disabled(state.report_type)))
        .child(
            Node::el("noscript").child(
                Node::el("button")
                    .attr("type", "submit")
                    .child(Node::text("Show")),
            ),
        );

    let head = Node::el("head")
        .child(Node::el("meta").attr("charset", "utf-8"))
        .child(Node::el("title").child(Node::text(PAGE_TITLE)))
        .child(Node::el("style").child(Node::Raw(STYLE.to_string())));

    let body = Node::el("body")
        .child(Node::el("h1").child(Node::text(HEADING)))
        .child(controls)
        .child(output_region(panel))
        .child(Node::el("script").child(Node::Raw(SCRIPT.to_string())));

    Node::el("html").attr("lang", "en").child(head).child(body)
}

/// Render the full page as an HTML document
pub fn render_document(state: &SelectionState, panel: &Panel) -> String {
    format!("<!DOCTYPE html>{}", page(state, panel).render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::rules::{chart_panel, CHOOSE_REPORT_PROMPT};
    use crate::dataset::{Dataset, Month, Record};

    fn count_options(node: &Node) -> usize {
        match node {
            Node::Element { tag, children, .. } => {
                let own = usize::from(*tag == "option");
                own + children.iter().map(count_options).sum::<usize>()
            }
            _ => 0,
        }
    }

    #[test]
    fn test_year_dropdown_has_placeholder_and_44_years() {
        let dropdown = year_dropdown(None, true);
        assert_eq!(count_options(&dropdown), 45);

        let html = dropdown.render();
        assert!(html.contains(r#"<option value="1980">1980</option>"#));
        assert!(html.contains(r#"<option value="2023">2023</option>"#));
        assert!(html.contains(r#"disabled="""#));
    }

    #[test]
    fn test_report_dropdown_marks_selection() {
        let html = report_type_dropdown(Some(ReportType::Recession)).render();
        assert!(html.contains(
            r#"<option value="Recession Period Statistics" selected="">Recession Period Statistics</option>"#
        ));
        assert!(html.contains(r#"<option value="">Select a report type</option>"#));
    }

    #[test]
    fn test_page_structure() {
        let state = SelectionState::new();
        let panel = Panel::message(CHOOSE_REPORT_PROMPT);
        let tree = page(&state, &panel);

        assert!(tree.find_by_id("dropdown-statistics").is_some());
        assert!(tree.find_by_id("select-year").is_some());
        let output = tree.find_by_id("output-container").unwrap();
        assert!(output.render().contains(CHOOSE_REPORT_PROMPT));

        let html = render_document(&state, &panel);
        assert!(html.starts_with("<!DOCTYPE html><html"));
        assert!(html.contains(HEADING));
        assert!(html.contains(r#"<meta charset="utf-8">"#));
        assert!(!html.contains("</meta>"));
    }

    #[test]
    fn test_year_enabled_for_yearly_state() {
        let html = year_dropdown(Some(1990), false).render();
        assert!(!html.contains("disabled"));
        assert!(html.contains(r#"<option value="1990" selected="">1990</option>"#));
    }

    #[test]
    fn test_charts_render_as_two_rows() {
        let jan = Month::new(1).unwrap();
        let dataset = Dataset::new(vec![Record::new(1980, jan, true, "Sports", 1.0, 2.0, 3.0)]);
        let panel = chart_panel(&dataset, &SelectionState::recession());

        let nodes = panel_nodes(&panel);
        assert_eq!(nodes.len(), 2);
        let html = panel_html(&panel);
        assert_eq!(html.matches("<svg").count(), 4);
        assert_eq!(html.matches(r#"class="chart-item""#).count(), 2);
    }

    #[test]
    fn test_text_is_escaped() {
        let html = Node::el("div").child(Node::text("<b>&</b>")).render();
        assert_eq!(html, "<div>&lt;b&gt;&amp;&lt;/b&gt;</div>");
    }

    #[test]
    fn test_attribute_is_escaped() {
        let html = Node::el("option").attr("value", r#"a"b"#).render();
        assert_eq!(html, r#"<option value="a&quot;b"></option>"#);
    }
}
