use crate::metrics::{Matching, Metric};
use crate::{Error, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap as Map;
use tracing::debug;

/// Elements whose text may hold a metric label.
const LABEL_ELEMENTS: [&str; 3] = ["tr", "td", "span"];

/// Element holding the value that follows a label.
const VALUE_ELEMENT: &str = "td";

/// Strategy for reading one metric out of a parsed page.
pub trait Extract: Send + Sync {
    /// Return the raw text for `metric`, or `None` if the page does not carry it.
    fn extract(&self, page: &Html, metric: &Metric) -> Option<String>;
}

/// Finds the first label element (`tr`, `td` or `span`, in document order) whose sole text
/// matches the metric name, then reads the text of the next `td` after it.
///
/// An element's "sole text" is the text of its only child, descending through elements that
/// also have a single child; elements with several children never match.
#[derive(Debug, Default)]
pub struct LabelCell {
    patterns: Map<String, Regex>,
}

impl LabelCell {
    /// Compile the patterns of every [`Matching::Pattern`] metric up front.
    pub fn new(metrics: &[Metric]) -> Result<Self> {
        let mut patterns = Map::new();
        for metric in metrics {
            if metric.matching == Matching::Pattern && !patterns.contains_key(&metric.name) {
                let regex = Regex::new(&metric.name).map_err(|source| Error::Pattern {
                    metric: metric.name.clone(),
                    source,
                })?;
                patterns.insert(metric.name.clone(), regex);
            }
        }
        Ok(Self { patterns })
    }
}

impl Extract for LabelCell {
    fn extract(&self, page: &Html, metric: &Metric) -> Option<String> {
        // metrics this extractor was not built with are compiled on the spot
        let compiled;
        let pattern = match metric.matching {
            Matching::Exact => None,
            Matching::Pattern => match self.patterns.get(&metric.name) {
                Some(regex) => Some(regex),
                None => match Regex::new(&metric.name) {
                    Ok(regex) => {
                        compiled = regex;
                        Some(&compiled)
                    }
                    Err(err) => {
                        debug!("invalid pattern for ({}), error({err})", metric.name);
                        return None;
                    }
                },
            },
        };
        let is_match = |text: &str| match pattern {
            Some(regex) => regex.is_match(text),
            None => text == metric.name,
        };

        let nodes: Vec<_> = page.tree.root().descendants().collect();

        let label = nodes.iter().position(|node| {
            matches!(node.value(), Node::Element(el) if LABEL_ELEMENTS.contains(&el.name()))
                && sole_text(*node).is_some_and(|text| is_match(text))
        })?;

        let cell = nodes[label + 1..]
            .iter()
            .filter_map(|node| ElementRef::wrap(*node))
            .find(|el| el.value().name() == VALUE_ELEMENT)?;

        Some(cell.text().collect())
    }
}

fn sole_text<'a>(node: ego_tree::NodeRef<'a, Node>) -> Option<&'a str> {
    let mut children = node.children();
    let child = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match child.value() {
        Node::Text(text) => Some(&**text),
        Node::Element(_) => sole_text(child),
        _ => None,
    }
}
