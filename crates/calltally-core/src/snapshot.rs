//! A [`PageReader`] over saved HTML.
//!
//! Locators are resolved the way `document.evaluate` resolves an absolute
//! path with `FIRST_ORDERED_NODE_TYPE`: unpredicated steps match every
//! same-tag child and the first hit in document order wins.

use crate::locator::{Locator, Step};
use crate::page::{PageReader, Row};
use crate::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::path::Path;

pub struct HtmlSnapshot {
    // Kept as source text: the parsed tree is not Send.
    source: String,
}

impl HtmlSnapshot {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading HTML snapshot from: {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Ok(Self::new(source))
    }

    fn find_text_after(&self, locator: &Locator) -> Option<String> {
        let document = Html::parse_document(&self.source);
        let element = locate(&document, locator)?;

        let sibling = element.next_sibling()?;
        let text = match sibling.value() {
            Node::Text(text) => text.to_string(),
            Node::Element(_) => ElementRef::wrap(sibling)?.text().collect(),
            Node::Comment(comment) => comment.to_string(),
            _ => return None,
        };

        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn find_table_rows(&self, locator: &Locator) -> Option<Vec<Row>> {
        let document = Html::parse_document(&self.source);
        let table = locate(&document, locator)?;

        let row_selector = selector("tbody tr");
        let cell_selector = selector("td");

        let rows = table
            .select(&row_selector)
            .map(|tr| {
                tr.select(&cell_selector)
                    .map(|td| td.text().collect::<String>().trim().to_string())
                    .collect()
            })
            .collect();
        Some(rows)
    }
}

#[async_trait]
impl PageReader for HtmlSnapshot {
    async fn text_after(&self, locator: &Locator) -> Result<Option<String>> {
        Ok(self.find_text_after(locator))
    }

    async fn table_rows(&self, locator: &Locator) -> Result<Option<Vec<Row>>> {
        Ok(self.find_table_rows(locator))
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn locate<'a>(document: &'a Html, locator: &Locator) -> Option<ElementRef<'a>> {
    let (first, rest) = locator.steps().split_first()?;
    let root = document.root_element();

    if root.value().name() != first.tag || first.position.is_some_and(|p| p != 1) {
        return None;
    }
    descend(root, rest)
}

fn descend<'a>(element: ElementRef<'a>, steps: &[Step]) -> Option<ElementRef<'a>> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(element);
    };

    let mut candidates = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == step.tag);

    match step.position {
        Some(position) => descend(candidates.nth(position - 1)?, rest),
        None => candidates.find_map(|child| descend(child, rest)),
    }
}
