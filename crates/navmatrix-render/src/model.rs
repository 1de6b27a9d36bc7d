//! In-memory drawable tree produced by the layout and consumed by the SVG writer.
//!
//! All lengths are pixels. A group's `translate` offsets its children; nothing else is relative.

use navmatrix_core::Rgb;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub font_family: String,
    /// Painter's order: header, matrix, floating legend.
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Group(Group),
    Rect(Rect),
    Text(Text),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub class: Option<String>,
    pub id: Option<String>,
    pub translate: (f64, f64),
    pub style: Option<String>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Rgb>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub rx: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A text block. `(x, y)` is the anchor point of the block's vertical center; lines are spaced
/// `line_height` apart around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub class: Option<String>,
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
    pub font_size: f64,
    pub line_height: f64,
    pub anchor: TextAnchor,
    pub fill: Rgb,
    pub bold: bool,
}

impl Group {
    pub fn new(class: &str) -> Self {
        Self {
            class: Some(class.to_string()),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.children.push(element.into());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class)
    }

    /// Direct child groups carrying `class`.
    pub fn groups<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Group> + 'a {
        self.children.iter().filter_map(move |e| match e {
            Element::Group(g) if g.has_class(class) => Some(g),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.children.iter().filter_map(|e| match e {
            Element::Rect(r) => Some(r),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.children.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }
}

impl Canvas {
    /// Top-level groups carrying `class`.
    pub fn groups<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Group> + 'a {
        self.children.iter().filter_map(move |e| match e {
            Element::Group(g) if g.has_class(class) => Some(g),
            _ => None,
        })
    }

    pub fn group<'a>(&'a self, class: &'a str) -> Option<&'a Group> {
        self.groups(class).next()
    }
}

impl From<Group> for Element {
    fn from(value: Group) -> Self {
        Element::Group(value)
    }
}

impl From<Rect> for Element {
    fn from(value: Rect) -> Self {
        Element::Rect(value)
    }
}

impl From<Text> for Element {
    fn from(value: Text) -> Self {
        Element::Text(value)
    }
}
