/// Placeholder grammar — template tokenizing and fill resolution.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::core::selector::Selector;

/// A recognized placeholder. Declaration order is resolution order: text
/// spliced in for one kind may only contain kinds declared after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlaceholderKind {
    Tag,
    Times,
    Value,
    Duration,
    Percent,
}

impl PlaceholderKind {
    pub const RESOLUTION_ORDER: [PlaceholderKind; 5] = [
        PlaceholderKind::Tag,
        PlaceholderKind::Times,
        PlaceholderKind::Value,
        PlaceholderKind::Duration,
        PlaceholderKind::Percent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tag => "Tag",
            Self::Times => "Times",
            Self::Value => "Value",
            Self::Duration => "Duration",
            Self::Percent => "Percent",
        }
    }

    pub fn from_name(name: &str) -> Option<PlaceholderKind> {
        Self::RESOLUTION_ORDER
            .into_iter()
            .find(|kind| kind.name() == name)
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is. Unrecognized `{...}` tokens live here.
    Literal(String),
    /// A recognized placeholder such as `{Tag}`.
    Placeholder(PlaceholderKind),
}

/// A parsed template — a sequence of segments with adjacent literals merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse a template string into literal and placeholder segments.
    ///
    /// Only exact `{Tag}`, `{Times}`, `{Value}`, `{Duration}` and
    /// `{Percent}` tokens are placeholders. Anything else brace-shaped,
    /// including stray or unclosed braces, stays literal text.
    pub fn parse(input: &str) -> Template {
        let mut template = Template::default();
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let token = after.find('}').and_then(|close| {
                PlaceholderKind::from_name(&after[..close]).map(|kind| (kind, close))
            });
            match token {
                Some((kind, close)) => {
                    template.push_literal(&rest[..open]);
                    template.segments.push(TemplateSegment::Placeholder(kind));
                    rest = &after[close + 1..];
                }
                None => {
                    template.push_literal(&rest[..=open]);
                    rest = after;
                }
            }
        }
        template.push_literal(rest);
        template
    }

    /// Placeholders still present, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = PlaceholderKind> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            TemplateSegment::Placeholder(kind) => Some(*kind),
            TemplateSegment::Literal(_) => None,
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Join the segments back into text. Placeholders render as their token.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Placeholder(kind) => {
                    out.push('{');
                    out.push_str(kind.name());
                    out.push('}');
                }
            }
        }
        out
    }

    fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(TemplateSegment::Literal(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(TemplateSegment::Literal(text.to_string()));
        }
    }

    fn push(&mut self, segment: TemplateSegment) {
        match segment {
            TemplateSegment::Literal(text) => self.push_literal(&text),
            placeholder => self.segments.push(placeholder),
        }
    }

    fn append(&mut self, other: Template) {
        for segment in other.segments {
            self.push(segment);
        }
    }
}

/// Text produced for one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub text: String,
    /// Drop the standalone "as" that follows the placeholder.
    pub strip_as: bool,
}

impl Fill {
    pub fn text(text: impl Into<String>) -> Fill {
        Fill {
            text: text.into(),
            strip_as: false,
        }
    }
}

/// Resolve every placeholder in `input` using `fill`.
///
/// Runs one pass per kind in `PlaceholderKind::RESOLUTION_ORDER`, filling
/// left to right. `fill` receives the kind and, for values, whether the
/// template reads "{Value} as ...". Fill text is tokenized and spliced in,
/// so it may introduce placeholders of later kinds. Whitespace in the
/// result is collapsed and trimmed.
pub fn resolve_with<F>(input: &str, mut fill: F) -> String
where
    F: FnMut(PlaceholderKind, bool) -> Fill,
{
    let mut template = Template::parse(input);
    for kind in PlaceholderKind::RESOLUTION_ORDER {
        template = fill_pass(template, kind, &mut fill);
    }
    if !template.is_resolved() {
        warn!(text = %template.render(), "placeholders left after resolution");
    }
    normalize_whitespace(&template.render())
}

fn fill_pass<F>(template: Template, kind: PlaceholderKind, fill: &mut F) -> Template
where
    F: FnMut(PlaceholderKind, bool) -> Fill,
{
    let mut out = Template::default();
    let mut strip_next_as = false;
    let mut segments = template.segments.into_iter().peekable();

    while let Some(segment) = segments.next() {
        match segment {
            TemplateSegment::Placeholder(found) if found == kind => {
                let as_flag = kind == PlaceholderKind::Value
                    && matches!(
                        segments.peek(),
                        Some(TemplateSegment::Literal(next)) if leading_as(next).is_some()
                    );
                let filled = fill(kind, as_flag);
                strip_next_as = as_flag && filled.strip_as;
                out.append(Template::parse(&filled.text));
            }
            TemplateSegment::Literal(text) if strip_next_as => {
                strip_next_as = false;
                out.push_literal(&strip_leading_as(&text));
            }
            other => out.push(other),
        }
    }
    out
}

/// Byte offset of a leading standalone "as" (after whitespace) that is
/// itself followed by whitespace.
fn leading_as(text: &str) -> Option<usize> {
    let trimmed = text.trim_start();
    let word = trimmed.get(..2)?;
    let followed_by_space = trimmed[2..].starts_with(char::is_whitespace);
    if word.eq_ignore_ascii_case("as") && followed_by_space {
        Some(text.len() - trimmed.len())
    } else {
        None
    }
}

fn strip_leading_as(text: &str) -> String {
    match leading_as(text) {
        Some(at) => format!("{}{}", &text[..at], text[at + 2..].trim_start()),
        None => text.to_string(),
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fills placeholders from the weighted selectors.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    selector: Selector<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(selector: Selector<'a>) -> Self {
        Self { selector }
    }

    pub fn resolve(&self, input: &str, rng: &mut StdRng) -> String {
        resolve_with(input, |kind, as_flag| self.fill(kind, as_flag, rng))
    }

    fn fill(&self, kind: PlaceholderKind, as_flag: bool, rng: &mut StdRng) -> Fill {
        match kind {
            PlaceholderKind::Tag => Fill::text(self.selector.tag(rng).text),
            PlaceholderKind::Times => Fill::text(self.selector.times(rng).render()),
            PlaceholderKind::Value => {
                let pick = self.selector.value(rng, as_flag);
                Fill {
                    text: pick.text,
                    strip_as: pick.strip_as,
                }
            }
            PlaceholderKind::Duration => Fill::text(self.selector.duration(rng).render()),
            PlaceholderKind::Percent => Fill::text(format!("{}%", self.selector.percent(rng))),
        }
    }
}
