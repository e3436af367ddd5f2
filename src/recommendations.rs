//! Splits free-form recommendation text into titled display sections.
//!
//! Headings are recognized heuristically: a line that starts with one of the
//! category keywords (case-insensitive), optionally followed by `s` and `:`.
//! A structured upstream response would make this unnecessary.

pub const PERSONALIZED_ADVICE_TITLE: &str = "Personalized Advice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    PersonalizedAdvice,
    NaturalRemedies,
    ConventionalTreatments,
    Routine,
}

impl SectionKind {
    const HEADED: [SectionKind; 3] = [
        SectionKind::NaturalRemedies,
        SectionKind::ConventionalTreatments,
        SectionKind::Routine,
    ];

    /// Keywords in priority order. The first one found as a heading wins.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionKind::PersonalizedAdvice => &[],
            SectionKind::NaturalRemedies => &["natural remedies"],
            SectionKind::ConventionalTreatments => &["conventional treatments", "medical advice"],
            SectionKind::Routine => &["morning routine", "evening routine", "daily routine"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationSection {
    pub kind: SectionKind,
    pub title: String,
    pub content: String,
}

/// A display line inside a section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLine<'a> {
    Bullet(&'a str),
    Blank,
    Paragraph(&'a str),
}

#[derive(Debug, Clone, Copy)]
struct Heading {
    kind: SectionKind,
    /// Byte offset of the line start.
    start: usize,
    /// Byte offset just past the matched heading text.
    end: usize,
}

/// Parse recommendation text into sections.
///
/// Output order: leading advice (text before the first heading), then
/// natural remedies, conventional treatments and routine. Each body runs up
/// to the next recognized heading, so the headings' order in the text does
/// not matter. Sections with blank bodies are dropped.
pub fn parse_recommendations(text: &str) -> Vec<RecommendationSection> {
    let mut headings: Vec<Heading> = SectionKind::HEADED
        .iter()
        .filter_map(|&kind| find_heading(text, kind))
        .collect();
    headings.sort_by_key(|h| h.start);

    let mut sections = Vec::new();

    let preface_end = headings.first().map_or(text.len(), |h| h.start);
    let preface = text[..preface_end].trim();
    if !preface.is_empty() {
        sections.push(RecommendationSection {
            kind: SectionKind::PersonalizedAdvice,
            title: PERSONALIZED_ADVICE_TITLE.to_string(),
            content: preface.to_string(),
        });
    }

    for kind in SectionKind::HEADED {
        let Some(position) = headings.iter().position(|h| h.kind == kind) else {
            continue;
        };
        let heading = headings[position];
        let body_end = headings
            .get(position + 1)
            .map_or(text.len(), |next| next.start);
        let content = text[heading.end..body_end].trim();
        if content.is_empty() {
            continue;
        }
        sections.push(RecommendationSection {
            kind,
            title: text[heading.start..heading.end].to_string(),
            content: content.to_string(),
        });
    }

    sections
}

fn find_heading(text: &str, kind: SectionKind) -> Option<Heading> {
    kind.keywords().iter().find_map(|keyword| {
        line_starts(text).find_map(|start| {
            match_heading(&text[start..], keyword).map(|len| Heading {
                kind,
                start,
                end: start + len,
            })
        })
    })
}

fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1))
}

/// Length of `keyword[s]?:?` at the start of `line`, ignoring ASCII case.
fn match_heading(line: &str, keyword: &str) -> Option<usize> {
    let prefix = line.get(..keyword.len())?;
    if !prefix.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let mut len = keyword.len();
    if line[len..].starts_with(['s', 'S']) {
        len += 1;
    }
    if line[len..].starts_with(':') {
        len += 1;
    }
    Some(len)
}

/// Split a section body into display lines.
pub fn content_lines(content: &str) -> Vec<ContentLine<'_>> {
    content
        .lines()
        .map(|line| {
            if let Some(item) = line.strip_prefix("- ") {
                ContentLine::Bullet(item)
            } else if line.trim().is_empty() {
                ContentLine::Blank
            } else {
                ContentLine::Paragraph(line)
            }
        })
        .collect()
}
