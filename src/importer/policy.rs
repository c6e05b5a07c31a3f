//! Heading name → conversion policy table.
//!
//! Each known heading declares the content shapes it accepts, in the order
//! they are tried. Content that matches none of them (and every section with
//! an unknown heading) goes through the default conversion.

/// A content shape a section may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// String → `Markdown` block.
    Text,
    /// Any list → bullet-point conversion.
    List,
    /// List of `{question, answer}` objects → `FaqList` block.
    FaqList,
    /// List of reference objects → `ReferenceList` block (or nothing).
    ReferenceList,
}

const PROSE: &[Shape] = &[Shape::Text, Shape::List];

/// Known section headings. Lookup is exact and case-sensitive.
const POLICIES: &[(&str, &[Shape])] = &[
    ("Key Facts", PROSE),
    ("Symptoms", PROSE),
    ("Types", PROSE),
    ("Causes", PROSE),
    ("Risk Factors", PROSE),
    ("Diagnosis", PROSE),
    ("Prevention", PROSE),
    ("Lifestyle", PROSE),
    ("Specialist to Visit", PROSE),
    ("Treatment", PROSE),
    ("Home-Care", PROSE),
    ("Living With", PROSE),
    ("Complications", PROSE),
    ("Alternative Therapies", PROSE),
    ("FAQs", &[Shape::FaqList]),
    ("References", &[Shape::ReferenceList]),
];

/// Shapes accepted by a heading, or `None` for unknown headings.
pub fn accepted_shapes(heading: &str) -> Option<&'static [Shape]> {
    POLICIES
        .iter()
        .find(|(name, _)| *name == heading)
        .map(|(_, shapes)| *shapes)
}

/// Every heading with a dedicated policy, in table order.
pub fn known_headings() -> impl Iterator<Item = &'static str> {
    POLICIES.iter().map(|(name, _)| *name)
}
