//! Flattens a presentation tree to markdown for previews and plain-text copies.

use std::fmt::Write;

use crate::markup::strip_html;
use crate::render::{Block, BlockBody, Entry, RenderedResume};

pub fn to_markdown(rendered: &RenderedResume) -> String {
    let mut out = String::new();

    if !rendered.header.name.is_empty() {
        let _ = writeln!(out, "# {}", rendered.header.name);
    }
    if let Some(label) = &rendered.header.label {
        let _ = writeln!(out, "**{label}**");
    }
    if !rendered.header.contacts.is_empty() {
        let contacts: Vec<String> = rendered
            .header
            .contacts
            .iter()
            .map(|c| match &c.url {
                Some(url) if !url.starts_with("mailto:") && *url != c.text => format!("[{}]({url})", c.text),
                _ => c.text.clone(),
            })
            .collect();
        let _ = writeln!(out, "\n{}", contacts.join(" · "));
    }
    if let Some(summary) = &rendered.summary {
        let _ = writeln!(out, "\n## Summary\n\n{}", strip_html(summary).trim());
    }

    // Sidebar content reads after the main column in a linear document.
    for block in rendered.main.iter().chain(&rendered.sidebar) {
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    let _ = writeln!(out, "\n## {}\n", block.title);
    match &block.body {
        BlockBody::Entries(entries) => entries.iter().for_each(|e| write_entry(out, e)),
        BlockBody::Chips(chips) => {
            let _ = writeln!(out, "{}", chips.join(", "));
        }
        BlockBody::Bullets(items) => {
            for item in items {
                let _ = writeln!(out, "- {}", strip_html(item).trim());
            }
        }
    }
}

fn write_entry(out: &mut String, entry: &Entry) {
    let mut heading = format!("### {}", entry.heading.trim());
    if let Some(link) = &entry.link {
        let _ = write!(heading, " ([link]({link}))");
    }
    let _ = writeln!(out, "{heading}");

    let meta: Vec<&str> = [entry.subheading.as_deref(), entry.dates.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        let _ = writeln!(out, "*{}*", meta.join(" | "));
    }
    if let Some(detail) = &entry.detail {
        let _ = writeln!(out, "\n{}", strip_html(detail).trim());
    }
    if !entry.bullets.is_empty() {
        out.push('\n');
        for bullet in &entry.bullets {
            let _ = writeln!(out, "- {}", strip_html(bullet).trim());
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::examples::ExampleKey;
    use crate::models::resume::ResumeDocument;
    use crate::render::{render, TemplateId};

    #[test]
    fn test_markdown_contains_header_and_sections() {
        let doc = ExampleKey::Frontend.document();
        let md = to_markdown(&render(&doc, TemplateId::Professional));
        assert!(md.starts_with(&format!("# {}\n", doc.basics.name)));
        assert!(md.contains("## Experience"));
        assert!(!md.contains("<b>"));
    }

    #[test]
    fn test_tech_sidebar_is_appended() {
        let doc = ExampleKey::Backend.document();
        let md = to_markdown(&render(&doc, TemplateId::Tech));
        let experience = md.find("## Experience").unwrap();
        let skills = md.find("## Skills").unwrap();
        assert!(experience < skills);
    }

    #[test]
    fn test_blank_document_is_empty() {
        assert!(to_markdown(&render(&ResumeDocument::default(), TemplateId::Tech)).is_empty());
    }
}
