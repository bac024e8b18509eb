//! moderncv (classic, blue) LaTeX source for a resume.

use std::fmt::Write;

use crate::markup::strip_html;
use crate::models::resume::{ResumeDocument, SectionKey};

/// Escapes LaTeX special characters in user text.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Strips markup, then escapes.
fn tex(text: &str) -> String {
    escape_latex(strip_html(text).trim())
}

fn date_span(start: &str, end: &str) -> String {
    format!("{} -- {}", tex(start), tex(end))
}

fn itemize(out: &mut String, items: &[String]) {
    let items: Vec<String> = items
        .iter()
        .map(|i| tex(i))
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() {
        return;
    }
    out.push_str("\\begin{itemize}\n");
    for item in items {
        let _ = writeln!(out, "  \\item {item}");
    }
    out.push_str("\\end{itemize}");
}

pub fn to_latex(doc: &ResumeDocument) -> String {
    let basics = &doc.basics;
    let mut name_parts = basics.name.split_whitespace();
    let first = name_parts.next().unwrap_or_default();
    let rest = name_parts.collect::<Vec<_>>().join(" ");

    let mut out = String::from(
        "\\documentclass[11pt,a4paper,sans]{moderncv}\n\
         \\moderncvstyle{classic}\n\
         \\moderncvcolor{blue}\n\
         \\usepackage[utf8]{inputenc}\n\
         \\usepackage[scale=0.75]{geometry}\n\n",
    );
    let _ = writeln!(out, "\\name{{{}}}{{{}}}", escape_latex(first), escape_latex(&rest));
    let _ = writeln!(out, "\\title{{{}}}", tex(&basics.label));
    let _ = writeln!(out, "\\phone[mobile]{{{}}}", tex(&basics.phone));
    let _ = writeln!(out, "\\email{{{}}}", tex(&basics.email));
    if !basics.url.trim().is_empty() {
        let _ = writeln!(out, "\\homepage{{{}}}", tex(&basics.url));
    }

    out.push_str("\n\\begin{document}\n\\makecvtitle\n\n");
    let _ = writeln!(out, "\\section{{Summary}}\n{}\n", tex(&basics.summary));

    for &key in doc.section_order.keys() {
        write_section(&mut out, doc, key);
    }

    out.push_str("\\end{document}\n");
    out
}

fn write_section(out: &mut String, doc: &ResumeDocument, key: SectionKey) {
    match key {
        SectionKey::Work if !doc.work.is_empty() => {
            out.push_str("\\section{Experience}\n");
            for job in &doc.work {
                let _ = write!(
                    out,
                    "\\cventry{{{}}}{{{}}}{{{}}}{{{}}}{{}}{{",
                    date_span(&job.start_date, &job.end_date),
                    tex(&job.position),
                    tex(&job.name),
                    tex(&job.url),
                );
                itemize(out, &job.highlights);
                out.push_str("}\n");
            }
        }
        SectionKey::Education if !doc.education.is_empty() => {
            out.push_str("\\section{Education}\n");
            for edu in &doc.education {
                let score = match edu.score.trim() {
                    "" => String::new(),
                    score => format!("GPA: {}", tex(score)),
                };
                let _ = writeln!(
                    out,
                    "\\cventry{{{}}}{{{} in {}}}{{{}}}{{}}{{{}}}{{}}",
                    date_span(&edu.start_date, &edu.end_date),
                    tex(&edu.study_type),
                    tex(&edu.area),
                    tex(&edu.institution),
                    score,
                );
            }
        }
        SectionKey::Projects if !doc.projects.is_empty() => {
            out.push_str("\\section{Projects}\n");
            for project in &doc.projects {
                let _ = write!(
                    out,
                    "\\cventry{{{}}}{{{}}}{{{}}}{{}}{{}}{{",
                    date_span(&project.start_date, &project.end_date),
                    tex(&project.name),
                    tex(&project.url),
                );
                itemize(out, &project.highlights);
                out.push_str("}\n");
            }
        }
        SectionKey::Skills if !doc.skills.is_empty() => {
            out.push_str("\\section{Skills}\n");
            for skill in &doc.skills {
                let keywords: Vec<String> = skill.keywords.iter().map(|k| tex(k)).collect();
                let _ = writeln!(out, "\\cvitem{{{}}}{{{}}}", tex(&skill.name), keywords.join(", "));
            }
        }
        SectionKey::Certifications if !doc.certifications.is_empty() => {
            out.push_str("\\section{Certifications}\n");
            for cert in &doc.certifications {
                let _ = writeln!(
                    out,
                    "\\cvitem{{{}}}{{{}, {}}}",
                    tex(&cert.date),
                    tex(&cert.name),
                    tex(&cert.issuer),
                );
            }
        }
        SectionKey::Additional => {
            for section in &doc.additional {
                let _ = writeln!(out, "\\section{{{}}}", tex(&section.title));
                itemize(out, &section.items);
                out.push('\n');
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::examples::ExampleKey;
    use crate::models::resume::{SectionOrder, SkillEntry, WorkEntry};

    #[test]
    fn test_escape_latex_specials() {
        assert_eq!(escape_latex("R&D 100% $5 #1 a_b"), "R\\&D 100\\% \\$5 \\#1 a\\_b");
        assert_eq!(escape_latex("{x}"), "\\{x\\}");
        assert_eq!(escape_latex("a\\b~c^"), "a\\textbackslash{}b\\textasciitilde{}c\\textasciicircum{}");
        assert_eq!(escape_latex("a<b>c"), "a\\textless{}b\\textgreater{}c");
    }

    #[test]
    fn test_header_splits_name() {
        let mut doc = ResumeDocument::default();
        doc.basics.name = "Mary Ann Lee".to_string();
        doc.basics.summary = "<b>Builder</b> of things".to_string();
        let tex = to_latex(&doc);
        assert!(tex.contains("\\name{Mary}{Ann Lee}"));
        assert!(tex.contains("\\section{Summary}\nBuilder of things"));
        assert!(!tex.contains("\\homepage"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_summary_keeps_prose_comparisons_and_entities() {
        let mut doc = ResumeDocument::default();
        doc.basics.summary = "Cut p99 latency < 10ms &mdash; saved &#36;2M".to_string();
        let tex = to_latex(&doc);
        assert!(tex.contains("\\section{Summary}\nCut p99 latency \\textless{} 10ms \u{2014} saved \\$2M"));
        assert!(!tex.contains("mdash"));
    }

    #[test]
    fn test_sections_follow_order_and_escape() {
        let mut doc = ResumeDocument::default();
        doc.skills.push(SkillEntry {
            name: "Languages".to_string(),
            keywords: vec!["C#".to_string(), "Rust".to_string()],
            ..Default::default()
        });
        doc.work.push(WorkEntry {
            name: "AT&T".to_string(),
            position: "SRE".to_string(),
            start_date: "2020".to_string(),
            end_date: "Present".to_string(),
            highlights: vec!["Cut <i>costs</i> 30%".to_string()],
            ..Default::default()
        });
        doc.section_order = SectionOrder::normalized(["skills", "work"]);

        let tex = to_latex(&doc);
        let skills = tex.find("\\section{Skills}").unwrap();
        let work = tex.find("\\section{Experience}").unwrap();
        assert!(skills < work);
        assert!(tex.contains("\\cvitem{Languages}{C\\#, Rust}"));
        assert!(tex.contains("{SRE}{AT\\&T}"));
        assert!(tex.contains("\\item Cut costs 30\\%"));
    }

    #[test]
    fn test_example_renders_every_section() {
        let tex = to_latex(&ExampleKey::Frontend.document());
        assert!(tex.contains("\\section{Experience}"));
        assert!(tex.contains("\\section{Skills}"));
    }
}
