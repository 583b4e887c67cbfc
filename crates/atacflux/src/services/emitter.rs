//! Snippet Emitter
//!
//! Renders an [`Analysis`] as the three array literals that
//! `GeneTopologyPage.jsx` expects (`aiTextChunks`, `aiInsights`, `aiActions`).

use std::io::Write;

use crate::domain::entities::Analysis;

/// Front-end file the snippets are pasted into
pub const PASTE_TARGET: &str = "GeneTopologyPage.jsx";

/// Banner line printed above the snippets on stdout
pub fn write_header<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "=== Paste this into {} ===\n", PASTE_TARGET)
}

/// Write all three blocks, separated by a blank line
pub fn write_snippets<W: Write>(out: &mut W, analysis: &Analysis) -> std::io::Result<()> {
    writeln!(out, "const aiTextChunks = [")?;
    for bullet in &analysis.bullets {
        writeln!(
            out,
            "  {{ text: '{}', isBullet: {} }},",
            js_string(&bullet.text),
            bullet.is_bullet
        )?;
    }
    writeln!(out, "];\n")?;

    writeln!(out, "const aiInsights = [")?;
    for insight in &analysis.insights {
        writeln!(
            out,
            "  {{ icon: '{}', label: '{}', value: '{}' }},",
            js_string(&insight.icon),
            js_string(&insight.label),
            js_string(&insight.value)
        )?;
    }
    writeln!(out, "];\n")?;

    writeln!(out, "const aiActions = [")?;
    for action in &analysis.actions {
        writeln!(
            out,
            "  {{ action: '{}', because: '{}' }},",
            js_string(&action.action),
            js_string(&action.because)
        )?;
    }
    writeln!(out, "];")?;

    Ok(())
}

/// Body of a single-quoted JS string literal
pub fn js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Action, Bullet, Insight};

    fn render(analysis: &Analysis) -> String {
        let mut out = Vec::new();
        write_snippets(&mut out, analysis).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Analysis {
        Analysis {
            bullets: vec![
                Bullet {
                    text: "ATF1 is silenced".to_string(),
                    is_bullet: false,
                },
                Bullet {
                    text: "Compartment B isolates the locus".to_string(),
                    is_bullet: true,
                },
            ],
            insights: vec![Insight {
                icon: "🔒".to_string(),
                label: "Silenced State".to_string(),
                value: "Complete shutdown".to_string(),
            }],
            actions: vec![Action {
                action: "dCas9-VPR at ATF1".to_string(),
                because: "6% accessibility".to_string(),
            }],
        }
    }

    #[test]
    fn test_blocks_match_paste_format() {
        let expected = "\
const aiTextChunks = [
  { text: 'ATF1 is silenced', isBullet: false },
  { text: 'Compartment B isolates the locus', isBullet: true },
];

const aiInsights = [
  { icon: '🔒', label: 'Silenced State', value: 'Complete shutdown' },
];

const aiActions = [
  { action: 'dCas9-VPR at ATF1', because: '6% accessibility' },
];
";
        assert_eq!(render(&sample()), expected);
    }

    #[test]
    fn test_empty_actions_still_close_block() {
        let mut analysis = sample();
        analysis.actions.clear();

        assert!(render(&analysis).ends_with("const aiActions = [\n];\n"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let mut analysis = sample();
        analysis.bullets[0].text = "ATF1's promoter \\ closed".to_string();

        assert!(render(&analysis).contains(r"{ text: 'ATF1\'s promoter \\ closed', isBullet: false },"));
    }

    #[test]
    fn test_header_names_target_file() {
        let mut out = Vec::new();
        write_header(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "=== Paste this into GeneTopologyPage.jsx ===\n\n"
        );
    }

    #[test]
    fn test_js_string_keeps_plain_text() {
        assert_eq!(js_string("3.2× nucleosome density"), "3.2× nucleosome density");
        assert_eq!(js_string("a\nb"), "a\\nb");
    }
}
