//! Translation prompt

/// Build the English → Urdu prompt for one Markdown document.
pub fn build_prompt(english_content: &str) -> String {
    format!(
        r#"Translate the following markdown content to Urdu (اردو).

IMPORTANT RULES:
1. Translate YAML frontmatter fields (title, description, sidebar_label) to Urdu
2. Translate ALL headings, paragraphs, bullet points, and text to Urdu
3. Keep code blocks in ENGLISH (do not translate code)
4. Keep image paths unchanged: ![alt](/img/path.svg)
5. Keep markdown syntax (##, -, *, etc.)
6. Use proper Urdu script and RTL formatting
7. Technical terms can use transliteration (روبوٹ, سینسر, AI = اے آئی)
8. Preserve structure and formatting exactly

English Content:
{english_content}

Urdu Translation:"#
    )
}
