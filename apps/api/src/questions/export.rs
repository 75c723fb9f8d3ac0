use crate::questions::models::GenerationResult;

/// Renders the questions as a numbered plain-text list, easy → medium → hard,
/// under a `"<skills> Interview Questions"` title.
pub fn render_plain_text(skills: &str, questions: &GenerationResult) -> String {
    let mut out = format!("{} Interview Questions\n\n", skills.trim());
    for (i, (_, question)) in questions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, question));
    }
    out
}
