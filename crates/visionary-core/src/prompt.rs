/// Instruction sent to the text model for a goal.
pub fn roadmap_prompt(goal: &str, year: i32) -> String {
    let goal = goal.replace('"', "'");
    format!(
        "Goal: \"{goal}\". Provide a 12-month roadmap for {year} as a JSON object ONLY. \
         Keys are the English month names January through December, values are short tasks. \
         No markdown, no extra text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_quotes_goal_and_names_year() {
        let prompt = roadmap_prompt("Learn the cello", 2026);
        assert!(prompt.starts_with("Goal: \"Learn the cello\"."));
        assert!(prompt.contains("roadmap for 2026"));
        assert!(prompt.contains("JSON object ONLY"));
    }

    #[test]
    fn embedded_quotes_cannot_close_the_goal() {
        let prompt = roadmap_prompt(r#"say "hi""#, 2026);
        assert!(prompt.starts_with("Goal: \"say 'hi'\"."));
    }
}
