use crate::types::ScoredProfile;

const BAR_WIDTH: usize = 50;

fn bar(score: f64) -> String {
    let filled = ((score * 10.0) as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn to_markdown(profile: &ScoredProfile) -> String {
    let mut output = String::new();
    output.push_str(&format!("# BFI-2 Scoring Results: {}\n\n", profile.persona()));
    output.push_str(&format!(
        "Answered questions: {}\n\n",
        profile.total_questions()
    ));

    output.push_str("## Domain Scores\n\n");
    for domain in profile.domains().values() {
        output.push_str(&format!("### {} ({})\n\n", domain.name, domain.code));
        output.push_str(&format!(
            "Score: {:.2} / 5.00 [{}]\n\n",
            domain.score, domain.interpretation
        ));
        output.push_str(&format!("`{}`\n\n", bar(domain.score)));
        if !domain.facets.is_empty() {
            for facet in domain.facets.values() {
                output.push_str(&format!("- {}: {:.2}\n", facet.name, facet.score));
            }
            output.push('\n');
        }
    }

    output.push_str("## Summary\n\n");
    for (code, score) in profile.summary().iter() {
        output.push_str(&format!("- {}: {:.2}\n", code, score));
    }

    output
}

/// One line per profile, for batch listings.
pub fn summary_line(profile: &ScoredProfile) -> String {
    let scores = profile
        .summary()
        .iter()
        .map(|(code, score)| format!("{code}={score:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}: {}", profile.persona(), scores)
}
