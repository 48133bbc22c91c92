use anyhow::Context as _;

use crate::enrich::Enrichment;
use crate::formats::GeneratedFrontMatter;
use crate::image::{ImageOutcome, ImageSource};

pub const DEFAULT_TAGS: [&str; 3] = ["web development", "productivity", "developer experience"];

const VALUE_BULLETS: [&str; 3] = [
    "Removes context switching triggered by frequent, low-skill steps.",
    "Turns this focus into a reusable playbook anyone on the team can follow.",
    "Surfaces the signals leaders need to know the work is paying off.",
];

const ROADMAP: [&str; 4] = [
    "**Discover intent:** Capture the scenarios and edge cases that make this work feel hard today.",
    "**Design the happy path:** Document inputs, outputs, and checkpoints so every run looks the same.",
    "**Automate iteratively:** Start with scripts or workflows that remove the noisiest manual effort.",
    "**Measure outcomes:** Track time saved, incidents avoided, and satisfaction to prove the value.",
];

const CHECKLIST: [&str; 4] = [
    "Every step has a single command or documented API call.",
    "Runbooks live with the codebase so updates ship together.",
    "Automations log successes and failures where the team already looks.",
    "Ownership and escalation paths are obvious to new contributors.",
];

const TOOL_STACK: [&str; 4] = [
    "**Task runners:** Keep the day-to-day steps reproducible locally with npm scripts, Make, or Turborepo.",
    "**CI pipelines:** Validate, deploy, and notify from one place using GitHub Actions or GitLab CI.",
    "**Observability:** Dashboards, alerts, or lightweight logs to highlight when things drift.",
    "**Collaboration:** ChatOps bots or shared docs so updates stay transparent.",
];

pub struct ArticleDraft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// `YYYY-MM-DD`, used for both publish and update dates.
    pub date: &'a str,
    pub author: &'a str,
    pub tags: Vec<String>,
    pub image: &'a ImageOutcome,
    pub enrichment: &'a Enrichment,
}

/// Topic tags first, then the defaults; first occurrence wins.
pub fn merge_tags(topic_tags: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let candidates = topic_tags
        .iter()
        .map(String::as_str)
        .chain(DEFAULT_TAGS.iter().copied());
    for tag in candidates {
        if !merged.iter().any(|t| t == tag) {
            merged.push(tag.to_owned());
        }
    }
    merged
}

pub fn default_description(title: &str) -> String {
    format!(
        "A practical guide to {} for modern developers.",
        title.to_lowercase()
    )
}

pub fn render_document(draft: &ArticleDraft<'_>) -> anyhow::Result<String> {
    let front = GeneratedFrontMatter {
        title: draft.title.to_owned(),
        description: draft.description.to_owned(),
        published_at: draft.date.to_owned(),
        updated_at: draft.date.to_owned(),
        author: draft.author.to_owned(),
        is_published: true,
        tags: draft.tags.clone(),
        image: draft.image.image.front_matter_path.clone(),
    };
    let yaml = serde_yaml::to_string(&front).context("serialize generated front matter")?;
    Ok(format!("---\n{yaml}---\n\n{}", render_body(draft)))
}

fn render_body(draft: &ArticleDraft<'_>) -> String {
    let title = draft.title;
    let paragraphs: Vec<&str> = draft
        .enrichment
        .text()
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let intro = paragraphs.first().map(|p| (*p).to_owned()).unwrap_or_else(|| {
        format!(
            "Staying focused on deep engineering work means removing the manual chores around \
             **{title}**. This playbook shows you how to protect creative energy, keep delivery \
             velocity high, and make the outcomes easy to measure."
        )
    });
    let why = paragraphs.get(1).map(|p| (*p).to_owned()).unwrap_or_else(|| {
        format!(
            "{title} creates leverage when it is documented, automated, and visible. The sooner \
             you codify the workflow, the easier it is to onboard teammates, ship consistently, \
             and defend the investment with real metrics."
        )
    });

    let qna = [
        (
            format!("How does investing in {title} accelerate delivery?"),
            "It reduces the cognitive overhead of repeating the same steps. Once the workflow is \
             codified, engineers spend more cycles on problem solving instead of setup and teardown.",
        ),
        (
            "Will this slow down smaller teams?".to_owned(),
            "Start with tiny scripts and automate the riskiest or most annoying steps first. \
             Expansion only happens when the team sees a clear payoff.",
        ),
        (
            "How do we keep the automation trustworthy?".to_owned(),
            "Treat it like product code: add tests when possible, wire in alerts, and review \
             changes alongside feature work.",
        ),
    ];

    let mut out = String::new();
    out.push_str(&format!(
        "<Image\n  src=\"{}\"\n  width=\"1920\"\n  height=\"1080\"\n  alt=\"{}\"\n  priority\n  sizes=\"100vw\"\n/>\n\n",
        draft.image.image.src,
        title.replace('"', "&quot;"),
    ));
    out.push_str(&format!("{intro}\n\n---\n\n"));
    out.push_str(&format!("## Why {title} should be on your roadmap\n\n{why}\n\n"));
    for bullet in VALUE_BULLETS {
        out.push_str(&format!("- {bullet}\n"));
    }

    out.push_str("\n---\n\n## Implementation roadmap\n\n");
    for (idx, step) in ROADMAP.iter().enumerate() {
        out.push_str(&format!("{}. {step}\n", idx + 1));
    }

    out.push_str("\n---\n\n## Productivity checklist\n\n");
    for item in CHECKLIST {
        out.push_str(&format!("- [ ] {item}\n"));
    }

    out.push_str("\n---\n\n## Tool stack to explore\n\n");
    for item in TOOL_STACK {
        out.push_str(&format!("- {item}\n"));
    }

    out.push_str("\n---\n\n## Expert Q&A\n\n");
    for (question, answer) in &qna {
        out.push_str(&format!("**Q:** {question}\n\n**A:** {answer}\n\n"));
    }

    let credit = &draft.image.image.credit;
    let attribution = match draft.image.source {
        ImageSource::Provider => {
            format!("_Photo by [{}]({}) on Unsplash._", credit.name, credit.profile_url)
        }
        ImageSource::Placeholder(_) => {
            format!("_Hero image: [{}]({})._", credit.name, credit.profile_url)
        }
    };
    out.push_str(&format!("---\n\n{attribution}\n\n"));
    out.push_str(
        "_This post was automatically generated and reviewed for clarity before publishing._\n",
    );
    out
}
