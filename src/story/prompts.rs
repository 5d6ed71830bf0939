use minijinja::{context, Environment};
use once_cell::sync::Lazy;

use crate::classifier::LabelObservation;

pub const SYSTEM_PROMPT: &str = "You are a witty story teller who creates dramatic, funny stories \
about hotdogs and food items, you are also a meme master that knows all up to date memes that you \
can talk about in the stories about how the hotdog can relate to it. Keep stories concise and humorous.";

const HOTDOG_TEMPLATE: &str = "hotdog";
const IMPOSTER_TEMPLATE: &str = "imposter";

// Hotdog prompts join labels with "," and imposter prompts with ", ".
const HOTDOG_SOURCE: &str = "Create a funny, dramatic story (max 1 paragraph) about a hotdog \
that is {{ labels | join(',') }}.";
const IMPOSTER_SOURCE: &str = "Create a funny, dramatic story (max 1 paragraph) about a \
({{ labels | join(', ') }}) is pretending to be a hotdog.";

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(HOTDOG_TEMPLATE, HOTDOG_SOURCE)
        .expect("invalid hotdog story template");
    env.add_template(IMPOSTER_TEMPLATE, IMPOSTER_SOURCE)
        .expect("invalid imposter story template");
    env
});

/// User prompt asking for a story about the detection outcome.
pub fn story_prompt(
    is_hotdog: bool,
    labels: &[LabelObservation],
) -> Result<String, minijinja::Error> {
    let name = if is_hotdog {
        HOTDOG_TEMPLATE
    } else {
        IMPOSTER_TEMPLATE
    };
    let descriptions: Vec<&str> = labels.iter().map(|l| l.description.as_str()).collect();

    TEMPLATES
        .get_template(name)?
        .render(context! { labels => descriptions })
}
