pub const DESCRIBE_INSTRUCTION: &str = include_str!("../data/prompts/describe.txt");
pub const GENERATION: &str = include_str!("../data/prompts/generation.txt");

pub const STYLE_LEGO: &str = include_str!("../data/prompts/styles/lego.txt");
pub const STYLE_ANIME: &str = include_str!("../data/prompts/styles/anime.txt");
pub const STYLE_GHIBLI: &str = include_str!("../data/prompts/styles/ghibli.txt");
pub const STYLE_FUTURISTIC: &str = include_str!("../data/prompts/styles/futuristic.txt");
pub const STYLE_VINTAGE: &str = include_str!("../data/prompts/styles/vintage.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution happens in a single left-to-right pass, so placeholder-like
/// text inside a substituted value is left alone.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let replaced = after.find("}}").and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });
        match replaced {
            Some((value, end)) => {
                result.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                result.push_str("{{");
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Combine a style directive and an image description into one generation
/// instruction. The style comes first and the content constraint last.
pub fn generation_instruction(style_prompt: &str, description: &str) -> String {
    render(
        GENERATION,
        &[("style", style_prompt.trim()), ("description", description.trim())],
    )
}
