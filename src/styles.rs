//! Style catalog
//!
//! The fixed set of art styles a user can pick from. This is the only source
//! of valid style identifiers; both the HTTP surface and the pipeline resolve
//! styles through it.

use crate::models::StyleId;
use crate::{prompts, Error, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StyleDefinition {
    pub id: StyleId,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub prompt_template: &'static str,
}

static CATALOG: [StyleDefinition; 5] = [
    StyleDefinition {
        id: StyleId::Lego,
        name: "LEGO",
        description: "Rebuild the scene out of plastic toy bricks and minifigures",
        prompt_template: prompts::STYLE_LEGO,
    },
    StyleDefinition {
        id: StyleId::Anime,
        name: "Anime",
        description: "Clean line art and cel shading in a modern anime look",
        prompt_template: prompts::STYLE_ANIME,
    },
    StyleDefinition {
        id: StyleId::Ghibli,
        name: "Studio Ghibli",
        description: "Soft hand-painted watercolor worlds with a nostalgic feel",
        prompt_template: prompts::STYLE_GHIBLI,
    },
    StyleDefinition {
        id: StyleId::Futuristic,
        name: "Futuristic",
        description: "Neon-lit sci-fi with chrome, holograms, and cybernetics",
        prompt_template: prompts::STYLE_FUTURISTIC,
    },
    StyleDefinition {
        id: StyleId::Vintage,
        name: "Vintage",
        description: "A faded 1950s film photograph with grain and warm tones",
        prompt_template: prompts::STYLE_VINTAGE,
    },
];

/// All styles in display order.
pub fn list() -> &'static [StyleDefinition] {
    &CATALOG
}

/// Look up a style definition by identifier.
pub fn get(id: StyleId) -> &'static StyleDefinition {
    let index = match id {
        StyleId::Lego => 0,
        StyleId::Anime => 1,
        StyleId::Ghibli => 2,
        StyleId::Futuristic => 3,
        StyleId::Vintage => 4,
    };
    &CATALOG[index]
}

/// Resolve a raw identifier to its style prompt.
pub fn prompt_for(id: &str) -> Result<&'static str> {
    let style: StyleId = id.parse()?;
    let template = get(style).prompt_template.trim();
    if template.is_empty() {
        return Err(Error::UnknownStyle(id.to_string()));
    }
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_has_five_styles_in_order() {
        let ids: Vec<&str> = list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["lego", "anime", "ghibli", "futuristic", "vintage"]);
    }

    #[test]
    fn test_get_matches_every_variant() {
        for style in list() {
            assert_eq!(get(style.id).id, style.id);
        }
    }

    #[test]
    fn test_prompt_for_every_style_is_non_empty() {
        for style in list() {
            let prompt = prompt_for(style.id.as_str()).unwrap();
            assert!(!prompt.is_empty());
        }
    }

    #[test]
    fn test_prompt_for_distinct_templates() {
        assert_ne!(prompt_for("anime").unwrap(), prompt_for("ghibli").unwrap());
    }

    #[test]
    fn test_prompt_for_unknown_style() {
        for id in ["", "pixel", "LEGO", " anime"] {
            assert!(matches!(prompt_for(id), Err(Error::UnknownStyle(_))));
        }
    }

    #[test]
    fn test_serialized_definition_hides_template() {
        let json = serde_json::to_value(get(StyleId::Anime)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "anime",
                "name": "Anime",
                "description": "Clean line art and cel shading in a modern anime look",
            })
        );
    }
}
