use dom::Rgba;

/// One semantic tag group with its display color.
#[derive(Debug)]
pub struct ElementGroup {
    pub name: &'static str,
    pub color: Rgba,
    pub tags: &'static [&'static str],
}

/// Fallback for tags outside every group.
pub const DEFAULT_COLOR: Rgba = Rgba::opaque(0x9c, 0xa3, 0xaf);

/// The static tag-group table, in classification priority order.
/// First tag match wins; the table is never mutated at runtime.
pub static GROUPS: &[ElementGroup] = &[
    ElementGroup {
        name: "containers",
        color: Rgba::opaque(0x3b, 0x82, 0xf6),
        tags: &[
            "div",
            "section",
            "article",
            "aside",
            "header",
            "footer",
            "main",
            "nav",
            "figure",
            "figcaption",
            "details",
            "summary",
            "dialog",
            "fieldset",
            "form",
        ],
    },
    ElementGroup {
        name: "tables",
        color: Rgba::opaque(0x10, 0xb9, 0x81),
        tags: &[
            "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption", "colgroup", "col",
        ],
    },
    ElementGroup {
        name: "text",
        color: Rgba::opaque(0xf5, 0x9e, 0x0b),
        tags: &[
            "p",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "span",
            "blockquote",
            "pre",
            "code",
            "em",
            "strong",
            "b",
            "i",
            "u",
            "small",
            "mark",
            "sub",
            "sup",
            "ul",
            "ol",
            "li",
            "dl",
            "dt",
            "dd",
        ],
    },
    ElementGroup {
        name: "media",
        color: Rgba::opaque(0x8b, 0x5c, 0xf6),
        tags: &[
            "img", "picture", "video", "audio", "source", "track", "canvas", "iframe", "embed",
            "object", "map", "area",
        ],
    },
    ElementGroup {
        name: "interactive",
        color: Rgba::opaque(0xef, 0x44, 0x44),
        tags: &[
            "a", "button", "input", "select", "textarea", "option", "optgroup", "label",
            "datalist", "output", "progress", "meter",
        ],
    },
];

/// First group whose tag set contains `tag`, scanning in table order.
pub fn group_for(tag: &str) -> Option<&'static ElementGroup> {
    GROUPS
        .iter()
        .find(|group| group.tags.contains(&tag))
}

pub fn color_for(tag: &str) -> Rgba {
    group_for(tag).map_or(DEFAULT_COLOR, |group| group.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_tags_take_the_containers_color() {
        let containers = &GROUPS[0];
        assert_eq!(containers.name, "containers");
        for tag in ["div", "section", "form"] {
            assert_eq!(color_for(tag), containers.color);
        }
    }

    #[test]
    fn unmatched_tags_fall_back_to_default() {
        assert_eq!(color_for("svg"), DEFAULT_COLOR);
        assert_eq!(color_for("blink"), DEFAULT_COLOR);
        assert!(group_for("svg").is_none());
    }

    #[test]
    fn no_tag_lives_in_two_groups() {
        for (idx, group) in GROUPS.iter().enumerate() {
            for tag in group.tags {
                for later in &GROUPS[idx + 1..] {
                    assert!(
                        !later.tags.contains(tag),
                        "{tag} appears in both {} and {}",
                        group.name,
                        later.name
                    );
                }
            }
        }
    }
}
