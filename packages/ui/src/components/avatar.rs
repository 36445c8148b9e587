use dioxus::prelude::*;

/// Up to two uppercase initials, `"?"` for a blank name.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[component]
pub fn Avatar(name: String, #[props(default)] image_url: Option<String>) -> Element {
    rsx! {
        span { class: "avatar", title: "{name}",
            if let Some(url) = image_url {
                img { class: "avatar-image", src: "{url}", alt: "{name}" }
            } else {
                span { class: "avatar-fallback", "{initials(&name)}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("  grace  brewster hopper "), "GB");
        assert_eq!(initials("émile"), "É");
        assert_eq!(initials("   "), "?");
    }
}
