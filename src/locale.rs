//! Localized UI strings and date locales.
//!
//! The site ships two languages. Which table is used is a single boolean:
//! the primary language (Latvian) or the secondary one (Russian). Any entry
//! can be overridden from the configuration file.

use serde::Deserialize;

/// Locale used when formatting publication dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DateLocale {
    /// `lv-LV`: "2026. gada 16. oktobris"
    #[default]
    Latvian,
    /// `ru-RU`: "16 октября 2026 г."
    Russian,
    /// `en-US`: "October 16, 2026"
    English,
}

impl DateLocale {
    /// Parses a BCP 47 style tag (`lv-LV`, `ru`, `en_US`, ...). Only the
    /// language subtag is significant.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match language.as_str() {
            "lv" => Some(Self::Latvian),
            "ru" => Some(Self::Russian),
            "en" => Some(Self::English),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Latvian => "lv-LV",
            Self::Russian => "ru-RU",
            Self::English => "en-US",
        }
    }
}

impl TryFrom<String> for DateLocale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_tag(&value).ok_or_else(|| format!("unsupported locale: {value}"))
    }
}

/// The static string table rendered around feed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strings {
    /// Title shown when a post has none
    pub default_title: String,
    /// Label of the link to the external group page
    pub open_group: String,
    /// Placeholder text when a post has no image
    pub no_photo: String,
    /// Message when the feed has no posts
    pub empty_feed: String,
    /// Message when the feed could not be fetched or parsed
    pub fetch_error: String,
    /// Toggle label in the collapsed state
    pub show_more: String,
    /// Toggle label in the expanded state
    pub show_less: String,
    /// Call-to-action on each post
    pub read_post: String,
}

impl Strings {
    pub fn latvian() -> Self {
        Self {
            default_title: "Publikācija".to_owned(),
            open_group: "Atvērt grupu".to_owned(),
            no_photo: "Šajā ierakstā nav foto".to_owned(),
            empty_feed: "RSS plūsmā vēl nav publikāciju.".to_owned(),
            fetch_error: "Neizdevās ielādēt RSS.".to_owned(),
            show_more: "Rādīt vairāk".to_owned(),
            show_less: "Rādīt mazāk".to_owned(),
            read_post: "Lasīt ierakstu".to_owned(),
        }
    }

    pub fn russian() -> Self {
        Self {
            default_title: "Публикация".to_owned(),
            open_group: "Открыть группу".to_owned(),
            no_photo: "В этом посте нет фото".to_owned(),
            empty_feed: "Пока нет публикаций в RSS.".to_owned(),
            fetch_error: "Не удалось загрузить RSS.".to_owned(),
            show_more: "Показать ещё".to_owned(),
            show_less: "Свернуть".to_owned(),
            read_post: "Читать пост".to_owned(),
        }
    }

    /// Built-in table for the primary (`true`) or secondary (`false`) language.
    pub fn for_language(primary: bool) -> Self {
        if primary {
            Self::latvian()
        } else {
            Self::russian()
        }
    }

    /// Returns a copy with every `Some` entry of `overrides` applied.
    pub fn with_overrides(mut self, overrides: &StringOverrides) -> Self {
        let pairs = [
            (&mut self.default_title, &overrides.default_title),
            (&mut self.open_group, &overrides.open_group),
            (&mut self.no_photo, &overrides.no_photo),
            (&mut self.empty_feed, &overrides.empty_feed),
            (&mut self.fetch_error, &overrides.fetch_error),
            (&mut self.show_more, &overrides.show_more),
            (&mut self.show_less, &overrides.show_less),
            (&mut self.read_post, &overrides.read_post),
        ];
        for (slot, value) in pairs {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        self
    }
}

/// Per-entry overrides for [`Strings`], read from the `[strings]` config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StringOverrides {
    pub default_title: Option<String>,
    pub open_group: Option<String>,
    pub no_photo: Option<String>,
    pub empty_feed: Option<String>,
    pub fetch_error: Option<String>,
    pub show_more: Option<String>,
    pub show_less: Option<String>,
    pub read_post: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_tags() {
        assert_eq!(DateLocale::from_tag("lv-LV"), Some(DateLocale::Latvian));
        assert_eq!(DateLocale::from_tag("RU"), Some(DateLocale::Russian));
        assert_eq!(DateLocale::from_tag("en_GB"), Some(DateLocale::English));
        assert_eq!(DateLocale::from_tag("de-DE"), None);
        assert_eq!(DateLocale::from_tag(""), None);
    }

    #[test]
    fn test_language_flag_selects_table() {
        assert_eq!(Strings::for_language(true).show_more, "Rādīt vairāk");
        assert_eq!(Strings::for_language(false).show_more, "Показать ещё");
    }

    #[test]
    fn test_overrides_apply_only_set_entries() {
        let overrides = StringOverrides {
            no_photo: Some("No photo".to_owned()),
            ..Default::default()
        };
        let strings = Strings::russian().with_overrides(&overrides);
        assert_eq!(strings.no_photo, "No photo");
        assert_eq!(strings.read_post, "Читать пост");
    }
}
