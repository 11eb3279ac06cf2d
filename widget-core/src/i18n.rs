//! Display languages and the string catalog for the card.

use fluent_bundle::{FluentResource, concurrent::FluentBundle};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, sync::LazyLock};
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Active display language. Also decides the text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::Ar, Locale::En]
    }

    /// The other locale of the pair.
    pub fn toggled(self) -> Self {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Locale::Ar => TextDirection::Rtl,
            Locale::En => TextDirection::Ltr,
        }
    }

    /// Label of the language toggle: names the language it switches *to*.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Locale::Ar => "الانجليزية",
            Locale::En => "Arabic",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: ar, en."
            )),
        }
    }
}

/// Translated strings for the active locale, backed by the Fluent bundles
/// under `locales/`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    active: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { active: locale }
    }

    pub fn locale(&self) -> Locale {
        self.active
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.active = locale;
    }

    /// Switch the active language by its code (`ar` or `en`).
    pub fn set_language(&mut self, code: &str) -> anyhow::Result<()> {
        self.active = Locale::try_from(code)?;
        Ok(())
    }

    /// Unknown keys come back unchanged.
    pub fn translate(&self, key: &str) -> String {
        let bundle = BUNDLES.get(self.active);
        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return key.to_string();
        };

        let mut errors = Vec::new();
        let text = bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            warn!(key, locale = %self.active, ?errors, "failed to format message");
        }
        text.into_owned()
    }
}

type Bundle = FluentBundle<FluentResource>;

struct Bundles {
    ar: Bundle,
    en: Bundle,
}

impl Bundles {
    fn get(&self, locale: Locale) -> &Bundle {
        match locale {
            Locale::Ar => &self.ar,
            Locale::En => &self.en,
        }
    }
}

static BUNDLES: LazyLock<Bundles> = LazyLock::new(|| Bundles {
    ar: load_bundle(Locale::Ar, include_str!("../locales/ar.ftl")),
    en: load_bundle(Locale::En, include_str!("../locales/en.ftl")),
});

fn load_bundle(locale: Locale, source: &str) -> Bundle {
    let langid: LanguageIdentifier = locale.as_str().parse().unwrap_or_default();
    let mut bundle = FluentBundle::new_concurrent(vec![langid]);
    // Bidi isolation marks would end up verbatim in the terminal.
    bundle.set_use_isolating(false);

    let resource = match FluentResource::try_new(source.to_string()) {
        Ok(resource) => resource,
        Err((resource, errors)) => {
            warn!(%locale, ?errors, "translation file has syntax errors");
            resource
        }
    };
    bundle.add_resource_overriding(resource);
    bundle
}
