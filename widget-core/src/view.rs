//! Presentation layer: a pure mapping from [`ViewState`] to the card, plus a
//! plain-text renderer for terminals.

use crate::{
    i18n::{Catalog, TextDirection},
    model::{ViewState, WeatherSnapshot},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub direction: TextDirection,
    pub header: Header,
    pub body: CardBody,
    /// Names the language the toggle switches to.
    pub toggle_label: String,
}

/// Always shown, whatever the loading state.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub location: String,
    pub datetime: String,
    pub refresh_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    Loading { label: String },
    Failed {
        message: String,
        detail: String,
        retry_label: String,
    },
    Weather(WeatherPanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPanel {
    pub temperature: String,
    pub icon_url: String,
    pub description: String,
    pub feels_like: String,
    pub min_max: String,
    pub details: Vec<DetailRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub key: &'static str,
    pub label: String,
    pub value: String,
}

impl CardView {
    pub fn from_state(state: &ViewState, catalog: &Catalog) -> Self {
        let header = Header {
            location: state.location.clone(),
            datetime: state.datetime.clone(),
            refresh_label: catalog.translate("refresh"),
        };

        let body = match (&state.snapshot, &state.error) {
            _ if state.loading => CardBody::Loading {
                label: catalog.translate("loading"),
            },
            (_, Some(detail)) => CardBody::Failed {
                message: catalog.translate("fetch_failed"),
                detail: detail.clone(),
                retry_label: catalog.translate("retry"),
            },
            (Some(snapshot), None) => CardBody::Weather(WeatherPanel::new(snapshot, catalog)),
            (None, None) => CardBody::Loading {
                label: catalog.translate("loading"),
            },
        };

        Self {
            direction: state.locale.direction(),
            header,
            body,
            toggle_label: state.locale.toggle_label().to_string(),
        }
    }
}

impl WeatherPanel {
    fn new(snapshot: &WeatherSnapshot, catalog: &Catalog) -> Self {
        let t = |key: &str| catalog.translate(key);
        let row = |key: &'static str, value: String| DetailRow {
            key,
            label: t(key),
            value,
        };

        Self {
            temperature: format!("{}°", snapshot.temperature),
            icon_url: snapshot.icon_url.clone(),
            description: capitalize_words(&snapshot.description),
            feels_like: format!("{}: {}°", t("feels_like"), snapshot.feels_like),
            min_max: format!(
                "{}: {}° | {}: {}°",
                t("min"),
                snapshot.temp_min,
                t("max"),
                snapshot.temp_max
            ),
            details: vec![
                row("humidity", format!("{}%", snapshot.humidity)),
                row("wind_speed", format!("{} km/h", snapshot.wind_speed)),
                row("pressure", format!("{} hPa", snapshot.pressure)),
                row("visibility", format!("{} km", snapshot.visibility)),
                row("sunrise", snapshot.sunrise.clone()),
                row("sunset", snapshot.sunset.clone()),
            ],
        }
    }
}

/// Upper-cases the first letter of every word.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Render the card as text, `width` columns wide. Right-to-left cards are
/// right-aligned.
pub fn render(view: &CardView, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(spread(
        &format!("⌖ {}", view.header.location),
        &format!("⟳ {} [r]", view.header.refresh_label),
        width,
        view.direction,
    ));
    lines.push(view.header.datetime.clone());
    lines.push("─".repeat(width));

    match &view.body {
        CardBody::Loading { label } => {
            lines.push(String::new());
            lines.push(format!("… {label}"));
            lines.push(String::new());
        }
        CardBody::Failed {
            message,
            detail,
            retry_label,
        } => {
            lines.push(String::new());
            lines.push(format!("⚠ {message}"));
            lines.push(detail.clone());
            lines.push(format!("{retry_label} [t]"));
            lines.push(String::new());
        }
        CardBody::Weather(panel) => {
            lines.push(panel.temperature.clone());
            lines.push(panel.icon_url.clone());
            lines.push(panel.description.clone());
            lines.push(panel.feels_like.clone());
            lines.push(panel.min_max.clone());
            lines.push(String::new());
            for pair in panel.details.chunks(2) {
                let cells: Vec<String> = pair
                    .iter()
                    .map(|row| format!("{} {}", row.value, row.label))
                    .collect();
                let line = match cells.as_slice() {
                    [left, right] => spread(left, right, width, view.direction),
                    [only] => only.clone(),
                    _ => String::new(),
                };
                lines.push(line);
            }
        }
    }

    lines.push(String::new());
    let toggle = format!("[l] {}", view.toggle_label);
    // The toggle sits at the end edge of the card in both directions.
    lines.push(match view.direction {
        TextDirection::Ltr => pad_start(&toggle, width),
        TextDirection::Rtl => pad_end(&toggle, width),
    });

    let aligned: Vec<String> = lines
        .into_iter()
        .map(|line| match view.direction {
            TextDirection::Ltr => line,
            TextDirection::Rtl => pad_start(&line, width),
        })
        .collect();

    aligned.join("\n")
}

/// Two cells at opposite edges; the first is at the start edge.
fn spread(first: &str, second: &str, width: usize, direction: TextDirection) -> String {
    let used = first.chars().count() + second.chars().count();
    let gap = width.saturating_sub(used).max(1);
    let (left, right) = match direction {
        TextDirection::Ltr => (first, second),
        TextDirection::Rtl => (second, first),
    };
    format!("{left}{}{right}", " ".repeat(gap))
}

fn pad_end(line: &str, width: usize) -> String {
    let len = line.chars().count();
    format!("{line}{}", " ".repeat(width.saturating_sub(len)))
}

fn pad_start(line: &str, width: usize) -> String {
    let len = line.chars().count();
    format!("{}{line}", " ".repeat(width.saturating_sub(len)))
}
