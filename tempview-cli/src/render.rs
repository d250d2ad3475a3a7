//! Human-friendly and JSON output for a [`ViewModel`].

use chrono::Local;
use std::fmt::{self, Write as _};

use tempview_core::{ViewModel, WeatherSnapshot};

const LOCATION_MARKER: &str = "📍";

pub fn render_text(model: &ViewModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_model(&mut out, model);
    out
}

fn write_model(out: &mut String, model: &ViewModel) -> fmt::Result {
    match model.snapshot() {
        Some(snapshot) => write_snapshot(out, snapshot)?,
        None => writeln!(out, "{LOCATION_MARKER}")?,
    }

    if let Some(error) = model.error() {
        writeln!(out, "{error}")?;
    }

    if model.is_loading() {
        writeln!(out, "Loading...")?;
    }

    if let Some(background) = model.background() {
        writeln!(out, "Background: {background} ({})", background.css())?;
    }

    Ok(())
}

fn write_snapshot(out: &mut String, snapshot: &WeatherSnapshot) -> fmt::Result {
    let icon = snapshot.condition_main.icon();

    writeln!(out, "{LOCATION_MARKER} {}", snapshot.location_name)?;
    writeln!(out, "{} {}°C", icon.glyph(), snapshot.temperature_celsius())?;
    writeln!(out, "{}", snapshot.condition_description)?;
    writeln!(out, "  Wind Speed: {} m/s", snapshot.wind_speed_mps)?;
    writeln!(out, "  Humidity: {}%", snapshot.humidity_pct)?;
    writeln!(out, "  Visibility: {} km", snapshot.visibility_km())?;
    writeln!(out, "  Pressure: {} hPa", snapshot.pressure_hpa)?;

    if let Some(observed_at) = snapshot.observed_at {
        let local = observed_at.with_timezone(&Local);
        writeln!(out, "  Updated: {}", local.format("%Y-%m-%d %H:%M"))?;
    }

    Ok(())
}

pub fn render_json(model: &ViewModel) -> serde_json::Value {
    serde_json::json!({
        "query": model.query().as_str(),
        "snapshot": model.snapshot(),
        "temperature_c": model.snapshot().map(WeatherSnapshot::temperature_celsius),
        "icon": model.snapshot().map(|s| s.condition_main.icon().as_str()),
        "background": model.background(),
        "error": model.error(),
    })
}
