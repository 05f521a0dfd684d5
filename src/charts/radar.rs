use serde_json::{Value, json};

use crate::analyzers::radar::RADAR_AXES;
use crate::analyzers::types::ClassRadar;
use crate::charts::html::{self, Chart, Page, palette_color};

pub fn option(radar: &ClassRadar) -> Value {
    let indicators: Vec<Value> = RADAR_AXES
        .iter()
        .map(|name| json!({ "name": name, "max": 1 }))
        .collect();

    let series_data: Vec<Value> = radar
        .profiles
        .iter()
        .zip(&radar.normalized)
        .enumerate()
        .map(|(i, (profile, values))| {
            json!({
                "name": profile.class,
                "value": values,
                "symbol": "circle",
                "lineStyle": { "color": palette_color(i) },
                "itemStyle": { "color": palette_color(i) },
                "areaStyle": { "opacity": 0 },
            })
        })
        .collect();

    let legend: Vec<&str> = radar.profiles.iter().map(|p| p.class.as_str()).collect();

    json!({
        "title": { "text": "Normalized learning behaviour by class (5 metrics)" },
        "legend": { "data": legend, "top": "5%" },
        "tooltip": { "trigger": "item" },
        "radar": {
            "indicator": indicators,
            "splitArea": { "show": true },
        },
        "series": [{
            "type": "radar",
            "label": { "show": false },
            "data": series_data,
        }],
    })
}

pub fn render(radar: &ClassRadar) -> String {
    html::render(
        &Page {
            title: "Class radar",
            ..Page::default()
        },
        &[Chart::new(option(radar), 700)],
    )
}
