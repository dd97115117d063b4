//! Plain-text projection of the dashboard onto the terminal.

use skycast_core::{Dashboard, HourlyChart, view::PLACEHOLDER};

pub fn print(dash: &Dashboard, chart: &HourlyChart) {
    println!();
    if !dash.notice.is_empty() {
        println!("  ! {}", dash.notice);
    }
    if dash.place == PLACEHOLDER {
        // Nothing fetched; the notice above is the whole story.
        return;
    }

    println!("  {}", dash.hero_place);
    println!("  {}  {}", dash.temperature, dash.condition);
    println!("  Humidity: {}   Wind: {}", dash.humidity, dash.wind);
    println!("  {}  {}", dash.right_time, dash.right_condition);
    if let Some(backdrop) = dash.background {
        println!("  [backdrop: {backdrop}]");
    }

    if !dash.forecast.is_empty() {
        println!();
        for row in &dash.forecast {
            println!("    {:<4} {:<14} {}", row.weekday, row.condition, row.range);
        }
    }

    if !chart.is_empty() {
        println!();
        for line in chart.plot().lines() {
            println!("  {line}");
        }
    }

    if !dash.last_updated.is_empty() {
        println!();
        println!("  Updated: {}", dash.last_updated);
    }
}
