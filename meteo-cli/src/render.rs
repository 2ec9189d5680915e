//! Plain-text rendering of the controller's view state.

use meteo_core::{
    ChartGeometry, CurrentWeather, DailyForecast, GeoResult, TemperatureChart, UvBand, ViewState,
    derive::{uv_display, uv_scale_percent},
    format_location_label,
    model::round_whole,
    weather_code_to_text,
};

const UV_BAR_WIDTH: usize = 23;
const CHART_COLS: usize = 49;
const CHART_ROWS: usize = 10;
const CHART_PAD: f64 = 2.0;

pub fn print_places(results: &[GeoResult]) {
    for (idx, place) in results.iter().enumerate() {
        println!(
            "{:>2}. {}  ({:.4}, {:.4})",
            idx + 1,
            format_location_label(place),
            place.latitude,
            place.longitude
        );
    }
}

pub fn print_weather(view: &ViewState) {
    println!("{}", view.header_subtitle());
    println!();

    if let Some(alert) = view.alert() {
        println!("[{}] {}", alert.severity.as_str(), alert.title);
        println!("    {}", alert.message);
        println!();
    }

    if let Some(current) = view.current() {
        print_current(current, view);
    }

    let forecast = view.forecast();
    if !forecast.is_empty() {
        print_forecast(forecast, view.selected_day.as_ref());
        println!();
        for line in chart_lines(&view.chart(&chart_geometry())) {
            println!("{line}");
        }
        println!();
        print_day_details(view.selected_day.as_ref());
    }
}

fn print_current(current: &CurrentWeather, view: &ViewState) {
    println!("Live conditions ({} mood)", view.mood());
    println!("  {}°C  {}", current.temperature_c, weather_code_to_text(current.weather_code));
    println!("  Wind speed   {} km/h", current.wind_speed_kmh);

    if let Some(time) = &current.time {
        let local = current
            .local_time()
            .map(|t| t.format("%b %-d, %Y %H:%M").to_string())
            .unwrap_or_else(|| time.clone());
        match &current.timezone {
            Some(tz) => println!("  Local time   {local} ({tz})"),
            None => println!("  Local time   {local}"),
        }
    }

    if let Some(uv) = current.uv_index {
        let band = UvBand::from_index(uv);
        println!(
            "  UV index     {} {} ({}, {})",
            uv_display(uv),
            uv_bar(uv),
            band.label(),
            band.color()
        );
    }
    println!();
}

fn uv_bar(value: f64) -> String {
    let marker = (uv_scale_percent(value) / 100.0 * (UV_BAR_WIDTH - 1) as f64).round() as usize;
    (0..UV_BAR_WIDTH).map(|i| if i == marker { '|' } else { '-' }).collect::<String>()
}

fn day_label(day: &DailyForecast, format: &str) -> String {
    day.date_naive().map(|d| d.format(format).to_string()).unwrap_or_else(|| day.date.clone())
}

fn print_forecast(days: &[DailyForecast], selected: Option<&DailyForecast>) {
    println!("5-day forecast");
    for day in days {
        let marker = if selected.is_some_and(|s| s.date == day.date) { '>' } else { ' ' };
        println!(
            " {marker} {:<12} {:>4}° / {:>3}°  {}",
            day_label(day, "%a %b %-d"),
            round_whole(day.t_max_c),
            round_whole(day.t_min_c),
            weather_code_to_text(day.weather_code)
        );
    }
}

fn chart_geometry() -> ChartGeometry {
    ChartGeometry {
        width: (CHART_COLS - 1) as f64 + 2.0 * CHART_PAD,
        height: (CHART_ROWS - 1) as f64 + 2.0 * CHART_PAD,
        padding: CHART_PAD,
    }
}

/// Rasterizes the chart: `^` marks highs, `v` lows.
fn chart_lines(chart: &TemperatureChart) -> Vec<String> {
    if chart.points.is_empty() {
        return Vec::new();
    }

    let mut grid = vec![vec![' '; CHART_COLS]; CHART_ROWS];
    let cell = |x: f64, y: f64| {
        let col = (x - CHART_PAD).round().clamp(0.0, (CHART_COLS - 1) as f64) as usize;
        let row = (y - CHART_PAD).round().clamp(0.0, (CHART_ROWS - 1) as f64) as usize;
        (row, col)
    };

    for point in &chart.points {
        let (row, col) = cell(point.x, point.y_min);
        grid[row][col] = 'v';
        let (row, col) = cell(point.x, point.y_max);
        grid[row][col] = '^';
    }

    let top = format!("{:>5}°", chart.axis_max_c);
    let bottom = format!("{:>5}°", chart.axis_min_c);
    let blank = " ".repeat(top.chars().count().max(bottom.chars().count()));

    grid.into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let label = match row {
                0 => top.as_str(),
                r if r == CHART_ROWS - 1 => bottom.as_str(),
                _ => blank.as_str(),
            };
            format!("{label:>w$} |{}", cells.into_iter().collect::<String>(), w = blank.len())
        })
        .collect()
}

fn print_day_details(day: Option<&DailyForecast>) {
    let Some(day) = day else {
        println!("Pass --day YYYY-MM-DD to see sunrise, wind, UV and more for one day.");
        return;
    };

    println!("{}", day_label(day, "%A, %B %-d"));
    println!(
        "  {}  {}° / {}°",
        weather_code_to_text(day.weather_code),
        round_whole(day.t_max_c),
        round_whole(day.t_min_c)
    );

    let clock = |raw: &Option<String>, parsed: Option<chrono::NaiveDateTime>| {
        raw.as_ref()
            .map(|r| parsed.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| r.clone()))
    };
    if let Some(sunrise) = clock(&day.sunrise, day.sunrise_time()) {
        println!("  Sunrise               {sunrise}");
    }
    if let Some(sunset) = clock(&day.sunset, day.sunset_time()) {
        println!("  Sunset                {sunset}");
    }
    if let Some(p) = day.precipitation_probability {
        println!("  Precipitation chance  {p}%");
    }
    if let Some(wind) = day.wind_speed_max_kmh {
        println!("  Max wind              {} km/h", round_whole(wind));
    }
    if let Some(uv) = day.uv_index_max {
        println!("  UV index              {uv}");
    }
}
