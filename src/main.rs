use std::sync::Arc;

use anyhow::Result;
use climaflow_core::Config;
use climaflow_weather::{DisplayModel, GeocodingClient, WeatherController, WeatherProvider};

#[tokio::main]
async fn main() -> Result<()> {
    climaflow_core::init()?;

    let (config, _) = Config::load_validated()?;

    let controller = WeatherController::new(
        Arc::new(GeocodingClient::new(&config.weather)?),
        Arc::new(WeatherProvider::new(&config.weather)?),
        config.weather.default_city.clone(),
    );

    // Optional city from the command line, otherwise the seed city
    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    controller.search(&query).await;

    let state = controller.state();
    let model = DisplayModel::derive(&state, chrono::Local::now().fixed_offset(), &config.display);
    tracing::debug!("Derived display model in phase {:?}", model.phase);

    if let Some(error) = &model.error {
        println!("! {}", error);
    }

    let Some(forecast) = model.forecast else {
        return Ok(());
    };

    println!("{} ({})", forecast.location_title, forecast.country);
    println!(
        "{}  {}  [{}]",
        forecast.current.temperature_text(),
        forecast.current.condition.label,
        forecast.current.condition.icon.icon_name()
    );
    if let (Some(max), Some(min)) = (forecast.today_max, forecast.today_min) {
        println!("Máx: {}°  Mín: {}°", max, min);
    }
    println!(
        "Vento: {} km/h  Direção: {}°",
        forecast.current.wind_speed, forecast.current.wind_direction_degrees
    );

    println!("\nPrevisão próximas {} horas", forecast.hourly.len());
    for hour in &forecast.hourly {
        let temperature = hour
            .temperature
            .map(|t| format!("{}°", t))
            .unwrap_or_else(|| "--".to_string());
        println!("  {}  {:>4}  {}", hour.label, temperature, hour.icon.icon_name());
    }

    println!("\nPróximos {} dias", forecast.daily.len());
    for day in &forecast.daily {
        let range = match (day.max, day.min) {
            (Some(max), Some(min)) => format!("{}° / {}°", max, min),
            _ => "--".to_string(),
        };
        println!("  {:<14} {:<10} {}", day.label, range, day.icon.icon_name());
    }

    Ok(())
}
