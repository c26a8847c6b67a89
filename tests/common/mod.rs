//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::Write;
use std::path::Path;

pub const AIRLINES: [&str; 3] = ["SA", "FA", "MN"];
pub const AIRPORTS: [&str; 3] = ["CPT", "JNB", "DUR"];
pub const ROWS: usize = 60;

/// Reference instant used for training and prediction in tests
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Price the synthetic data is generated from; exactly linear in the features
pub fn true_price(airline: usize, airport: usize, hour: u32, days: i64, duration: f64, stops: i64) -> f64 {
    500.0 + 100.0 * airline as f64 + 50.0 * airport as f64 + 10.0 * hour as f64 - 2.0 * days as f64
        + 200.0 * duration
        + 30.0 * stops as f64
}

/// CSV with columns departure, arrival, airline, to, stops, price
pub fn synthetic_csv() -> String {
    let mut csv = String::from("departure,arrival,airline,to,stops,price\n");
    for i in 0..ROWS {
        let airline = i % 3;
        let airport = (i / 3) % 3;
        let hour = ((i * 5) % 24) as u32;
        let duration = 1.0 + (i % 4) as f64 * 0.5;
        let stops = (i % 2) as i64;

        let departure = now() + Duration::days(i as i64) + Duration::hours(hour as i64);
        let arrival = departure + Duration::minutes((duration * 60.0) as i64);
        let price = true_price(airline, airport, hour, i as i64, duration, stops);

        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            departure.format("%Y-%m-%d %H:%M:%S"),
            arrival.format("%Y-%m-%d %H:%M:%S"),
            AIRLINES[airline],
            AIRPORTS[airport],
            stops,
            price
        ));
    }
    csv
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

/// Train on the synthetic data into `<dir>/models` and return that directory
pub fn train_into(dir: &Path) -> std::path::PathBuf {
    use flight_price::training::{TrainingConfig, TrainingPipeline};

    let data = write_csv(dir, "flights.csv", &synthetic_csv());
    let models_dir = dir.join("models");
    TrainingPipeline::new(TrainingConfig::new(data, &models_dir))
        .run(now())
        .unwrap();
    models_dir
}
