//! End-to-end walk through the two-ticker reconciliation example: build,
//! persist, reload, then summarize from the reloaded matrix.

use chrono::NaiveDate;
use pricecov_core::data::read_observations;
use pricecov_core::matrix::{read_matrix_csv, write_matrix_csv};
use pricecov_core::summary::{write_date_summary_csv, write_instrument_summary_csv};
use pricecov_core::{
    CoverageConfig, DateSummarizer, InstrumentSummarizer, InstrumentType, MatrixBuilder,
    SourceKind,
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn config() -> CoverageConfig {
    CoverageConfig::from_toml(
        r#"
        [calendar]
        start = "2020-01-01"
        end = "2020-01-02"
        "#,
    )
    .unwrap()
}

#[test]
fn two_ticker_example_end_to_end() {
    let config = config();
    let parser = config.date_parser();

    let adjusted = read_observations(
        "Date,Ticker,Close\n2020-01-01,X,10.5\n".as_bytes(),
        SourceKind::Adjusted,
        &config.input,
        &parser,
    )
    .unwrap();
    let unadjusted = read_observations(
        "Date,Ticker,Close\n2020-01-01 00:00:00,X,11.0\n2020-01-02,Y,3.2\n2020-01-02,Y,3.2\n".as_bytes(),
        SourceKind::Unadjusted,
        &config.input,
        &parser,
    )
    .unwrap();

    let built = MatrixBuilder::from_config(&config)
        .unwrap()
        .build(&unadjusted, &adjusted)
        .unwrap();

    let mut matrix_csv = Vec::new();
    write_matrix_csv(&built, &mut matrix_csv).unwrap();
    assert_eq!(
        String::from_utf8(matrix_csv.clone()).unwrap(),
        "Date,X,Y\n2020-01-01,3,0\n2020-01-02,0,2\n"
    );

    let matrix = read_matrix_csv(matrix_csv.as_slice()).unwrap();

    // Instrument view
    let classifier = config.classifier();
    let instruments = InstrumentSummarizer::new(&classifier).summarize(&matrix);
    assert_eq!(instruments.len(), 2);

    let x = &instruments[0];
    assert_eq!(x.ticker, "X");
    assert_eq!(x.instrument_type, InstrumentType::Equity);
    assert_eq!(x.calendar_span_days, 1);
    assert_eq!(x.days_with_both, 1);
    assert_eq!(x.coverage_ratio, 1.0);

    let y = &instruments[1];
    assert_eq!(y.ticker, "Y");
    assert_eq!(y.first_active_date, d("2020-01-02"));
    assert_eq!(y.calendar_span_days, 1);
    assert_eq!(y.days_with_both, 0);
    assert_eq!(y.days_with_unadjusted, 1);
    assert_eq!(y.coverage_ratio, 0.0);

    // Date view
    let dates = DateSummarizer::new(config.weekend_rule().unwrap()).summarize(&matrix);
    assert_eq!(dates.len(), 2);
    assert_eq!(dates[0].available_both, 1);
    assert_eq!(dates[0].total_instruments, 2);
    assert_eq!(dates[0].coverage_ratio, 0.5);
    assert_eq!(dates[1].available_both, 0);
    assert_eq!(dates[1].available_any, 1);
    assert_eq!(dates[1].coverage_ratio, 0.0);

    let mut instrument_csv = Vec::new();
    write_instrument_summary_csv(&instruments, &mut instrument_csv).unwrap();
    let instrument_csv = String::from_utf8(instrument_csv).unwrap();
    assert!(instrument_csv.contains("X,Equity,2020-01-01,2020-01-01,1,1,1,1,1.0"));
    assert!(instrument_csv.contains("Y,Equity,2020-01-02,2020-01-02,1,0,1,0,0.0"));

    let mut date_csv = Vec::new();
    write_date_summary_csv(&dates, &mut date_csv).unwrap();
    let date_csv = String::from_utf8(date_csv).unwrap();
    assert!(date_csv.contains("2020-01-01,Wednesday,False,2,1,1,1,1,0.5"));
    assert!(date_csv.contains("2020-01-02,Thursday,False,2,1,1,0,0,0.0"));
}
