//! End-to-end runs of the train-then-score pipeline.

use approx::assert_abs_diff_eq;
use rstest::rstest;

use sales_screen::data::loader::load_file;
use sales_screen::{
    Dataset, DatasetRole, Error, Pipeline, PipelineConfig, RoundingMode, Row, Stage, Step, Value,
};

fn sale(quantity: i64, total: f64, label: Option<&str>) -> Row {
    let mut row = Row::new();
    row.insert("ReportID".into(), Value::from("Rep"));
    row.insert("Quantity".into(), Value::Integer(quantity));
    row.insert("TotalSalesValues".into(), Value::Float(total));
    if let Some(l) = label {
        row.insert("Suspicious".into(), Value::from(l));
    }
    row
}

fn dataset(rows: Vec<Row>) -> Dataset {
    Dataset::from_rows(rows)
}

#[test]
fn two_row_training_set_scores_small_sale_as_clean() {
    let training = dataset(vec![
        sale(1, 100.0, Some("No")),
        sale(50, 9000.0, Some("Yes")),
    ]);
    let test = dataset(vec![sale(1, 100.0, None)]);

    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let predictions = pipeline.run(training, test).unwrap();

    assert_eq!(predictions.labels, vec![Value::from("No")]);
    assert_abs_diff_eq!(predictions.scores[0], 0.0, epsilon = 1e-9);
    assert_eq!(pipeline.stage(), Stage::Done);

    // Two points, two features: rank-deficient, minimum-norm fit.
    let model = pipeline.model().unwrap();
    assert_eq!(model.rank(), 1);
}

#[test]
fn exactly_linear_labels_are_reproduced() {
    // Suspicious == "Yes" exactly when Quantity is 1, independent of the total.
    let rows = vec![
        sale(0, 0.0, Some("No")),
        sale(1, 0.0, Some("Yes")),
        sale(0, 1.0, Some("No")),
        sale(1, 1.0, Some("Yes")),
        sale(0, 2.0, Some("No")),
        sale(1, 3.0, Some("Yes")),
    ];
    let expected: Vec<Value> = rows
        .iter()
        .map(|r| r["Suspicious"].clone())
        .collect();
    let test: Vec<Row> = rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.remove("Suspicious");
            r
        })
        .collect();

    let predictions = Pipeline::new(PipelineConfig::default())
        .run(dataset(rows), dataset(test))
        .unwrap();
    assert_eq!(predictions.labels, expected);
}

#[test]
fn predictions_keep_test_row_order_and_length() {
    let training = dataset(vec![
        sale(1, 10.0, Some("No")),
        sale(2, 20.0, Some("No")),
        sale(40, 8000.0, Some("Yes")),
        sale(45, 9500.0, Some("Yes")),
    ]);
    let test = dataset(vec![
        sale(44, 9400.0, None),
        sale(1, 12.0, None),
        sale(500, 90000.0, None),
        sale(0, -50.0, None),
        sale(2, 18.0, None),
    ]);

    let predictions = Pipeline::new(PipelineConfig::default())
        .run(training, test)
        .unwrap();
    assert_eq!(
        predictions.labels,
        vec![
            Value::from("Yes"),
            Value::from("No"),
            Value::from("Yes"),
            Value::from("No"),
            Value::from("No"),
        ]
    );
    assert_eq!(predictions.scores.len(), 5);
}

#[test]
fn empty_training_set_fails_before_fitting() {
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let err = pipeline
        .run(Dataset::default(), dataset(vec![sale(1, 1.0, None)]))
        .unwrap_err();

    assert_eq!(err.step, Step::Prepare);
    assert!(matches!(
        err.source,
        Error::DataIngestion {
            role: DatasetRole::Training,
            ..
        }
    ));
    assert!(matches!(err.root_cause(), Error::InvalidInput(_)));
    assert!(pipeline.model().is_none());
    assert_eq!(pipeline.stage(), Stage::Failed);
}

#[rstest]
#[case::training_lacks_total(DatasetRole::Training, "TotalSalesValues")]
#[case::test_lacks_total(DatasetRole::Test, "TotalSalesValues")]
#[case::training_lacks_label(DatasetRole::Training, "Suspicious")]
fn missing_columns_are_ingestion_errors(#[case] role: DatasetRole, #[case] column: &str) {
    let strip = |rows: Vec<Row>| -> Vec<Row> {
        rows.into_iter()
            .map(|mut r| {
                r.remove(column);
                r
            })
            .collect()
    };
    let mut training = vec![sale(1, 100.0, Some("No")), sale(9, 900.0, Some("Yes"))];
    let mut test = vec![sale(3, 300.0, None)];
    match role {
        DatasetRole::Training => training = strip(training),
        DatasetRole::Test => test = strip(test),
    }

    let err = Pipeline::new(PipelineConfig::default())
        .run(dataset(training), dataset(test))
        .unwrap_err();
    assert_eq!(err.step, Step::Prepare);
    assert_eq!(
        err.root_cause(),
        &Error::MissingColumn {
            column: column.to_string()
        }
    );
}

#[test]
fn null_training_label_is_rejected() {
    let training = dataset(vec![sale(1, 100.0, Some("No")), {
        let mut r = sale(9, 900.0, None);
        r.insert("Suspicious".into(), Value::Null);
        r
    }]);
    let err = Pipeline::new(PipelineConfig::default())
        .run(training, dataset(vec![sale(3, 300.0, None)]))
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidInput(_)));
}

#[test]
fn non_numeric_test_feature_fails_scoring() {
    let training = dataset(vec![sale(1, 100.0, Some("No")), sale(9, 900.0, Some("Yes"))]);
    let mut bad = sale(3, 300.0, None);
    bad.insert("Quantity".into(), Value::from("three"));

    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let err = pipeline.run(training, dataset(vec![bad])).unwrap_err();
    assert_eq!(err.step, Step::Score);
    assert!(matches!(err.source, Error::InvalidInput(_)));
    assert_eq!(pipeline.stage(), Stage::Failed);
}

#[test]
fn test_labels_never_refit_the_codec() {
    // The test set carries a label value the training set never had; it is
    // ignored and the codec stays at the two training classes.
    let training = dataset(vec![sale(1, 100.0, Some("No")), sale(9, 900.0, Some("Yes"))]);
    let test = dataset(vec![sale(3, 300.0, Some("indeterminate"))]);

    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let predictions = pipeline.run(training, test).unwrap();
    assert_eq!(pipeline.codec().unwrap().n_classes(), 2);
    assert_ne!(predictions.labels[0], Value::from("indeterminate"));
}

#[test]
fn custom_columns_and_rounding_come_from_config() {
    let config: PipelineConfig = toml::from_str(
        r#"
        feature_columns = ["Units"]
        label_column = "Flag"
        rounding = "half_up"
        "#,
    )
    .unwrap();
    let row = |units: i64, flag: Option<i64>| {
        let mut r = Row::new();
        r.insert("Units".into(), Value::Integer(units));
        if let Some(f) = flag {
            r.insert("Flag".into(), Value::Integer(f));
        }
        r
    };

    // Flag = Units / 2 exactly, so Units = 1 scores 0.5: a tie.
    let training = dataset(vec![row(0, Some(0)), row(2, Some(1))]);
    let test = dataset(vec![row(1, None)]);

    let mut pipeline = Pipeline::new(config);
    let predictions = pipeline.run(training, test).unwrap();
    assert_eq!(pipeline.config().rounding, RoundingMode::HalfUp);
    assert_abs_diff_eq!(predictions.scores[0], 0.5, epsilon = 1e-12);
    assert_eq!(predictions.labels, vec![Value::Integer(1)]);
}

#[test]
fn runs_from_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let train_path = dir.path().join("Train.csv");
    let test_path = dir.path().join("Test.csv");
    std::fs::write(
        &train_path,
        "ReportID,SalesPersonID,ProductID,Quantity,TotalSalesValues,Suspicious\n\
         Rep10101,C21116,PR6112,1,100,No\n\
         Rep10102,C21116,PR6112,50,9000,Yes\n",
    )
    .unwrap();
    std::fs::write(
        &test_path,
        "ReportID,SalesPersonID,ProductID,Quantity,TotalSalesValues\n\
         Rep20001,C21178,PR6253,1,100\n\
         Rep20002,C21178,PR6253,60,11000\n",
    )
    .unwrap();

    let training = load_file(&train_path).unwrap();
    let test = load_file(&test_path).unwrap();
    let predictions = Pipeline::new(PipelineConfig::default())
        .run(training, test)
        .unwrap();
    assert_eq!(
        predictions.labels,
        vec![Value::from("No"), Value::from("Yes")]
    );
}
