use weighted_split_tree::prelude::*;

use polars::prelude::*;

use std::io::Write;


// Toy example: seven points in the plane,
// three labeled `+1` and four labeled `-1`.
#[test]
fn dataframe_to_tree() {
    let s1 = Series::new("x", &[10.0, 14.0, 15.0, 5.0, 3.0, 8.0, 12.0]);
    let s2 = Series::new("y", &[5.0, 8.0, 3.0, 1.0, 9.0, 13.0, 11.0]);
    let target = Series::new("class", &[1_i64, 1, 1, -1, -1, -1, -1]);

    let df = DataFrame::new(vec![s1, s2]).unwrap();
    let sample = Sample::from_dataframe(df, target).unwrap();

    assert_eq!(sample.shape(), (7, 2));
    assert_eq!(sample.classes(), vec![-1, 1]);
    assert_eq!(sample.feature("y").unwrap().values()[4], 9.0);

    let tree = WeightedTreeBuilder::new()
        .max_depth(6)
        .build()
        .unwrap()
        .fit(&sample)
        .unwrap();

    let predictions = tree.predict_sample(&sample).unwrap();
    assert_eq!(predictions, sample.target());
}


#[test]
fn integer_columns_are_cast() {
    let s1 = Series::new("count", &[1_i32, 2, 3]);
    let target = Series::new("class", &[0_i32, 0, 1]);

    let df = DataFrame::new(vec![s1]).unwrap();
    let sample = Sample::from_dataframe(df, target).unwrap();
    assert_eq!(sample.feature("count").unwrap().values(), &[1.0, 2.0, 3.0]);
    assert_eq!(sample.target(), &[0, 0, 1]);
}


#[test]
fn csv_file_to_tree() {
    let path = std::env::temp_dir().join("weighted_split_tree_sample.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "height,weight,label").unwrap();
    for (h, w, y) in [(1.0, 9.0, 0), (2.0, 8.0, 0), (3.0, 2.0, 1), (4.0, 1.0, 1)] {
        writeln!(file, "{h},{w},{y}").unwrap();
    }
    drop(file);

    let sample = Sample::from_csv(&path, true)
        .unwrap()
        .set_target("label")
        .unwrap();
    assert_eq!(sample.shape(), (4, 2));

    let tree = WeightedTreeBuilder::new()
        .build()
        .unwrap()
        .fit(&sample)
        .unwrap();
    assert_eq!(tree.predict_sample(&sample).unwrap(), vec![0, 0, 1, 1]);
    assert_eq!(tree.predict_row(&[4.0, 1.0]).unwrap(), 1);
}


#[test]
fn csv_without_header() {
    let csv = b"0.5,1\n1.5,0\n";
    let sample = Sample::from_reader(&csv[..], false)
        .unwrap()
        .set_target("Feat. [2]")
        .unwrap();
    assert_eq!(sample.target(), &[1, 0]);
    assert_eq!(sample.features()[0].name(), "Feat. [1]");
}


#[test]
fn csv_with_missing_values_is_rejected() {
    let csv = b"x,class\n1.0,0\nNaN,0\n3.0,1\ninf,1\n";
    let res = Sample::from_reader(&csv[..], true);
    assert!(matches!(
        res,
        Err(TreeError::NonFiniteValue { row: 1, feature: 0 })
    ));
}


#[test]
fn fit_requires_a_target() {
    let csv = b"a,b\n1.0,2.0\n3.0,4.0\n";
    let sample = Sample::from_reader(&csv[..], true).unwrap();

    let res = WeightedTreeBuilder::new()
        .build()
        .unwrap()
        .fit(&sample);
    assert!(matches!(res, Err(TreeError::ShapeMismatch { expected: 2, found: 0 })));
}


#[test]
fn missing_target_column() {
    let csv = b"a,b\n1.0,2.0\n";
    let res = Sample::from_reader(&csv[..], true)
        .unwrap()
        .set_target("class");
    assert!(matches!(res, Err(TreeError::MissingColumn(_))));
}


#[test]
fn from_columns() {
    let features = vec![
        Feature::with_values("a", vec![0.0, 1.0, 2.0]),
        Feature::with_values("b", vec![5.0, 5.0, 5.0]),
    ];
    let sample = Sample::from_columns(features, vec![1, 0, 1]).unwrap();
    assert_eq!(sample.row(1), vec![1.0, 5.0]);
    assert_eq!(sample.feature("b").unwrap().values(), &[5.0, 5.0, 5.0]);

    let features = vec![
        Feature::with_values("a", vec![0.0, 1.0]),
        Feature::with_values("b", vec![5.0]),
    ];
    let res = Sample::from_columns(features, vec![1, 0]);
    assert!(matches!(res, Err(TreeError::ShapeMismatch { .. })));
}
