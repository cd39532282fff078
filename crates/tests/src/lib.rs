//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - load-then-convert lifecycle of the process-wide store
//! - calibration documents from disk
//! - consistency of snapshots under concurrent reloads

/// Calibration document used by the end-to-end tests
pub const CALIBRATION_JSON: &str = r#"{
    "rs_to_dvs": [
        {"interval": [null, 10.0], "inner": false, "conv_k": 2.0, "conv_b": 1.0},
        {"interval": [10.0, null], "inner": false, "conv_k": 3.0, "conv_b": -5.0}
    ],
    "lidar_to_dvs": [
        {"interval": [null, 1000.0], "inner": false, "conv_k": 0.001, "conv_b": 10.0},
        {"interval": [1000.0, 5000.0], "inner": true, "conv_k": 0.001, "conv_b": 11.0},
        {"interval": [5000.0, null], "inner": false, "conv_k": 0.001, "conv_b": 12.0}
    ],
    "dvs_to_rs": [
        {"interval": [null, 21.0], "inner": false, "conv_k": 0.5, "conv_b": -0.5},
        {"interval": [21.0, null], "inner": false, "conv_k": 0.3333333333333333, "conv_b": 1.6666666666666667}
    ],
    "dvs_to_lidar": [
        {"interval": [null, 11.0], "inner": false, "conv_k": 1000.0, "conv_b": -10000.0},
        {"interval": [11.0, 16.0], "inner": true, "conv_k": 1000.0, "conv_b": -11000.0},
        {"interval": [16.0, null], "inner": false, "conv_k": 1000.0, "conv_b": -12000.0}
    ],
    "dvs_timestamp_scale": 1e-6,
    "dvs_offset_s": 1500.0,
    "lidar_timestamp_scale": 1e-9,
    "lidar_offset_s": 1.5,
    "rs_timestamp_scale": 0.001,
    "rs_offset_s": 2.0,
    "recording": "ignored extra field"
}"#;

#[cfg(test)]
mod contract_tests {
    use contracts::{CalibrationTable, CrossSensor};

    /// Every rule table named by `CrossSensor` is a key of the document
    #[test]
    fn test_cross_sensor_keys_match_document() {
        let document: serde_json::Value = serde_json::from_str(super::CALIBRATION_JSON).unwrap();
        let table: CalibrationTable = serde_json::from_value(document.clone()).unwrap();

        assert_eq!(CrossSensor::ALL.len(), 4);
        for kind in CrossSensor::ALL {
            let rules = document[kind.key()].as_array().unwrap();
            assert_eq!(rules.len(), table.rules(kind).len(), "{}", kind.key());
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;

    use super::CALIBRATION_JSON;
    use timeconv::{ContractError, CrossSensor};

    /// Process-wide store lifecycle.
    ///
    /// Kept as the only test touching the global store so that the
    /// not-initialized phase is observed before any load.
    #[test]
    fn test_global_load_then_convert() {
        assert!(matches!(
            timeconv::convert_rs_to_dvs(5.0),
            Err(ContractError::NotInitialized)
        ));
        assert!(matches!(
            timeconv::dvs_native_to_relative(5.0),
            Err(ContractError::NotInitialized)
        ));
        assert!(matches!(
            timeconv::convert_lidar_to_dvs_batch(&[1.0]),
            Err(ContractError::NotInitialized)
        ));

        // A failed load keeps the store empty
        assert!(timeconv::load_from_str("[]").is_err());
        assert!(timeconv::converter().is_err());

        timeconv::load_from_str(CALIBRATION_JSON).unwrap();
        assert!(timeconv::converter().is_ok());

        // Reload the same document from disk through the file entry point
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CALIBRATION_JSON.as_bytes()).unwrap();
        let table = timeconv::load_from_file(file.path()).unwrap();
        assert_eq!(table.lidar_to_dvs.len(), 3);
        assert!(matches!(
            timeconv::load_from_file(file.path().with_extension("missing")),
            Err(ContractError::Io(_))
        ));

        assert_eq!(timeconv::convert_rs_to_dvs(5.0).unwrap(), 11.0);
        assert_eq!(timeconv::convert_rs_to_dvs(10.0).unwrap(), 21.0);
        assert!((timeconv::convert_rs_to_dvs(10.0001).unwrap() - 25.0003).abs() < 1e-9);
        assert_eq!(
            timeconv::convert_rs_to_dvs_batch(&[5.0, 10.0]).unwrap(),
            vec![11.0, 21.0]
        );

        // Inner rule: (1000, 5000]
        assert_eq!(timeconv::convert_lidar_to_dvs(1000.0).unwrap(), 11.0);
        assert_eq!(timeconv::convert_lidar_to_dvs(5000.0).unwrap(), 16.0);
        assert!((timeconv::convert_lidar_to_dvs(5000.5).unwrap() - 17.0005).abs() < 1e-9);

        assert_eq!(
            timeconv::map_value(CrossSensor::DvsToLidar, 12.0).unwrap(),
            1000.0
        );
        // 10.0 -> 10000 - 10000, 12.0 -> inner (11, 16], 20.0 -> 20000 - 12000
        assert_eq!(
            timeconv::map_values(CrossSensor::DvsToLidar, &[10.0, 12.0, 20.0]).unwrap(),
            vec![0.0, 1000.0, 8000.0]
        );

        let relative = timeconv::rs_native_to_relative(2500.0).unwrap();
        assert!((relative - 0.5).abs() < 1e-12);
        let native = timeconv::rs_relative_to_native(relative).unwrap();
        assert!((native - 2500.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod store_tests {
    use std::io::Write;
    use std::sync::Arc;

    use super::CALIBRATION_JSON;
    use contracts::{Conversion, Endpoint, Sensor};
    use timeconv::{CalibrationStore, ContractError};

    fn loaded_store() -> CalibrationStore {
        let store = CalibrationStore::new();
        store.load_from_str(CALIBRATION_JSON).unwrap();
        store
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CALIBRATION_JSON.as_bytes()).unwrap();

        let store = CalibrationStore::new();
        let table = store.load_from_path(file.path()).unwrap();
        assert_eq!(table.lidar_to_dvs.len(), 3);
        assert_eq!(store.converter().unwrap().convert_rs_to_dvs(1.0).unwrap(), 3.0);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let store = CalibrationStore::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            store.load_from_path(dir.path().join("missing.json")),
            Err(ContractError::Io(_))
        ));
    }

    #[test]
    fn test_missing_scalar_is_parse_error() {
        let doc: serde_json::Value = serde_json::from_str(CALIBRATION_JSON).unwrap();
        let mut doc = doc.as_object().unwrap().clone();
        doc.remove("lidar_offset_s");
        let text = serde_json::Value::Object(doc).to_string();

        let store = CalibrationStore::new();
        let err = store.load_from_str(&text).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
        assert!(err.to_string().contains("lidar_offset_s"), "got: {err}");
    }

    #[test]
    fn test_malformed_rule_rejected_at_load() {
        let text = CALIBRATION_JSON.replacen(
            r#"{"interval": [null, 21.0], "inner": false"#,
            r#"{"interval": [null, null], "inner": false"#,
            1,
        );
        let store = CalibrationStore::new();
        assert!(matches!(
            store.load_from_str(&text),
            Err(ContractError::InvalidRule { index: Some(0), .. })
        ));
    }

    #[test]
    fn test_round_trip_all_sensors() {
        let conv = loaded_store().converter().unwrap();
        for sensor in Sensor::ALL {
            let clock = conv.table().clock(sensor);
            for native in [0.0, 1.0, 123_456.789, 9.87e11] {
                let back = conv
                    .to_native(sensor, conv.to_relative(sensor, native))
                    .unwrap();
                let tolerance = 1e-9 * (native.abs() + (clock.offset_s / clock.scale).abs());
                assert!((back - native).abs() <= tolerance, "{sensor}: {native} -> {back}");
            }
        }
    }

    #[test]
    fn test_cross_sensor_plan() {
        let conv = loaded_store().converter().unwrap();
        // rs native 5 ms -> dvs 11, which stays in the first dvs_to_lidar rule: 11 * 1000 - 10000
        let plan = Conversion::new(Endpoint::native(Sensor::Rs), Endpoint::native(Sensor::Lidar));
        assert_eq!(conv.convert(&plan, 5.0).unwrap(), 1000.0);

        // lidar native 2000 ns -> dvs 13 -> rs 13 * 0.5 - 0.5
        let plan = Conversion::new(Endpoint::native(Sensor::Lidar), Endpoint::native(Sensor::Rs));
        assert_eq!(conv.convert(&plan, 2000.0).unwrap(), 6.0);
    }

    #[test]
    fn test_concurrent_reload_keeps_snapshots_consistent() {
        let store = Arc::new(loaded_store());
        let mut shifted: contracts::CalibrationTable = (*store.snapshot().unwrap()).clone();
        for rule in &mut shifted.rs_to_dvs {
            rule.conv_b += 1000.0;
        }

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let conv = store.converter().unwrap();
                        let low = conv.convert_rs_to_dvs(5.0).unwrap();
                        let high = conv.convert_rs_to_dvs(20.0).unwrap();
                        // Both values come from the same table
                        assert_eq!(high - low, 44.0);
                    }
                });
            }
            let writer = Arc::clone(&store);
            let shifted = shifted.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    writer.replace(shifted.clone()).unwrap();
                    writer.load_from_str(CALIBRATION_JSON).unwrap();
                }
            });
        });

        assert!(store.is_loaded());
    }
}
