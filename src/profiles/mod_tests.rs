//! Tests for connection records and their persistence.

use std::net::Ipv4Addr;

use tempfile::TempDir;

use crate::profiles::{
    ConnectionRecord, ConnectionStore, DEFAULT_BUILDING, FileConnectionStore, LoadResult,
    NEVER_CONNECTED, find_record, status,
};

fn press_line() -> ConnectionRecord {
    ConnectionRecord::new(
        "Press Line 3",
        "Ethernet (Intel(R) I219-V)",
        "192.168.10.50",
        "192.168.10.1",
    )
}

mod record {
    use super::*;

    #[test]
    fn new_uses_default_mask_and_building() {
        let record = press_line();

        assert_eq!(record.subnet_mask, "255.255.255.0");
        assert_eq!(record.building, DEFAULT_BUILDING);
        assert!(record.gateway.is_empty());
        assert_eq!(record.status, status::UNKNOWN);
        assert_eq!(record.last_connected, NEVER_CONNECTED);
    }

    #[test]
    fn to_request_maps_fields() {
        let mut record = press_line();
        record.gateway = "192.168.10.254".to_string();

        let req = record.to_request().unwrap();

        assert_eq!(req.adapter_name(), "Ethernet");
        assert_eq!(req.target_ip, Ipv4Addr::new(192, 168, 10, 50));
        assert_eq!(req.subnet_mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(req.gateway, Some(Ipv4Addr::new(192, 168, 10, 254)));
    }

    #[test]
    fn to_request_defaults_empty_mask() {
        let mut record = press_line();
        record.subnet_mask = String::new();

        let req = record.to_request().unwrap();

        assert_eq!(req.subnet_mask, Ipv4Addr::new(255, 255, 255, 0));
    }

    #[test]
    fn to_request_rejects_invalid_address() {
        let mut record = press_line();
        record.my_ip_address = "192.168.10".to_string();

        assert!(record.to_request().is_err());
    }

    #[test]
    fn probe_target_is_plc_address() {
        let mut record = press_line();
        record.plc_ip_address = " 192.168.10.1 ".to_string();

        assert_eq!(record.probe_target(), "192.168.10.1");
    }

    #[test]
    fn find_record_ignores_case() {
        let mut records = vec![
            ConnectionRecord::new("Boiler", "Ethernet", "10.0.0.2", "10.0.0.1"),
            press_line(),
        ];

        let found = find_record(&mut records, "press line 3").unwrap();

        assert_eq!(found.name, "Press Line 3");
        assert!(find_record(&mut records, "Packaging").is_none());
    }

    #[test]
    fn successful_attempt_stamps_last_connected() {
        let mut record = press_line();

        record.record_attempt(true, None);

        assert_eq!(record.status, status::CONNECTED);
        assert_ne!(record.last_connected, NEVER_CONNECTED);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.last_connected).is_ok());
    }

    #[test]
    fn probe_result_decides_online_or_offline() {
        let mut record = press_line();

        record.record_attempt(true, Some(true));
        assert_eq!(record.status, status::ONLINE);

        record.record_attempt(true, Some(false));
        assert_eq!(record.status, status::OFFLINE);
    }

    #[test]
    fn failed_attempt_keeps_last_connected() {
        let mut record = press_line();
        record.last_connected = "2025-01-02T03:04:05".to_string();

        record.record_attempt(false, None);

        assert_eq!(record.status, status::FAILED);
        assert_eq!(record.last_connected, "2025-01-02T03:04:05");
    }
}

mod serialization {
    use super::*;

    #[test]
    fn uses_pascal_case_keys() {
        let json = serde_json::to_value(press_line()).unwrap();

        assert_eq!(json["Name"], "Press Line 3");
        assert_eq!(json["PlcIpAddress"], "192.168.10.1");
        assert_eq!(json["MyIpAddress"], "192.168.10.50");
        assert_eq!(json["SubnetMask"], "255.255.255.0");
        assert_eq!(json["NetworkAdapter"], "Ethernet (Intel(R) I219-V)");
        assert_eq!(json["Building"], "West");
    }

    #[test]
    fn missing_fields_take_defaults_and_unknown_are_ignored() {
        let json = r#"{
            "Name": "Boiler",
            "PlcIpAddress": "10.0.0.1",
            "MyIpAddress": "10.0.0.2",
            "NetworkAdapter": "Ethernet",
            "Status": "Offline",
            "LastConnected": "2024-03-01T08:00:00"
        }"#;

        let record: ConnectionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "Boiler");
        assert_eq!(record.subnet_mask, "255.255.255.0");
        assert_eq!(record.building, "West");
        assert!(record.notes.is_empty());
        assert_eq!(record.status, "Offline");
        assert_eq!(record.last_connected, "2024-03-01T08:00:00");
    }

    #[test]
    fn records_without_status_load_as_unknown() {
        let record: ConnectionRecord = serde_json::from_str(r#"{"Name":"Boiler"}"#).unwrap();

        assert_eq!(record.status, "Unknown");
        assert_eq!(record.last_connected, "0001-01-01T00:00:00");
    }
}

mod file_store {
    use super::*;

    #[test]
    fn load_returns_not_found_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = FileConnectionStore::new(dir.path().join("plc-connections.json"));

        assert!(matches!(store.load(), LoadResult::NotFound));
    }

    #[tokio::test]
    async fn save_then_load_returns_records() {
        let dir = TempDir::new().unwrap();
        let store = FileConnectionStore::new(dir.path().join("plc-connections.json"));
        let records = vec![
            press_line(),
            ConnectionRecord::new("Boiler", "Wi-Fi", "10.0.0.2", "10.0.0.1"),
        ];

        store.save(&records).await.unwrap();

        match store.load() {
            LoadResult::Loaded(loaded) => assert_eq!(loaded, records),
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("NodusIP").join("plc-connections.json");
        let store = FileConnectionStore::new(&path);

        store.save(&[press_line()]).await.unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("NodusIP").join("plc-connections.json.tmp").exists());
    }

    #[tokio::test]
    async fn file_is_a_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plc-connections.json");
        let store = FileConnectionStore::new(&path);

        store.save(&[press_line()]).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["Name"], "Press Line 3");
    }

    #[tokio::test]
    async fn status_and_last_connected_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plc-connections.json");
        std::fs::write(
            &path,
            r#"[{"Name":"Boiler","Status":"Connected","LastConnected":"2025-01-02T03:04:05"}]"#,
        )
        .unwrap();
        let store = FileConnectionStore::new(&path);

        let LoadResult::Loaded(records) = store.load() else {
            panic!("Expected Loaded");
        };
        store.save(&records).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["Status"], "Connected");
        assert_eq!(value[0]["LastConnected"], "2025-01-02T03:04:05");
    }

    #[test]
    fn load_reports_invalid_json_as_corrupted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plc-connections.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = FileConnectionStore::new(&path).load();

        assert!(matches!(result, LoadResult::Corrupted { ref reason } if reason.contains("Invalid JSON")));
    }

    #[test]
    fn load_treats_empty_file_as_no_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plc-connections.json");
        std::fs::write(&path, "  \n").unwrap();

        match FileConnectionStore::new(&path).load() {
            LoadResult::Loaded(records) => assert!(records.is_empty()),
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn load_accepts_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plc-connections.json");
        std::fs::write(&path, "\u{feff}[{\"Name\":\"Boiler\"}]").unwrap();

        match FileConnectionStore::new(&path).load() {
            LoadResult::Loaded(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].name, "Boiler");
            }
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn default_path_ends_with_app_file() {
        if let Some(path) = FileConnectionStore::default_path() {
            assert!(path.ends_with("NodusIP/plc-connections.json"));
        }
    }
}
