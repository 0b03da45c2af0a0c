use std::collections::HashMap;

use wicket::config::Config;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 1970);
    assert_eq!(cfg.workers, 4);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.max_body_bytes, 8 * 1024 * 1024);
    assert_eq!(cfg.listen_addr(), "0.0.0.0:1970");
}

#[test]
fn test_config_no_overrides() {
    let cfg = Config::default().with_overrides(lookup(&[])).unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_overrides_from_env() {
    let cfg = Config::default()
        .with_overrides(lookup(&[
            ("WICKET_HOST", "127.0.0.1"),
            ("WICKET_PORT", "3000"),
            ("WICKET_WORKERS", "8"),
            ("WICKET_LOG", "debug"),
        ]))
        .unwrap();

    assert_eq!(cfg.listen_addr(), "127.0.0.1:3000");
    assert_eq!(cfg.workers, 8);
    assert_eq!(cfg.log_level, "debug");
}

#[test]
fn test_config_invalid_port_override() {
    let res = Config::default().with_overrides(lookup(&[("WICKET_PORT", "seventy")]));
    assert!(res.is_err());

    let res = Config::default().with_overrides(lookup(&[("WICKET_PORT", "70000")]));
    assert!(res.is_err());
}

#[test]
fn test_config_zero_workers_rejected() {
    let res = Config::default().with_overrides(lookup(&[("WICKET_WORKERS", "0")]));
    assert!(res.is_err());
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml("port: 8080\nworkers: 2\n").unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.workers, 2);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.max_head_bytes, Config::default().max_head_bytes);
}

#[test]
fn test_config_from_yaml_full() {
    let yaml = r#"
host: 127.0.0.1
port: 1971
workers: 1
max_head_bytes: 1024
max_body_bytes: 2048
log_level: trace
"#;
    let cfg = Config::from_yaml(yaml).unwrap();

    assert_eq!(cfg.listen_addr(), "127.0.0.1:1971");
    assert_eq!(cfg.workers, 1);
    assert_eq!(cfg.max_head_bytes, 1024);
    assert_eq!(cfg.max_body_bytes, 2048);
    assert_eq!(cfg.log_level, "trace");
}

#[test]
fn test_config_from_yaml_rejects_zero_workers() {
    assert!(Config::from_yaml("workers: 0\n").is_err());
}

#[test]
fn test_config_from_yaml_rejects_zero_body_limit() {
    assert!(Config::from_yaml("max_body_bytes: 0\n").is_err());
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("wicket-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "port: 9090\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.port, 9090);
}

#[test]
fn test_config_missing_file() {
    assert!(Config::from_file("/nonexistent/wicket.yaml").is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.listen_addr(), cfg2.listen_addr());
}
